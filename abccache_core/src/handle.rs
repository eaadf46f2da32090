//! Opaque handle newtypes.
//!
//! GDI handles are only ever compared and hashed here, never dereferenced.
//! Separate types keep a device context from being used as a font key.

use std::fmt;

/// Generate conversion and display impls for a handle wrapper.
macro_rules! handle_ops {
    ($ty:ident) => {
        impl From<usize> for $ty {
            fn from(val: usize) -> Self {
                Self(val)
            }
        }

        impl From<$ty> for usize {
            fn from(val: $ty) -> Self {
                val.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

/// Device context (`HDC`) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceHandle(pub usize);

handle_ops!(SurfaceHandle);

/// Font object (`HFONT`) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontHandle(pub usize);

handle_ops!(FontHandle);

/// Any GDI object passed to `SelectObject` (font, pen, brush, bitmap, region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectHandle(pub usize);

handle_ops!(ObjectHandle);

#[cfg(test)]
mod tests {
    use super::{FontHandle, ObjectHandle, SurfaceHandle};

    #[test]
    fn handle_conversions() {
        assert_eq!(FontHandle::from(0x42_usize), FontHandle(0x42));
        assert_eq!(usize::from(SurfaceHandle(0x42)), 0x42);
        assert_eq!(ObjectHandle::from(7_usize), ObjectHandle(7));
    }

    #[test]
    fn handle_display_is_hex() {
        assert_eq!(format!("{}", FontHandle(0x1a0a_3f21)), "0x1a0a3f21");
        assert_eq!(format!("{}", SurfaceHandle(0)), "0x0");
    }
}
