//! Glyph width records and query descriptions.

/// Per-glyph spacing record, laid out exactly like Win32 `ABC`.
///
/// `a` is the leading bearing, `b` the glyph body width, `c` the trailing
/// bearing. The cache copies these verbatim and never interprets them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Abc {
    pub a: i32,
    pub b: u32,
    pub c: i32,
}

impl Abc {
    pub const fn new(a: i32, b: u32, c: i32) -> Self {
        Self { a, b, c }
    }
}

/// Glyph indices requested by one `GetCharABCWidthsI` call.
///
/// With `indices` absent the request covers the contiguous range starting
/// at `first`; the length of the request is the length of the output slice
/// it is paired with.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuery<'a> {
    /// First glyph index of a contiguous request (ignored when `indices` is set).
    pub first: u32,
    /// Explicit glyph indices, one per output record.
    pub indices: Option<&'a [u16]>,
}

impl<'a> GlyphQuery<'a> {
    /// Contiguous request starting at `first`.
    pub fn range(first: u32) -> Self {
        Self {
            first,
            indices: None,
        }
    }

    /// Request for an explicit list of glyph indices.
    pub fn indices(indices: &'a [u16]) -> Self {
        Self {
            first: 0,
            indices: Some(indices),
        }
    }

    /// Glyph index requested at `position`.
    ///
    /// Contiguous requests wrap on overflow, matching `UINT` arithmetic.
    /// For explicit requests `position` must be within the index array.
    pub fn glyph(&self, position: usize) -> u32 {
        match self.indices {
            Some(indices) => u32::from(indices[position]),
            None => self.first.wrapping_add(position as u32),
        }
    }
}
