//! gdi32/user32 detours.
//!
//! Each hook is a `retour::GenericDetour` created from the export's address.
//! The detour functions find the shared [`HookContext`] and the trampolines
//! through the `INSTALLED` singleton, which is published before any detour
//! is enabled.

use std::ffi::{CStr, c_void};
use std::sync::OnceLock;

use retour::{Function, GenericDetour};
use windows_sys::Win32::Graphics::Gdi::{
    ABC, GetCurrentObject, GetObjectType, HDC, HGDI_ERROR, HGDIOBJ, OBJ_FONT,
};

use abccache_core::{Abc, FontHandle, Gdi, GlyphQuery, HookContext, ObjectHandle, SurfaceHandle};

use crate::error::PluginError;
use crate::platform_windows;

type SelectObjectFn = unsafe extern "system" fn(HDC, HGDIOBJ) -> HGDIOBJ;
type CharAbcWidthsIFn = unsafe extern "system" fn(HDC, u32, u32, *const u16, *mut ABC) -> i32;
type SystemParametersInfoWFn = unsafe extern "system" fn(u32, u32, *mut c_void, u32) -> i32;

const GDI32: &str = "gdi32.dll";
const USER32: &str = "user32.dll";

// Output records are handed to the cache by reinterpreting the caller's
// `ABC` array.
const _: () = assert!(size_of::<ABC>() == size_of::<Abc>());
const _: () = assert!(align_of::<ABC>() == align_of::<Abc>());

struct Hooks {
    select_object: GenericDetour<SelectObjectFn>,
    char_abc_widths: GenericDetour<CharAbcWidthsIFn>,
    system_parameters: Option<GenericDetour<SystemParametersInfoWFn>>,
}

// SAFETY: a detour only holds code addresses and the patched bytes. Calling
// the trampoline is thread-safe, and enable/disable happen in
// `pluginit`/`plugstop`, which x64dbg serializes.
#[allow(unsafe_code)]
unsafe impl Send for Hooks {}
#[allow(unsafe_code)]
unsafe impl Sync for Hooks {}

struct Installed {
    context: HookContext,
    hooks: Hooks,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

/// Create a (disabled) detour of `module!symbol`.
#[allow(unsafe_code)]
fn create_detour<T: Function>(
    module: &'static str,
    symbol: &'static CStr,
    detour: T,
) -> Result<GenericDetour<T>, PluginError> {
    let name = || symbol.to_string_lossy().into_owned();
    let target = platform_windows::load_module(module)
        .and_then(|m| platform_windows::export(m, symbol))
        .ok_or_else(|| PluginError::HookTarget {
            module,
            symbol: name(),
        })?;
    // SAFETY: `target` is the export named `symbol`, whose signature `T`
    // mirrors; `detour` has the same signature.
    unsafe {
        let target = T::from_ptr(target.cast());
        GenericDetour::new(target, detour).map_err(|e| PluginError::hook(name(), e))
    }
}

impl Hooks {
    fn create(system_parameters: bool) -> Result<Self, PluginError> {
        let select_object = create_detour::<SelectObjectFn>(GDI32, c"SelectObject", select_object)?;
        let char_abc_widths =
            create_detour::<CharAbcWidthsIFn>(GDI32, c"GetCharABCWidthsI", char_abc_widths_i)?;
        let system_parameters = if system_parameters {
            Some(create_detour::<SystemParametersInfoWFn>(
                USER32,
                c"SystemParametersInfoW",
                system_parameters_info_w,
            )?)
        } else {
            None
        };
        Ok(Self {
            select_object,
            char_abc_widths,
            system_parameters,
        })
    }

    /// Enable every detour, or none of them.
    #[allow(unsafe_code)]
    fn enable(&self) -> Result<(), PluginError> {
        // SAFETY: the detours were created from matching signatures, and the
        // context they read is published before this runs.
        let result = unsafe {
            self.select_object
                .enable()
                .map_err(|e| PluginError::hook("SelectObject", e))
                .and_then(|()| {
                    self.char_abc_widths
                        .enable()
                        .map_err(|e| PluginError::hook("GetCharABCWidthsI", e))
                })
                .and_then(|()| match &self.system_parameters {
                    Some(hook) => hook
                        .enable()
                        .map_err(|e| PluginError::hook("SystemParametersInfoW", e)),
                    None => Ok(()),
                })
        };
        if result.is_err() {
            self.disable();
        }
        result
    }

    fn disable(&self) {
        disable_detour("SelectObject", &self.select_object);
        disable_detour("GetCharABCWidthsI", &self.char_abc_widths);
        if let Some(hook) = &self.system_parameters {
            disable_detour("SystemParametersInfoW", hook);
        }
    }
}

#[allow(unsafe_code)]
fn disable_detour<T: Function>(symbol: &str, detour: &GenericDetour<T>) {
    // SAFETY: restores the original prologue; disabling a detour that is
    // not enabled is a no-op.
    if let Err(e) = unsafe { detour.disable() } {
        log::warn!("failed to unhook {symbol}: {e}");
    }
}

/// Publish `context`, then hook every target.
pub fn install(context: HookContext) -> Result<&'static HookContext, PluginError> {
    if INSTALLED.get().is_some() {
        return Err(PluginError::AlreadyInitialized);
    }
    let hooks = Hooks::create(context.params().action().is_some())?;
    INSTALLED
        .set(Installed { context, hooks })
        .map_err(|_| PluginError::AlreadyInitialized)?;
    let installed = INSTALLED.get().ok_or(PluginError::AlreadyInitialized)?;
    installed.hooks.enable()?;
    log::info!(
        "hooked SelectObject, GetCharABCWidthsI{}",
        if installed.hooks.system_parameters.is_some() {
            ", SystemParametersInfoW"
        } else {
            ""
        }
    );
    Ok(&installed.context)
}

/// Unhook everything and drop the cached fonts.
pub fn uninstall() {
    if let Some(installed) = INSTALLED.get() {
        installed.hooks.disable();
        installed.context.clear();
        log::info!("hooks removed");
    }
}

pub fn context() -> Option<&'static HookContext> {
    INSTALLED.get().map(|installed| &installed.context)
}

/// [`Gdi`] over gdi32 and the `GetCharABCWidthsI` trampoline.
struct Gdi32<'a> {
    hooks: &'a Hooks,
    /// The caller's output pointer, forwarded as-is for empty requests.
    abc: *mut ABC,
}

impl Gdi for Gdi32<'_> {
    #[allow(unsafe_code)]
    fn current_font(&self, surface: SurfaceHandle) -> FontHandle {
        // SAFETY: GetCurrentObject validates the handle and returns null for
        // anything that is not a DC.
        let font = unsafe { GetCurrentObject(surface.0 as HDC, OBJ_FONT) };
        FontHandle(font as usize)
    }

    #[allow(unsafe_code)]
    fn as_font(&self, object: ObjectHandle) -> Option<FontHandle> {
        // SAFETY: GetObjectType validates the handle and returns 0 for
        // anything that is not a GDI object.
        let kind = unsafe { GetObjectType(object.0 as HGDIOBJ) };
        (kind == OBJ_FONT as u32).then_some(FontHandle(object.0))
    }

    #[allow(unsafe_code)]
    fn char_abc_widths(
        &self,
        surface: SurfaceHandle,
        query: &GlyphQuery<'_>,
        out: &mut [Abc],
    ) -> bool {
        let count = out.len();
        let indices = match query.indices {
            Some(indices) => {
                debug_assert_eq!(indices.len(), count);
                indices.as_ptr()
            }
            None => std::ptr::null(),
        };
        let abc = if out.is_empty() { self.abc } else { out.as_mut_ptr().cast() };
        // SAFETY: `indices` and `abc` come from the caller's arguments and
        // cover `count` entries each.
        unsafe {
            self.hooks.char_abc_widths.call(
                surface.0 as HDC,
                query.first,
                count as u32,
                indices,
                abc,
            ) != 0
        }
    }
}

#[allow(unsafe_code)]
unsafe extern "system" fn select_object(hdc: HDC, object: HGDIOBJ) -> HGDIOBJ {
    // Detours are enabled only after `INSTALLED` is set.
    let Some(installed) = INSTALLED.get() else {
        return std::ptr::null_mut();
    };
    // SAFETY: same arguments as our caller passed.
    let previous = unsafe { installed.hooks.select_object.call(hdc, object) };
    if !previous.is_null() && previous != HGDI_ERROR {
        let gdi = Gdi32 {
            hooks: &installed.hooks,
            abc: std::ptr::null_mut(),
        };
        installed.context.object_selected(
            &gdi,
            platform_windows::current_thread_id(),
            SurfaceHandle(hdc as usize),
            ObjectHandle(object as usize),
        );
    }
    previous
}

#[allow(unsafe_code)]
unsafe extern "system" fn char_abc_widths_i(
    hdc: HDC,
    first: u32,
    count: u32,
    indices: *const u16,
    abc: *mut ABC,
) -> i32 {
    let Some(installed) = INSTALLED.get() else {
        return 0;
    };
    if abc.is_null() && count > 0 {
        // SAFETY: same arguments as our caller passed.
        return unsafe {
            installed
                .hooks
                .char_abc_widths
                .call(hdc, first, count, indices, abc)
        };
    }

    let len = count as usize;
    let out: &mut [Abc] = if len == 0 {
        &mut []
    } else {
        // SAFETY: the caller provides `count` writable `ABC` records, and
        // `Abc` has the same layout.
        unsafe { std::slice::from_raw_parts_mut(abc.cast::<Abc>(), len) }
    };
    let query = if indices.is_null() || len == 0 {
        GlyphQuery::range(first)
    } else {
        // SAFETY: a non-null index array holds `count` entries.
        GlyphQuery::indices(unsafe { std::slice::from_raw_parts(indices, len) })
    };

    let gdi = Gdi32 {
        hooks: &installed.hooks,
        abc,
    };
    let ok = installed.context.char_abc_widths(
        &gdi,
        platform_windows::current_thread_id(),
        SurfaceHandle(hdc as usize),
        query,
        out,
    );
    i32::from(ok)
}

#[allow(unsafe_code)]
unsafe extern "system" fn system_parameters_info_w(
    action: u32,
    param: u32,
    data: *mut c_void,
    win_ini: u32,
) -> i32 {
    let Some(installed) = INSTALLED.get() else {
        return 0;
    };
    let Some(hook) = &installed.hooks.system_parameters else {
        return 0;
    };
    let forward = |data: *mut c_void| {
        // SAFETY: same arguments as our caller passed.
        unsafe { hook.call(action, param, data, win_ini) != 0 }
    };

    let params = installed.context.params();
    if data.is_null() || param == 0 || !params.caches(action) {
        return i32::from(forward(data));
    }
    // SAFETY: for this action `param` is the size in bytes of the caller's
    // buffer at `data`.
    let buf = unsafe { std::slice::from_raw_parts_mut(data.cast::<u8>(), param as usize) };
    let ok = installed
        .context
        .system_parameters(action, buf, |buf| forward(buf.as_mut_ptr().cast()));
    i32::from(ok)
}
