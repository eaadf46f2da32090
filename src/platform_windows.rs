//! Win32 helpers for module and export lookup.

use std::ffi::{CStr, OsString, c_void};
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;

use windows_sys::Win32::Foundation::{HMODULE, MAX_PATH};
use windows_sys::Win32::System::LibraryLoader::{
    GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS, GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
    GetModuleFileNameW, GetModuleHandleExW, GetModuleHandleW, GetProcAddress, LoadLibraryW,
};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;

/// NUL-terminated UTF-16 copy of `s`.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Handle of an already loaded module.
#[allow(unsafe_code)]
pub fn loaded_module(name: &str) -> Option<HMODULE> {
    let name = wide(name);
    // SAFETY: `name` is a valid NUL-terminated wide string.
    let module = unsafe { GetModuleHandleW(name.as_ptr()) };
    (!module.is_null()).then_some(module)
}

/// Handle of a module, loading it if needed. The reference is never
/// released; system DLLs stay loaded for the process lifetime anyway.
#[allow(unsafe_code)]
pub fn load_module(name: &str) -> Option<HMODULE> {
    if let Some(module) = loaded_module(name) {
        return Some(module);
    }
    let name = wide(name);
    // SAFETY: `name` is a valid NUL-terminated wide string.
    let module = unsafe { LoadLibraryW(name.as_ptr()) };
    (!module.is_null()).then_some(module)
}

/// Address of an exported function.
#[allow(unsafe_code)]
pub fn export(module: HMODULE, symbol: &CStr) -> Option<*const c_void> {
    // SAFETY: `module` is a live module handle and `symbol` is NUL-terminated.
    let proc = unsafe { GetProcAddress(module, symbol.as_ptr().cast()) }?;
    Some(proc as *const c_void)
}

/// Id of the calling thread. Never 0.
#[allow(unsafe_code)]
pub fn current_thread_id() -> u32 {
    // SAFETY: no preconditions.
    unsafe { GetCurrentThreadId() }
}

/// Directory containing this plugin's DLL.
#[allow(unsafe_code)]
pub fn plugin_dir() -> Option<PathBuf> {
    let mut module: HMODULE = std::ptr::null_mut();
    let anchor = plugin_dir as *const c_void;
    // SAFETY: with FROM_ADDRESS the name argument is an address inside the
    // module to find; UNCHANGED_REFCOUNT means nothing must be released.
    let found = unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            anchor.cast(),
            &raw mut module,
        )
    };
    if found == 0 {
        return None;
    }

    let mut buf = vec![0_u16; MAX_PATH as usize];
    loop {
        // SAFETY: `buf` is writable for `buf.len()` UTF-16 units.
        let len = unsafe { GetModuleFileNameW(module, buf.as_mut_ptr(), buf.len() as u32) } as usize;
        if len == 0 {
            return None;
        }
        // A full buffer means the path was truncated.
        if len < buf.len() {
            let path = PathBuf::from(OsString::from_wide(&buf[..len]));
            return path.parent().map(PathBuf::from);
        }
        buf.resize(buf.len() * 2, 0);
    }
}
