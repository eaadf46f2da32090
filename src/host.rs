//! Binding to the x64dbg plugin API.
//!
//! The `_plugin_*` functions are exported by the debugger DLL. They are
//! resolved at runtime so the plugin needs no SDK import library.

use std::ffi::{CStr, CString, c_char};
use std::sync::OnceLock;

use crate::error::PluginError;
use crate::platform_windows;

#[cfg(target_pointer_width = "64")]
const HOST_MODULE: &str = "x64dbg.dll";
#[cfg(target_pointer_width = "32")]
const HOST_MODULE: &str = "x32dbg.dll";

/// `CBPLUGINCOMMAND`
pub type CommandCallback = extern "C" fn(argc: i32, argv: *mut *mut c_char) -> bool;

type RegisterCommandFn =
    unsafe extern "C" fn(handle: i32, command: *const c_char, callback: CommandCallback, debug_only: bool) -> bool;
type UnregisterCommandFn = unsafe extern "C" fn(handle: i32, command: *const c_char) -> bool;
type LogPrintFn = unsafe extern "C" fn(text: *const c_char);

pub struct Host {
    handle: i32,
    register_command: RegisterCommandFn,
    unregister_command: UnregisterCommandFn,
    log_print: LogPrintFn,
}

static HOST: OnceLock<Host> = OnceLock::new();

impl Host {
    /// Resolve the plugin API for the plugin handle x64dbg assigned us.
    #[allow(unsafe_code)]
    pub fn resolve(handle: i32) -> Result<Self, PluginError> {
        let module =
            platform_windows::loaded_module(HOST_MODULE).ok_or(PluginError::HostModule(HOST_MODULE))?;
        let lookup = |symbol: &'static CStr, name: &'static str| {
            platform_windows::export(module, symbol).ok_or(PluginError::HostExport(name))
        };

        let register = lookup(c"_plugin_registercommand", "_plugin_registercommand")?;
        let unregister = lookup(c"_plugin_unregistercommand", "_plugin_unregistercommand")?;
        let log_print = lookup(c"_plugin_logprint", "_plugin_logprint")?;

        // SAFETY: each address is the named x64dbg export, whose C signature
        // the corresponding function pointer type mirrors.
        unsafe {
            Ok(Self {
                handle,
                register_command: std::mem::transmute::<*const std::ffi::c_void, RegisterCommandFn>(
                    register,
                ),
                unregister_command: std::mem::transmute::<
                    *const std::ffi::c_void,
                    UnregisterCommandFn,
                >(unregister),
                log_print: std::mem::transmute::<*const std::ffi::c_void, LogPrintFn>(log_print),
            })
        }
    }

    #[allow(unsafe_code)]
    pub fn register_command(&self, name: &CStr, callback: CommandCallback) -> Result<(), PluginError> {
        // SAFETY: `name` is NUL-terminated and outlives the call; x64dbg
        // copies it.
        let ok = unsafe { (self.register_command)(self.handle, name.as_ptr(), callback, false) };
        if ok {
            Ok(())
        } else {
            Err(PluginError::RegisterCommand(name.to_string_lossy().into_owned()))
        }
    }

    #[allow(unsafe_code)]
    pub fn unregister_command(&self, name: &CStr) {
        // SAFETY: `name` is NUL-terminated and outlives the call.
        if !unsafe { (self.unregister_command)(self.handle, name.as_ptr()) } {
            log::warn!("failed to unregister command {name:?}");
        }
    }

    /// Write raw text to the debugger log. Interior NULs are dropped.
    #[allow(unsafe_code)]
    pub fn print(&self, text: &str) {
        let text = CString::new(text.replace('\0', "")).unwrap_or_default();
        // SAFETY: `text` is NUL-terminated and outlives the call.
        unsafe { (self.log_print)(text.as_ptr()) };
    }
}

/// Publish the host API for the lifetime of the module.
pub fn install(host: Host) -> Result<&'static Host, PluginError> {
    HOST.set(host).map_err(|_| PluginError::AlreadyInitialized)?;
    HOST.get().ok_or(PluginError::AlreadyInitialized)
}

pub fn get() -> Option<&'static Host> {
    HOST.get()
}

/// Logger sink: prints through the host once it is installed.
pub fn print(text: &str) {
    if let Some(host) = HOST.get() {
        host.print(text);
    }
}
