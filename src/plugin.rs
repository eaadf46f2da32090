//! x64dbg plugin entry points.

use std::ffi::{CString, c_char, c_void};
use std::sync::OnceLock;

use log::LevelFilter;

use abccache_core::HookContext;

use crate::config::{self, Config};
use crate::error::PluginError;
use crate::host::{self, Host};
use crate::{PLUGIN_NAME, PLUGIN_VERSION, hooks, logger, platform_windows};

/// SDK version this plugin is built against.
const PLUG_SDKVERSION: i32 = 1;

/// `PLUG_INITSTRUCT`
#[repr(C)]
pub struct PlugInitStruct {
    /// Filled in by x64dbg.
    plugin_handle: i32,
    sdk_version: i32,
    plugin_version: i32,
    plugin_name: [c_char; 256],
}

/// Registered command name, kept alive for unregistration.
static COMMAND: OnceLock<CString> = OnceLock::new();

#[allow(unsafe_code)]
#[unsafe(no_mangle)]
pub extern "C" fn pluginit(init: *mut PlugInitStruct) -> bool {
    // SAFETY: x64dbg passes a valid, exclusively borrowed init struct.
    let Some(init) = (unsafe { init.as_mut() }) else {
        return false;
    };
    init.sdk_version = PLUG_SDKVERSION;
    init.plugin_version = PLUGIN_VERSION;
    write_name(&mut init.plugin_name, PLUGIN_NAME);

    match start(init.plugin_handle) {
        Ok(()) => true,
        Err(e) => {
            log::error!("initialization failed: {e}");
            false
        }
    }
}

#[allow(unsafe_code)]
#[unsafe(no_mangle)]
pub extern "C" fn plugstop() -> bool {
    hooks::uninstall();
    if let (Some(host), Some(command)) = (host::get(), COMMAND.get()) {
        host.unregister_command(command);
    }
    true
}

#[allow(unsafe_code)]
#[unsafe(no_mangle)]
pub extern "C" fn plugsetup(_setup: *mut c_void) {}

/// Copy `name` into a fixed NUL-terminated C buffer, truncating if needed.
fn write_name(buf: &mut [c_char], name: &str) {
    let len = name.len().min(buf.len().saturating_sub(1));
    for (dst, &src) in buf.iter_mut().zip(&name.as_bytes()[..len]) {
        *dst = src as c_char;
    }
    if let Some(nul) = buf.get_mut(len) {
        *nul = 0;
    }
}

fn start(handle: i32) -> Result<(), PluginError> {
    let host = host::install(Host::resolve(handle)?)?;
    if let Err(e) = logger::init(host::print, LevelFilter::Info) {
        host.print(&format!("[{PLUGIN_NAME}] logger unavailable: {e}\n"));
    }

    let config = match platform_windows::plugin_dir() {
        Some(dir) => Config::load(&config::config_path(&dir)),
        None => {
            log::warn!("config: cannot locate plugin directory, using defaults");
            Config::default()
        }
    };
    log::set_max_level(config.log.effective_level());

    let context = HookContext::new(config.system_parameters.param_cache());

    let name = CString::new(config.command.effective_name())
        .map_err(|_| PluginError::RegisterCommand(config.command.name.clone()))?;
    let command = COMMAND.get_or_init(|| name);
    host.register_command(command, report_command)?;

    if let Err(e) = hooks::install(context) {
        host.unregister_command(command);
        return Err(e);
    }
    log::info!("command {:?} registered", config.command.effective_name());
    Ok(())
}

/// Diagnostics command: print the cache counters.
extern "C" fn report_command(_argc: i32, _argv: *mut *mut c_char) -> bool {
    let Some(context) = hooks::context() else {
        return false;
    };
    host::print(&context.report().to_string());
    true
}
