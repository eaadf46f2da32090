//! Plugin startup errors.
//!
//! Only initialization can fail. Once the hooks are live every runtime
//! problem degrades to forwarding the call to the real implementation.

use std::error::Error;
use std::fmt;

type Source = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub enum PluginError {
    /// `pluginit` ran twice in the same module instance.
    AlreadyInitialized,
    /// The debugger DLL exporting the plugin API is not loaded.
    HostModule(&'static str),
    /// A plugin API function is missing from the debugger DLL.
    HostExport(&'static str),
    /// The module or export a hook targets could not be found.
    HookTarget { module: &'static str, symbol: String },
    /// Creating or enabling a detour failed.
    Hook { symbol: String, source: Source },
    /// The diagnostics command could not be registered.
    RegisterCommand(String),
}

impl PluginError {
    pub fn hook(symbol: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Hook {
            symbol: symbol.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "plugin is already initialized"),
            Self::HostModule(module) => write!(f, "debugger module {module} is not loaded"),
            Self::HostExport(export) => write!(f, "debugger does not export {export}"),
            Self::HookTarget { module, symbol } => {
                write!(f, "cannot find {symbol} in {module}")
            }
            Self::Hook { symbol, source } => write!(f, "failed to hook {symbol}: {source}"),
            Self::RegisterCommand(name) => write!(f, "failed to register command {name:?}"),
        }
    }
}

impl Error for PluginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Hook { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::PluginError;

    #[test]
    fn display_messages() {
        assert_eq!(
            PluginError::HostExport("_plugin_logprint").to_string(),
            "debugger does not export _plugin_logprint"
        );
        assert_eq!(
            PluginError::HookTarget {
                module: "gdi32.dll",
                symbol: "GetCharABCWidthsI".to_owned(),
            }
            .to_string(),
            "cannot find GetCharABCWidthsI in gdi32.dll"
        );
        assert_eq!(
            PluginError::RegisterCommand("abcdata".to_owned()).to_string(),
            "failed to register command \"abcdata\""
        );
    }

    #[test]
    fn hook_error_keeps_source() {
        let err = PluginError::hook("SelectObject", "page is not executable");
        assert_eq!(err.to_string(), "failed to hook SelectObject: page is not executable");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("page is not executable")
        );
    }

    #[test]
    fn other_errors_have_no_source() {
        assert!(PluginError::AlreadyInitialized.source().is_none());
    }
}
