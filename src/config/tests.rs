//! Configuration unit tests.

use std::path::{Path, PathBuf};

use abccache_core::param_cache::SPI_GETNONCLIENTMETRICS;
use log::LevelFilter;

use super::*;

/// Unique scratch file under the system temp dir, removed on drop.
struct TempFile(PathBuf);

impl TempFile {
    fn with_contents(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("abc_cache_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write temp config");
        Self(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn default_config_roundtrip() {
    let cfg = Config::default();
    let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
    let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
    assert_eq!(parsed.command.name, "abcdata");
    assert!(parsed.system_parameters.enabled);
    assert_eq!(parsed.system_parameters.action, SPI_GETNONCLIENTMETRICS);
    assert_eq!(parsed.log.level, "info");
}

#[test]
fn empty_toml_gives_defaults() {
    let parsed: Config = toml::from_str("").expect("deserialize");
    assert_eq!(parsed.command.effective_name(), "abcdata");
    assert!(parsed.system_parameters.enabled);
    assert_eq!(parsed.log.effective_level(), LevelFilter::Info);
}

#[test]
fn partial_toml_uses_defaults() {
    let toml_str = r#"
[command]
name = "fontstats"
"#;
    let parsed: Config = toml::from_str(toml_str).expect("deserialize");
    assert_eq!(parsed.command.effective_name(), "fontstats");
    // Other fields should be defaults
    assert!(parsed.system_parameters.enabled);
    assert_eq!(parsed.log.level, "info");
}

#[test]
fn blank_command_name_falls_back() {
    let toml_str = r#"
[command]
name = "   "
"#;
    let parsed: Config = toml::from_str(toml_str).expect("deserialize");
    assert_eq!(parsed.command.effective_name(), DEFAULT_COMMAND);
}

#[test]
fn system_parameters_from_toml() {
    let toml_str = r#"
[system_parameters]
enabled = true
action = 104
"#;
    let parsed: Config = toml::from_str(toml_str).expect("deserialize");
    let cache = parsed.system_parameters.param_cache();
    assert_eq!(cache.action(), Some(104));
    assert!(!cache.caches(SPI_GETNONCLIENTMETRICS));
}

#[test]
fn system_parameters_can_be_disabled() {
    let toml_str = r#"
[system_parameters]
enabled = false
"#;
    let parsed: Config = toml::from_str(toml_str).expect("deserialize");
    assert!(parsed.system_parameters.param_cache().action().is_none());
}

#[test]
fn log_level_variants() {
    let level = |s: &str| {
        LogConfig {
            level: s.to_owned(),
        }
        .effective_level()
    };
    assert_eq!(level("off"), LevelFilter::Off);
    assert_eq!(level("warn"), LevelFilter::Warn);
    assert_eq!(level("DEBUG"), LevelFilter::Debug);
    assert_eq!(level(" trace "), LevelFilter::Trace);
    assert_eq!(level("verbose"), LevelFilter::Info);
}

#[test]
fn config_path_ends_with_toml() {
    let path = config_path(Path::new("plugins"));
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(CONFIG_FILE));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
}

#[test]
fn load_missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("abc_cache_definitely_missing.toml");
    let cfg = Config::load(&path);
    assert_eq!(cfg.command.name, "abcdata");
}

#[test]
fn load_reads_file() {
    let file = TempFile::with_contents(
        "load_reads_file.toml",
        "[log]\nlevel = \"debug\"\n[system_parameters]\nenabled = false\n",
    );
    let cfg = Config::load(&file.0);
    assert_eq!(cfg.log.effective_level(), LevelFilter::Debug);
    assert!(!cfg.system_parameters.enabled);
}

#[test]
fn load_invalid_file_gives_defaults() {
    let file = TempFile::with_contents("load_invalid.toml", "[command\nname = ");
    let cfg = Config::load(&file.0);
    assert_eq!(cfg.command.name, "abcdata");
    assert!(cfg.system_parameters.enabled);
}
