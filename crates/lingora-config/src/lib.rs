//! Configuration for the lingora tools.
//!
//! Search order: `lingora.toml` in the working directory, then
//! `<config dir>/lingora/lingora.toml`. Values found first win;
//! missing fields fall through to the next file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LingoraConfig {
    /// Fallback language for resolution (defaults to "en").
    pub default_lang: Option<String>,
    /// Registered applications, in resolution order.
    pub apps: Option<Vec<AppCfg>>,
    pub log: Option<LogCfg>,
    pub overrides: Option<OverridesCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppCfg {
    pub name: String,
    /// Source root; relative paths are resolved against the config
    /// file's directory.
    pub root: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogCfg {
    /// Directory for the rolling log file.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverridesCfg {
    /// Path of the JSON override store used by the CLI.
    pub path: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<LingoraConfig, ConfigError> {
    let mut merged = LingoraConfig::default();
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(cfg) = read_config_file(&cwd.join("lingora.toml")) {
            merged = merge(merged, cfg);
        }
    }
    if let Some(base) = dirs::config_dir() {
        if let Some(cfg) = read_config_file(&base.join("lingora").join("lingora.toml")) {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config_file(path: &Path) -> Option<LingoraConfig> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut cfg: LingoraConfig = toml::from_str(&text).ok()?;
    if let Some(apps) = &mut cfg.apps {
        let base = path.parent().unwrap_or(Path::new("."));
        for app in apps {
            let root = PathBuf::from(&app.root);
            if root.is_relative() {
                app.root = base.join(root).to_string_lossy().into_owned();
            }
        }
    }
    Some(cfg)
}

fn merge(mut a: LingoraConfig, b: LingoraConfig) -> LingoraConfig {
    if a.default_lang.is_none() {
        a.default_lang = b.default_lang;
    }
    if a.apps.is_none() {
        a.apps = b.apps;
    }
    a.log = merge_opt(a.log, b.log, merge_log);
    a.overrides = merge_opt(a.overrides, b.overrides, merge_overrides);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_log(mut a: LogCfg, b: LogCfg) -> LogCfg {
    if a.dir.is_none() {
        a.dir = b.dir;
    }
    a
}

fn merge_overrides(mut a: OverridesCfg, b: OverridesCfg) -> OverridesCfg {
    if a.path.is_none() {
        a.path = b.path;
    }
    a
}
