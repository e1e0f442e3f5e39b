use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {secrecy::Secret, tracing::{debug, warn}};

use crate::schema::ChanlogConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["chanlog.toml", "chanlog.json"];

/// Load config from the given path (format by extension).
pub fn load_config(path: &Path) -> anyhow::Result<ChanlogConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply environment
/// overrides.
///
/// Search order:
/// 1. `./chanlog.{toml,json}` (project-local)
/// 2. `~/.config/chanlog/chanlog.{toml,json}` (user-global)
///
/// Missing or unparseable files fall back to defaults.
#[must_use]
pub fn discover_and_load() -> ChanlogConfig {
    let mut config = if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                ChanlogConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        ChanlogConfig::default()
    };
    apply_overrides(&mut config, &std::env::vars().collect());
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/chanlog/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "chanlog") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Environment overrides: `SLACK_BOT_TOKEN`, `PORT`, `CHANLOG_PUBLIC_URL`,
/// `CHANLOG_DATA_DIR`. File-configured values win over the data-dir override
/// but not over the credential/port/URL ones.
fn apply_overrides(config: &mut ChanlogConfig, vars: &HashMap<String, String>) {
    if let Some(token) = vars.get("SLACK_BOT_TOKEN").filter(|t| !t.is_empty()) {
        config.slack.bot_token = Some(Secret::new(token.clone()));
    }
    if let Some(port) = vars.get("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(%port, "ignoring unparseable PORT override"),
        }
    }
    if let Some(url) = vars.get("CHANLOG_PUBLIC_URL").filter(|u| !u.is_empty()) {
        config.server.public_url = Some(url.clone());
    }
    if let Some(dir) = vars.get("CHANLOG_DATA_DIR").filter(|d| !d.is_empty()) {
        let base = PathBuf::from(dir);
        if config.access.data_dir.is_none() {
            config.access.data_dir = Some(base.join("access"));
        }
        if config.exports.dir.is_none() {
            config.exports.dir = Some(base.join("exports"));
        }
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ChanlogConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
