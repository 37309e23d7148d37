use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "money.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            request_timeout_ms: None,
        }
    }
}

impl Settings {
    /// A zero timeout means "no timeout", same as leaving it unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn with_overrides(mut self, server_url: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        if timeout_ms.is_some() {
            self.request_timeout_ms = timeout_ms;
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    timeout_ms: Option<u64>,
}

/// Defaults, then the TOML file, then the environment.
///
/// An explicit `config_path` must exist and parse; the implicit `money.toml`
/// in the working directory is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    match fs::read_to_string(&path) {
        Ok(raw) => {
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config file");
        }
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |name| std::env::var(name).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url.filter(|v| !v.trim().is_empty()) {
        settings.server_url = v.trim().to_string();
    }
    if let Some(v) = file_cfg.timeout_ms {
        settings.request_timeout_ms = Some(v);
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    for name in ["MONEY_SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = non_empty(name) {
            settings.server_url = v.trim().to_string();
        }
    }

    for name in ["MONEY_TIMEOUT_MS", "APP__TIMEOUT_MS"] {
        if let Some(v) = non_empty(name) {
            let parsed = v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{name} must be a whole number of milliseconds"))?;
            settings.request_timeout_ms = Some(parsed);
        }
    }

    Ok(())
}
