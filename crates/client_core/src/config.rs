use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{bail, Context};
use url::Url;

pub const SETTINGS_FILE: &str = "predict.toml";

/// Base URL baked in at build time, e.g. `PREDICT_API_URL=https://... cargo build`.
const BUILD_API_URL: Option<&str> = option_env!("PREDICT_API_URL");
const FALLBACK_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: BUILD_API_URL.unwrap_or(FALLBACK_API_URL).into(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Defaults, then `predict.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let file_contents = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file_contents.as_deref(), |key| std::env::var(key).ok())
}

fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("api_url") {
                settings.api_url = v.clone();
            }
            if let Some(v) = file_cfg.get("output_dir") {
                settings.output_dir = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("PREDICT_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("PREDICT_OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }

    settings
}

/// Trims whitespace and trailing slashes and checks the URL is http(s).
pub fn normalize_api_url(raw_api_url: &str) -> anyhow::Result<String> {
    let trimmed = raw_api_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("prediction service URL is empty");
    }

    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid prediction service URL '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "prediction service URL must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
