use std::{collections::HashMap, fs, str::FromStr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::{LocalStateSource, RemoteStateSource, StateSource};
use storage::BlobStore;

/// Which of the two state-source implementations to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    Remote,
    Local,
}

impl FromStr for SourceMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "api" => Ok(SourceMode::Remote),
            "local" => Ok(SourceMode::Local),
            other => Err(anyhow!("unknown source mode '{other}': expected 'remote' or 'local'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mode: SourceMode,
    pub api_base: String,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SourceMode::Remote,
            api_base: "http://127.0.0.1:8787".into(),
            database_url: "sqlite://./data/checklist.db".into(),
        }
    }
}

/// Defaults, then `checklist.toml`, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("checklist.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("mode") {
                if let Ok(mode) = v.parse() {
                    settings.mode = mode;
                }
            }
            if let Some(v) = file_cfg.get("api_base") {
                settings.api_base = v.clone();
            }
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("CHECKLIST_MODE") {
        if let Ok(mode) = v.parse() {
            settings.mode = mode;
        }
    }
    if let Ok(v) = std::env::var("APP__MODE") {
        if let Ok(mode) = v.parse() {
            settings.mode = mode;
        }
    }

    if let Ok(v) = std::env::var("CHECKLIST_API_BASE") {
        settings.api_base = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    settings
}

/// Builds the configured state source. The selection happens once, here;
/// callers only ever see the four-method contract.
pub async fn build_state_source(settings: &Settings) -> Result<Arc<dyn StateSource>> {
    match settings.mode {
        SourceMode::Remote => {
            let api_base = validate_api_base(&settings.api_base)?;
            info!(api_base = %api_base, "using remote checklist service");
            Ok(Arc::new(RemoteStateSource::new(api_base)))
        }
        SourceMode::Local => {
            let database_url = normalize_database_url(&settings.database_url);
            let store = BlobStore::new(&database_url)
                .await
                .with_context(|| format!("failed to open local store at '{database_url}'"))?;
            info!(database_url = %database_url, "using local checklist fallback");
            Ok(Arc::new(LocalStateSource::new(store)))
        }
    }
}

fn validate_api_base(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).with_context(|| format!("invalid api base '{raw}'"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!(
            "api base '{raw}' must use http or https, got '{}'",
            parsed.scheme()
        ));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_plain_file_path_to_sqlite_url() {
        assert_eq!(
            normalize_database_url("./data/test.db"),
            "sqlite://./data/test.db"
        );
        assert_eq!(
            normalize_database_url("sqlite:./data/test.db"),
            "sqlite://./data/test.db"
        );
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn api_base_must_be_an_http_url() {
        assert_eq!(
            validate_api_base("https://example.workers.dev/").expect("valid"),
            "https://example.workers.dev"
        );
        assert!(validate_api_base("not a url").is_err());
        assert!(validate_api_base("ftp://example.com").is_err());
    }

    #[test]
    fn source_mode_parses_both_aliases() {
        assert_eq!("remote".parse::<SourceMode>().expect("mode"), SourceMode::Remote);
        assert_eq!("API".parse::<SourceMode>().expect("mode"), SourceMode::Remote);
        assert_eq!("local".parse::<SourceMode>().expect("mode"), SourceMode::Local);
        assert!("cloud".parse::<SourceMode>().is_err());
    }
}
