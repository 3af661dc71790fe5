use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const LOCAL_DB_DIR: &str = "db";
pub const LOCAL_SNAPSHOT_DB_FILE: &str = "cinelist.db";

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const ENV_API_TOKEN: &str = "CINELIST_API_TOKEN";
pub const ENV_API_KEY: &str = "CINELIST_API_KEY";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub poster_base_url: String,
    pub snapshot_db: PathBuf,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            api_key: None,
            language: None,
            poster_base_url: DEFAULT_POSTER_BASE_URL.to_string(),
            snapshot_db: local_snapshot_db_path(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "base_url")]
    api_base_url: Option<String>,
    api_token: Option<String>,
    api_key: Option<String>,
    language: Option<String>,
    #[serde(alias = "image_base_url")]
    poster_base_url: Option<String>,
    snapshot_db: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Load `config.json` from the working directory, then apply env overrides.
pub fn load_config() -> AppConfig {
    let mut cfg = load_config_from(Path::new(CONFIG_FILE));
    apply_env_overrides(&mut cfg, |name| env::var(name).ok());
    cfg
}

pub fn load_config_from(cfg_path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(url) = non_empty(parsed.api_base_url) {
                    cfg.api_base_url = url.trim_end_matches('/').to_string();
                    if raw.contains("\"base_url\"") {
                        warn!("`base_url` is deprecated; rename it to `api_base_url` in config.json.");
                    }
                }
                if let Some(token) = non_empty(parsed.api_token) {
                    cfg.api_token = Some(token);
                }
                if let Some(key) = non_empty(parsed.api_key) {
                    cfg.api_key = Some(key);
                }
                if let Some(lang) = non_empty(parsed.language) {
                    cfg.language = Some(lang);
                }
                if let Some(url) = non_empty(parsed.poster_base_url) {
                    cfg.poster_base_url = url.trim_end_matches('/').to_string();
                }
                if let Some(path) = non_empty(parsed.snapshot_db) {
                    cfg.snapshot_db = PathBuf::from(path);
                }
                if let Some(secs) = parsed.request_timeout_secs {
                    if secs == 0 {
                        warn!(
                            "request_timeout_secs must be positive; keeping {DEFAULT_REQUEST_TIMEOUT_SECS}s."
                        );
                    } else {
                        cfg.request_timeout = Duration::from_secs(secs);
                    }
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", cfg_path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", cfg_path.display());
        }
    }

    cfg
}

/// Secrets may come from the environment instead of the config file.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_empty(lookup(ENV_API_TOKEN)) {
        cfg.api_token = Some(token);
    }
    if let Some(key) = non_empty(lookup(ENV_API_KEY)) {
        cfg.api_key = Some(key);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn local_snapshot_db_path() -> PathBuf {
    PathBuf::from(LOCAL_DB_DIR).join(LOCAL_SNAPSHOT_DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.snapshot_db, local_snapshot_db_path());
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn parses_fields_and_trims_trailing_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "api_base_url": "http://localhost:9000/3/",
                "api_token": "  abc  ",
                "language": "en-US",
                "image_base_url": "http://img.local/w342/",
                "snapshot_db": "state/test.db",
                "request_timeout_secs": 3
            }"#,
        )
        .unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_base_url, "http://localhost:9000/3");
        assert_eq!(cfg.api_token.as_deref(), Some("abc"));
        assert_eq!(cfg.language.as_deref(), Some("en-US"));
        assert_eq!(cfg.poster_base_url, "http://img.local/w342");
        assert_eq!(cfg.snapshot_db, PathBuf::from("state/test.db"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_timeout_and_bad_json_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "request_timeout_secs": 0, "api_key": "" }"#).unwrap();
        let cfg = load_config_from(&path);
        assert_eq!(
            cfg.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert!(cfg.api_key.is_none());

        fs::write(&path, "{ not json").unwrap();
        let cfg = load_config_from(&path);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn env_overrides_secrets() {
        let mut cfg = AppConfig {
            api_token: Some("from-file".into()),
            ..AppConfig::default()
        };
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_API_TOKEN, "from-env"), (ENV_API_KEY, " ")]);
        apply_env_overrides(&mut cfg, |name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.api_token.as_deref(), Some("from-env"));
        assert!(cfg.api_key.is_none());
    }
}
