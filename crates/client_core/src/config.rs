use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::warn;
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const CONFIG_FILE: &str = "trendflow.toml";
// Generation runs a multi-agent pipeline server side and routinely takes minutes.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub request_timeout: Duration,
    pub session_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            session_path: default_session_path(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_url(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            ..Self::default()
        })
    }

    /// Base URL without trailing slash, ready for `format!("{base}/posts")`.
    pub fn base_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }
}

fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trendflow")
        .join("session.json")
}

pub fn parse_api_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidConfig("api url is empty".into()));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| ClientError::InvalidConfig(format!("api url '{trimmed}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidConfig(format!(
            "api url '{trimmed}' must use http or https"
        )));
    }
    Ok(url)
}

/// Defaults, then `trendflow.toml` in the working directory, then environment.
pub fn load_config() -> Result<ClientConfig> {
    let file_cfg = read_config_file(Path::new(CONFIG_FILE))?;
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_config(&file_cfg, &env)
}

/// A missing file is an empty layer; an unreadable one is skipped with a warning.
fn read_config_file(path: &Path) -> Result<HashMap<String, String>> {
    match fs::read_to_string(path) {
        Ok(raw) => flatten_toml(&raw),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config file unreadable, using defaults");
            Ok(HashMap::new())
        }
    }
}

/// Top-level scalars only; `request_timeout_secs = 30` and `"30"` both work.
fn flatten_toml(raw: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(raw)
        .map_err(|err| ClientError::InvalidConfig(format!("{CONFIG_FILE}: {err}")))?;
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect())
}

pub(crate) fn resolve_config(
    file_cfg: &HashMap<String, String>,
    env: &HashMap<String, String>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::default();

    if let Some(v) = file_cfg.get("api_url") {
        config.api_url = parse_api_url(v)?;
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        config.request_timeout = parse_timeout(v)?;
    }
    if let Some(v) = file_cfg.get("session_path") {
        config.session_path = PathBuf::from(v);
    }

    if let Some(v) = env.get("TRENDFLOW_API_URL") {
        config.api_url = parse_api_url(v)?;
    }
    if let Some(v) = env.get("APP__API_URL") {
        config.api_url = parse_api_url(v)?;
    }
    if let Some(v) = env.get("APP__REQUEST_TIMEOUT_SECS") {
        config.request_timeout = parse_timeout(v)?;
    }
    if let Some(v) = env.get("TRENDFLOW_SESSION_PATH") {
        config.session_path = PathBuf::from(v);
    }

    Ok(config)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|err| ClientError::InvalidConfig(format!("request timeout '{raw}': {err}")))
}
