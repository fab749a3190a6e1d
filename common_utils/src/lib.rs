// common_utils/src/lib.rs

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use expert_core::ExpertError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const TIMEOUT_VAR: &str = "EXPERT_LLM_TIMEOUT_SECS";
pub const SERVER_ADDR_VAR: &str = "SERVER_ADDR";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8383";

/// Everything the chat client needs to reach the provider.
#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmSettings {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// The key never reaches logs.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub server_addr: SocketAddr,
}

impl AppConfig {
    /// Reads the process environment. Call [`load_env_files`] first.
    pub fn from_env() -> Result<Self, ExpertError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExpertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ExpertError::configuration(format!("{} is not set", API_KEY_VAR)))?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ExpertError::configuration(format!(
                "{} must be an http(s) URL, got '{}'",
                BASE_URL_VAR, base_url
            )));
        }

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ExpertError::configuration(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        TIMEOUT_VAR, raw
                    )))
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let raw_addr = lookup(SERVER_ADDR_VAR).unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr: SocketAddr = raw_addr.trim().parse().map_err(|e| {
            ExpertError::configuration(format!("{} is not a socket address ('{}'): {}", SERVER_ADDR_VAR, raw_addr, e))
        })?;

        Ok(Self {
            llm: LlmSettings {
                api_key,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            server_addr,
        })
    }
}

/// What [`load_env_files`] did. Loading happens before logging is set up, so
/// the caller reports it once a subscriber exists.
#[derive(Debug, Default)]
#[must_use = "call `log()` once tracing is initialised"]
pub struct EnvLoadReport {
    pub loaded: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, String)>,
}

impl EnvLoadReport {
    pub fn log(&self) {
        for path in &self.loaded {
            tracing::debug!("[Config] Loaded {}", path.display());
        }
        for (path, reason) in &self.unreadable {
            tracing::warn!("[Config] Ignoring unreadable {}: {}", path.display(), reason);
        }
    }
}

/// `~/.expert_llm/.env` first, then `./.env`.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".expert_llm").join(".env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Loads [`env_file_candidates`] in order.
///
/// The first file to define a variable wins and the real process environment
/// wins over both. Missing files are skipped silently.
pub fn load_env_files() -> EnvLoadReport {
    load_env_paths(&env_file_candidates())
}

fn load_env_paths(paths: &[PathBuf]) -> EnvLoadReport {
    let mut report = EnvLoadReport::default();
    for path in paths.iter().filter(|p| p.exists()) {
        match dotenvy::from_path(path) {
            Ok(()) => report.loaded.push(path.clone()),
            Err(e) => report.unreadable.push((path.clone(), e.to_string())),
        }
    }
    report
}
