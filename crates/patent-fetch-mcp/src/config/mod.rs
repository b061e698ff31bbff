//! Configuration loading and resolution.

use std::path::PathBuf;
use std::time::Duration;

use patent_fetch::FetchConfig;

/// Environment variables honored by the server and CLI.
pub const ENV_BASE_URL: &str = "PATENT_FETCH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PATENT_FETCH_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "PATENT_FETCH_USER_AGENT";
pub const ENV_OUTPUT_DIR: &str = "PATENT_FETCH_OUTPUT_DIR";

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub fetch: FetchConfig,
    pub output_dir: PathBuf,
}

impl ServerConfig {
    /// Build a config from the environment, with defaults for anything unset.
    pub fn from_env() -> Self {
        let mut fetch = FetchConfig::default();

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                fetch.base_url = base_url;
            }
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => fetch.timeout = Duration::from_secs(parsed),
                _ => tracing::warn!("Ignoring invalid {ENV_TIMEOUT_SECS}={secs:?}"),
            }
        }
        if let Ok(user_agent) = std::env::var(ENV_USER_AGENT) {
            if !user_agent.trim().is_empty() {
                fetch.user_agent = user_agent;
            }
        }

        Self {
            fetch,
            output_dir: resolve_output_dir(None),
        }
    }
}

/// Resolve the output directory: explicit flag, then environment, then
/// the current directory.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    if let Ok(env_dir) = std::env::var(ENV_OUTPUT_DIR) {
        if !env_dir.trim().is_empty() {
            return PathBuf::from(env_dir);
        }
    }

    PathBuf::from(".")
}
