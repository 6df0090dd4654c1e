//! Process configuration
//!
//! Loads configuration with priority:
//! 1. The TOML file named by `URLBOX_CONFIG` (values may reference `${VAR}`)
//! 2. Environment variables (fallback for anything the file leaves out)
//! 3. Defaults

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.urlbox.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

const API_KEY_VAR: &str = "API_KEY";
const SECRET_KEY_VAR: &str = "SECRET_KEY";
const BASE_URL_VAR: &str = "URLBOX_BASE_URL";
const TIMEOUT_VAR: &str = "URLBOX_TIMEOUT_SECS";
const OUTPUT_DIRS_VAR: &str = "URLBOX_OUTPUT_DIRS";
const CONFIG_FILE_VAR: &str = "URLBOX_CONFIG";

/// Urlbox server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct UrlboxConfig {
    /// Publishable key, kept for completeness; requests authenticate with the secret
    pub api_key: String,
    /// Secret sent as the bearer token
    pub secret: String,
    pub base_url: String,
    /// Client-side limit for one render request
    pub request_timeout_secs: u64,
    /// Replaces the default output directories when non-empty
    pub output_dirs: Vec<PathBuf>,
}

/// On-disk shape; everything optional so the environment can fill gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    secret: Option<String>,
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    output_dirs: Vec<String>,
}

impl UrlboxConfig {
    /// Load from `URLBOX_CONFIG` when set, otherwise from the environment.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_FILE_VAR) {
            Ok(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => Self::from_env(),
        }
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_from_with(path, |name| env::var(name).ok())
    }

    fn load_from_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        tracing::debug!("Loading configuration from: {:?}", path);

        let contents = fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let file: FileConfig = toml::from_str(&contents).map_err(|e| {
            Error::config_error(format!("Failed to parse config file {path:?}: {e}"))
        })?;

        Self::resolve(file, &lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::resolve(FileConfig::default(), &lookup)
    }

    fn resolve(file: FileConfig, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let from_file = |value: Option<String>| {
            value
                .and_then(|v| resolve_env_var(&v, lookup))
                .filter(|v| !v.is_empty())
        };
        let from_env = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let api_key = from_file(file.api_key)
            .or_else(|| from_env(API_KEY_VAR))
            .ok_or_else(|| missing(API_KEY_VAR))?;
        let secret = from_file(file.secret)
            .or_else(|| from_env(SECRET_KEY_VAR))
            .ok_or_else(|| missing(SECRET_KEY_VAR))?;

        let base_url = from_file(file.base_url)
            .or_else(|| from_env(BASE_URL_VAR))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let request_timeout_secs = match file.request_timeout_secs {
            Some(secs) => secs,
            None => match from_env(TIMEOUT_VAR) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    Error::config_error(format!(
                        "{TIMEOUT_VAR} must be a whole number of seconds, got `{raw}`"
                    ))
                })?,
                None => DEFAULT_REQUEST_TIMEOUT_SECS,
            },
        };
        if request_timeout_secs == 0 {
            return Err(Error::config_error("request timeout must be at least 1 second"));
        }

        let mut output_dirs: Vec<PathBuf> = file
            .output_dirs
            .iter()
            .filter_map(|dir| resolve_env_var(dir, lookup))
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();
        if output_dirs.is_empty() {
            if let Some(raw) = from_env(OUTPUT_DIRS_VAR) {
                output_dirs = env::split_paths(&raw)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect();
            }
        }

        Ok(Self {
            api_key,
            secret,
            base_url,
            request_timeout_secs,
            output_dirs,
        })
    }

    /// Endpoint for synchronous renders.
    pub fn render_endpoint(&self) -> String {
        format!("{}/v1/render/sync", self.base_url)
    }

    /// Create test-friendly defaults (no real credentials)
    pub fn test_defaults() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            secret: "test-secret".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            output_dirs: Vec::new(),
        }
    }
}

fn missing(var: &str) -> Error {
    Error::config_error(format!(
        "{var} is not set. Export it or add it to a .env file"
    ))
}

/// Resolve a single ${VAR_NAME} reference
fn resolve_env_var(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        lookup(var_name)
    } else {
        Some(value.to_string())
    }
}
