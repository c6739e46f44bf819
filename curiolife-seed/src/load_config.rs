/// `load_config` module: merges the optional YAML config file with environment variables
/// into the [`SeedConfig`] the CLI runs with.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file (no secrets) into typed sections
/// - Apply environment overrides: `STRAPI_API_URL`, `STRAPI_API_TOKEN`, `CURIOLIFE_ENV`
/// - Fall back to defaults for everything that is not given
///
/// The API token is never read from the file. Whether it is required is decided
/// by the command that runs, see [`SeedConfig::require_api_token`].
///
/// # Errors
/// All errors use `anyhow::Error` for context-rich diagnostics and surface at the CLI boundary.
use anyhow::Result;
use curiolife_seed_core::guard::GuardPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const DEFAULT_API_URL: &str = "http://localhost:1337/api";
pub const DEFAULT_ENVIRONMENT: &str = "development";

pub const API_URL_VAR: &str = "STRAPI_API_URL";
pub const API_TOKEN_VAR: &str = "STRAPI_API_TOKEN";
pub const ENVIRONMENT_VAR: &str = "CURIOLIFE_ENV";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub direct: DirectSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectSection {
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub guard: Option<GuardPolicy>,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub data: Option<PathBuf>,
    pub api_url: String,
    pub api_token: Option<String>,
    pub environment: String,
    pub guard: GuardPolicy,
}

/// Printed when the REST importer is started without a token.
pub const TOKEN_USAGE: &str = "\
ERROR: STRAPI_API_TOKEN environment variable is required!

Usage:
  STRAPI_API_TOKEN=\"your-token-here\" curiolife-seed api

Or for production:
  STRAPI_API_URL=\"https://your-domain.strapiapp.com/api\" \\
  STRAPI_API_TOKEN=\"your-token-here\" \\
  curiolife-seed api
";

impl SeedConfig {
    pub fn require_api_token(&self) -> Result<&str> {
        match self.api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => {
                error!("{API_TOKEN_VAR} environment variable not set");
                anyhow::bail!("{API_TOKEN_VAR} environment variable is required")
            }
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let config_content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is a valid, empty config.
    if config_content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Loads the optional YAML file at `path` and applies environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<SeedConfig> {
    let file = match path {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let api_url = env_var(API_URL_VAR)
        .or(file.api.url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let environment = env_var(ENVIRONMENT_VAR)
        .or(file.direct.environment)
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
    let api_token = env_var(API_TOKEN_VAR);

    let config = SeedConfig {
        data: file.data,
        api_url,
        api_token,
        environment,
        guard: file.direct.guard.unwrap_or_default(),
    };

    info!(
        api_url = %config.api_url,
        environment = %config.environment,
        guard = ?config.guard,
        token_set = config.api_token.is_some(),
        "Config loaded and merged successfully"
    );
    Ok(config)
}
