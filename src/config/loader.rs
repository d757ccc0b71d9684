//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "brigadmin.toml";

/// Load configuration, falling back to defaults when no file exists
pub fn load_config() -> Result<Config> {
    match find_config_file() {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_from_path(&path)
        }
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    parse_config(&content)
}

/// Parse configuration text after interpolating environment variables
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Search upward from the current directory, then the user config directory
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = env::current_dir() {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }
    }

    user_config_path().filter(|p| p.exists())
}

/// `<config_dir>/brigadmin/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("brigadmin").join("config.toml"))
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid interpolation pattern");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# brigadmin configuration

[api]
# Base URL of the reporting platform API
base_url = "${BRIGADMIN_API_URL:-http://localhost:5000/api}"
timeout_secs = 30

[session]
# "file" keeps you signed in between runs, "memory" forgets on exit
storage = "file"
# path = "/custom/path/session.json"
key = "auth_token"
"#
}
