//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`WATTLINE_BASE_URL`, `WATTLINE_TIMEOUT_SECS`,
//!    `WATTLINE_CREDENTIALS_PATH`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./wattline.toml in the current directory
//! 4. $XDG_CONFIG_HOME/wattline/wattline.toml (or ~/.config/wattline/wattline.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default backend API root.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api/v1";
/// Generous default request bound; some backend operations send mail.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Override for the credential file location; `None` means the
    /// per-user default under the config dir.
    pub credentials_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            credentials_path: None,
        }
    }
}

/// Raw on-disk TOML shape; everything optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    credentials_path: Option<PathBuf>,
}

/// Returns the user config root (`~/.config` or platform equivalent).
pub fn config_root_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let text = read_config_text(path_override, &read_file, &config_root)?;
    let parsed: FileConfig = match text {
        Some(text) => toml::from_str(&text)?,
        None => FileConfig::default(),
    };

    let mut config = Config {
        base_url: parsed
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        request_timeout_secs: parsed.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        credentials_path: parsed.credentials_path,
    };

    if let Some(url) = env_lookup("WATTLINE_BASE_URL") {
        config.base_url = url;
    }
    if let Some(secs) = env_lookup("WATTLINE_TIMEOUT_SECS") {
        config.request_timeout_secs = secs.trim().parse().map_err(|err| {
            ConfigError::Invalid(format!("WATTLINE_TIMEOUT_SECS is not a number: {err}"))
        })?;
    }
    if let Some(path) = env_lookup("WATTLINE_CREDENTIALS_PATH") {
        config.credentials_path = Some(PathBuf::from(path));
    }

    if config.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("base_url must not be empty".into()));
    }
    Ok(config)
}

/// Locate and read the config file text, if any exists.
///
/// An explicit --config path must exist; the fallback locations are
/// optional and missing files are skipped silently.
fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<Option<String>, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(path) = path_override {
        return Ok(Some(read_file(Path::new(path))?));
    }

    match read_file(Path::new("wattline.toml")) {
        Ok(text) => return Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    if let Some(root) = config_root() {
        let global = root.join("wattline").join("wattline.toml");
        match read_file(&global) {
            Ok(text) => return Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_files(_path: &Path) -> Result<String, std::io::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
    }

    fn no_env(_name: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = load_config_from_sources(None, no_files, no_env, || None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn local_file_overrides_defaults() {
        let read = |path: &Path| {
            if path == Path::new("wattline.toml") {
                Ok("base_url = \"https://grid.example.cn/api/v1\"\nrequest_timeout_secs = 45\n"
                    .to_string())
            } else {
                no_files(path)
            }
        };
        let config = load_config_from_sources(None, read, no_env, || None).unwrap();
        assert_eq!(config.base_url, "https://grid.example.cn/api/v1");
        assert_eq!(config.request_timeout_secs, 45);
    }

    #[test]
    fn env_overrides_file_values() {
        let read = |path: &Path| {
            if path == Path::new("wattline.toml") {
                Ok("base_url = \"https://file.example.cn\"".to_string())
            } else {
                no_files(path)
            }
        };
        let env = |name: &str| match name {
            "WATTLINE_BASE_URL" => Some("https://env.example.cn".to_string()),
            _ => None,
        };
        let config = load_config_from_sources(None, read, env, || None).unwrap();
        assert_eq!(config.base_url, "https://env.example.cn");
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let err = load_config_from_sources(Some("/nope/wattline.toml"), no_files, no_env, || None)
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().starts_with("io:"), "got: {err}");
    }

    #[test]
    fn global_file_is_used_when_local_is_absent() {
        let read = |path: &Path| {
            if path.ends_with("wattline/wattline.toml") {
                Ok("request_timeout_secs = 60".to_string())
            } else {
                no_files(path)
            }
        };
        let config =
            load_config_from_sources(None, read, no_env, || Some(PathBuf::from("/home/u/.config")))
                .unwrap();
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn bad_timeout_env_is_rejected() {
        let env = |name: &str| match name {
            "WATTLINE_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        };
        let err = load_config_from_sources(None, no_files, env, || None)
            .expect_err("non-numeric timeout should fail");
        assert!(err.to_string().contains("WATTLINE_TIMEOUT_SECS"));
    }
}
