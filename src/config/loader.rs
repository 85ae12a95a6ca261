//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "APP_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load the process configuration: optional file named by `APP_CONFIG`,
/// then environment overrides, then validation.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable variable lookup.
pub fn load_with<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_VAR) {
        Some(path) if !path.is_empty() => read_file(Path::new(&path))?,
        _ => AppConfig::default(),
    };
    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay the recognised environment variables onto `config`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(port) = set("APP_PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "APP_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(name) = set("APP_NAME") {
        config.app.name = name;
    }
    if let Some(url) = set("SUPABASE_URL") {
        config.database.url = url;
    }
    if let Some(key) = set("SUPABASE_KEY") {
        config.database.api_key = key;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = load_with(env(&[
            ("APP_PORT", "3000"),
            ("APP_NAME", "wedding"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.app.name, "wedding");
        assert_eq!(config.database.api_key, "anon");
    }

    #[test]
    fn test_invalid_port() {
        let err = load_with(env(&[("APP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "APP_PORT", .. }));
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let err = load_with(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn test_file_then_env() {
        let path = std::env::temp_dir().join("wedding_wishes_loader_test.toml");
        std::fs::write(
            &path,
            "[app]\nname = \"from-file\"\n[listener]\nport = 4000\n[database]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = load_with(env(&[(CONFIG_PATH_VAR, path_str.as_str()), ("APP_PORT", "4001")])).unwrap();
        assert_eq!(config.app.name, "from-file");
        assert_eq!(config.listener.port, 4001);

        let direct = load_config(&path).unwrap();
        assert_eq!(direct.listener.port, 4000);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
