use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the listinha backend
    pub server_url: String,
    /// Name of the list commands target when --list is not given
    pub default_list: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:4000".to_string(),
            default_list: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        if let Ok(server_url) = std::env::var("LISTINHA_SERVER_URL") {
            config.server_url = server_url;
        }
        if let Ok(default_list) = std::env::var("LISTINHA_DEFAULT_LIST") {
            config.default_list = Some(default_list);
        }

        Ok(config)
    }

    /// Persist the configuration, used when `list open` changes the default
    /// list.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(path.clone(), e))?;
        }
        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(path.clone(), e))?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::WriteError(path.clone(), e))
    }

    /// Default config file path: ~/.config/listinha/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("listinha")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    WriteError(PathBuf, std::io::Error),
    SerializeError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::SerializeError(path, e) => {
                write!(
                    f,
                    "Failed to serialize config file '{}': {}",
                    path.display(),
                    e
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:4000");
        assert!(config.default_list.is_none());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url, "http://localhost:4000");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "server_url: https://listinha.example.com").unwrap();
        writeln!(file, "default_list: Mercado").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url, "https://listinha.example.com");
        assert_eq!(config.default_list.as_deref(), Some("Mercado"));
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        let config = Config {
            server_url: "http://10.0.0.2:4000".to_string(),
            default_list: Some("Churrasco".to_string()),
        };
        config.save(Some(config_path.clone())).unwrap();

        let loaded = Config::load(Some(config_path)).unwrap();
        assert_eq!(loaded.server_url, "http://10.0.0.2:4000");
        assert_eq!(loaded.default_list.as_deref(), Some("Churrasco"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
