//! Configuration file management for pagefetch.
//!
//! Settings can come from three places, merged with clear precedence:
//!
//! 1. Default values (lowest priority)
//! 2. Configuration file, only when passed with `--config`
//! 3. Command-line arguments (highest priority)
//!
//! # Example Configuration File
//!
//! ```toml
//! url = "https://example.com/"
//! timeout = 30
//! user_agent = "pagefetch/0.1.0"
//! system_proxy = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::FetchOptions;

/// Main configuration structure for pagefetch.
///
/// All fields are optional to support partial configuration and merging.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// URL to fetch
    pub url: Option<String>,
    /// Request timeout in seconds; the client default applies when unset
    pub timeout: Option<u64>,
    /// User-Agent header sent with the request
    pub user_agent: Option<String>,
    /// Honour proxy settings from the environment
    pub system_proxy: Option<bool>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - File could not be read
    /// * `ConfigError::Parse` - File contains invalid TOML
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use pagefetch::config::Config;
    /// let config = Config::from_file("pagefetch.toml")?;
    /// # Ok::<(), pagefetch::config::ConfigError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Merges this configuration with another, prioritizing the other's values.
    ///
    /// ```
    /// # use pagefetch::config::Config;
    /// let cli = Config {
    ///     url: Some("https://example.com/".to_string()),
    ///     timeout: None,
    ///     user_agent: None,
    ///     system_proxy: None,
    /// };
    /// let merged = Config::default().merge_with(cli);
    /// assert_eq!(merged.url.as_deref(), Some("https://example.com/"));
    /// assert!(merged.user_agent.is_some());
    /// ```
    pub fn merge_with(mut self, other: Config) -> Self {
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }
        if other.system_proxy.is_some() {
            self.system_proxy = other.system_proxy;
        }
        self
    }

    /// Creates a Config from command-line arguments for merging.
    ///
    /// Only provided arguments (Some values) override other configurations.
    pub fn from_cli_args(
        url: Option<String>,
        timeout: Option<u64>,
        user_agent: Option<String>,
        no_proxy: bool,
    ) -> Self {
        Config {
            url,
            timeout,
            user_agent,
            system_proxy: if no_proxy { Some(false) } else { None },
        }
    }

    /// Rejects values the HTTP client cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == Some(0) {
            return Err(ConfigError::Validation(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(agent) = &self.user_agent {
            if agent.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "user_agent cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.timeout.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
            system_proxy: self.system_proxy.unwrap_or(true),
        }
    }

    /// Generates an example configuration file in TOML format.
    pub fn example_toml() -> String {
        let example = Config {
            url: Some("https://example.com/".to_string()),
            timeout: Some(30),
            user_agent: Some(default_user_agent()),
            system_proxy: Some(true),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

impl Default for Config {
    /// - `url`: None (must be provided)
    /// - `timeout`: None (client default)
    /// - `user_agent`: `pagefetch/<version>`
    /// - `system_proxy`: true
    fn default() -> Self {
        Config {
            url: None,
            timeout: None,
            user_agent: Some(default_user_agent()),
            system_proxy: Some(true),
        }
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (invalid values)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            url = "https://jpbd.dev/"
            timeout = 5
            user_agent = "probe/1.0"
            system_proxy = false
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(config.url, Some("https://jpbd.dev/".to_string()));
        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.user_agent, Some("probe/1.0".to_string()));
        assert_eq!(config.system_proxy, Some(false));
    }

    #[test]
    fn test_partial_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"timeout = 12\n").unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.url, None);
        assert_eq!(config.timeout, Some(12));
    }

    #[test]
    fn test_config_merge() {
        let base_config = Config {
            url: Some("https://base.com/".to_string()),
            timeout: Some(10),
            user_agent: Some("base".to_string()),
            system_proxy: Some(true),
        };

        let override_config = Config {
            url: Some("https://override.com/".to_string()),
            timeout: None,
            user_agent: None,
            system_proxy: Some(false),
        };

        let merged = base_config.merge_with(override_config);

        assert_eq!(merged.url, Some("https://override.com/".to_string()));
        assert_eq!(merged.timeout, Some(10)); // From base (not overridden)
        assert_eq!(merged.user_agent, Some("base".to_string()));
        assert_eq!(merged.system_proxy, Some(false)); // Overridden
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.url, None);
        assert_eq!(config.timeout, None);
        assert_eq!(
            config.user_agent,
            Some(format!("pagefetch/{}", env!("CARGO_PKG_VERSION")))
        );
        assert_eq!(config.system_proxy, Some(true));
    }

    #[test]
    fn test_config_from_cli_args() {
        let config = Config::from_cli_args(
            Some("https://cli.com/".to_string()),
            Some(3),
            Some("cli-agent".to_string()),
            true,
        );

        assert_eq!(config.url, Some("https://cli.com/".to_string()));
        assert_eq!(config.timeout, Some(3));
        assert_eq!(config.user_agent, Some("cli-agent".to_string()));
        assert_eq!(config.system_proxy, Some(false));

        let config = Config::from_cli_args(None, None, None, false);
        assert_eq!(config.system_proxy, None);
    }

    #[test]
    fn test_invalid_toml() {
        let invalid_toml = "url = [invalid toml";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        let result = Config::from_file(temp_file.path());
        assert!(result.is_err());

        match result.unwrap_err() {
            ConfigError::Parse(_) => {} // Expected
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        match Config::from_file("/nonexistent/pagefetch.toml") {
            Err(ConfigError::Io(_)) => {}
            other => panic!("Expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let zero_timeout =
            Config::default().merge_with(Config::from_cli_args(None, Some(0), None, false));
        assert!(matches!(
            zero_timeout.validate(),
            Err(ConfigError::Validation(_))
        ));

        let blank_agent = Config::default().merge_with(Config::from_cli_args(
            None,
            None,
            Some(" ".to_string()),
            false,
        ));
        assert!(blank_agent.validate().is_err());
    }

    #[test]
    fn test_fetch_options() {
        let config =
            Config::default().merge_with(Config::from_cli_args(None, Some(7), None, true));
        let options = config.fetch_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(7)));
        assert!(!options.system_proxy);
        assert_eq!(options.user_agent, config.user_agent);
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml();

        // Should be valid TOML
        let parsed: Config = toml::from_str(&example).unwrap();

        assert!(parsed.url.is_some());
        assert_eq!(parsed.timeout, Some(30));
        assert!(parsed.validate().is_ok());
    }
}
