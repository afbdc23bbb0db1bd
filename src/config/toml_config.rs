use crate::adapters::home_api::DEFAULT_API_BASE_URL;
use crate::core::ConfigProvider;
use crate::utils::error::{DopcError, InvalidValue, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared deadline for both venue lookups of one request.
    #[serde(default = "default_request_deadline_ms")]
    pub request_deadline_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "compact" or "json"
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

fn default_port() -> u16 {
    8000
}

fn default_request_deadline_ms() -> u64 {
    5000
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    8
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_deadline_ms: default_request_deadline_ms(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DopcError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DopcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are an error.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DopcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let mut missing = None;
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        match missing {
            Some(name) => Err(DopcError::MissingEnvVarError { name }),
            None => Ok(result.into_owned()),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn port(&self) -> u16 {
        self.server.port
    }

    fn api_base_url(&self) -> &str {
        &self.upstream.base_url
    }

    fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.server.request_deadline_ms)
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    fn json_logs(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("upstream.base_url", &self.upstream.base_url)?;
        validate_positive_number("upstream.timeout_seconds", self.upstream.timeout_seconds, 1)?;
        validate_positive_number("server.request_deadline_ms", self.server.request_deadline_ms, 1)?;

        if let Some(format) = &self.logging.format {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.as_str()) {
                return Err(InvalidValue::new(
                    "logging.format",
                    format,
                    format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                )
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
port = 9000
request_deadline_ms = 2500

[upstream]
base_url = "https://api.example.com"
timeout_seconds = 3

[logging]
format = "json"
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.port(), 9000);
        assert_eq!(config.request_deadline(), Duration::from_millis(2500));
        assert_eq!(config.api_base_url(), "https://api.example.com");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(3));
        assert!(config.json_logs());
        assert!(config.is_verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.port(), 8000);
        assert_eq!(config.request_deadline(), Duration::from_secs(5));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(8));
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOPC_TEST_API_BASE", "https://test.api.com");

        let toml_content = r#"
[upstream]
base_url = "${DOPC_TEST_API_BASE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.upstream.base_url, "https://test.api.com");

        std::env::remove_var("DOPC_TEST_API_BASE");
    }

    #[test]
    fn test_missing_env_var_is_error() {
        let toml_content = r#"
[upstream]
base_url = "${DOPC_TEST_DEFINITELY_UNSET}"
"#;

        match TomlConfig::from_toml_str(toml_content) {
            Err(DopcError::MissingEnvVarError { name }) => {
                assert_eq!(name, "DOPC_TEST_DEFINITELY_UNSET")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[upstream]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(bad_format.validate().is_err());

        let zero_deadline =
            TomlConfig::from_toml_str("[server]\nrequest_deadline_ms = 0\n").unwrap();
        assert!(zero_deadline.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8123\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), 8123);
    }
}
