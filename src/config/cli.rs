use crate::adapters::home_api::DEFAULT_API_BASE_URL;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dopc")]
#[command(about = "Delivery order price calculator service")]
pub struct CliConfig {
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    #[arg(long, env = "HOME_ASSIGNMENT_API_BASE", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = "5000", help = "Shared deadline for both venue lookups")]
    pub request_deadline_ms: u64,

    #[arg(long, default_value = "8", help = "Timeout for each upstream HTTP call")]
    pub upstream_timeout_secs: u64,

    #[arg(
        long,
        help = "Load settings from a TOML file; flags and env vars given explicitly still win"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Emit JSON log lines")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Ids of settings taken from the command line or environment rather than defaults.
    #[arg(skip)]
    #[serde(skip)]
    explicit: Vec<String>,
}

/// Settings a `--config` file provides that flags may override.
const FILE_SETTINGS: [&str; 5] = [
    "port",
    "api_base_url",
    "request_deadline_ms",
    "upstream_timeout_secs",
    "log_json",
];

impl CliConfig {
    /// Parses `std::env::args`, exiting with usage on error.
    pub fn parse_args() -> Self {
        let args = Self::command().get_matches();
        Self::from_matches(&args).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Self::command().try_get_matches_from(args)?;
        Self::from_matches(&args)
    }

    fn from_matches(args: &ArgMatches) -> std::result::Result<Self, clap::Error> {
        let mut config = Self::from_arg_matches(args)?;
        config.explicit = FILE_SETTINGS
            .iter()
            .filter(|id| {
                matches!(
                    args.value_source(id),
                    Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                )
            })
            .map(|id| id.to_string())
            .collect();
        Ok(config)
    }

    pub fn is_explicit(&self, id: &str) -> bool {
        self.explicit.iter().any(|given| given == id)
    }

    /// Lays explicitly given flags and env vars over settings loaded from a file.
    pub fn apply_to(&self, file: &mut TomlConfig) {
        if self.is_explicit("port") {
            file.server.port = self.port;
        }
        if self.is_explicit("api_base_url") {
            file.upstream.base_url = self.api_base_url.clone();
        }
        if self.is_explicit("request_deadline_ms") {
            file.server.request_deadline_ms = self.request_deadline_ms;
        }
        if self.is_explicit("upstream_timeout_secs") {
            file.upstream.timeout_seconds = self.upstream_timeout_secs;
        }
        if self.is_explicit("log_json") && self.log_json {
            file.logging.format = Some("json".to_string());
        }
        if self.verbose {
            file.logging.verbose = Some(true);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn port(&self) -> u16 {
        self.port
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    fn json_logs(&self) -> bool {
        self.log_json
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_positive_number("request_deadline_ms", self.request_deadline_ms, 1)?;
        validate_positive_number("upstream_timeout_secs", self.upstream_timeout_secs, 1)?;
        Ok(())
    }
}
