//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified
//! via `-f` flag or the `FEATURESMITH_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `FEATURESMITH_`
//!
//! For nested values, use double underscores in environment variables, e.g.
//! `FEATURESMITH_OPENAI__MODEL=gpt-4o` sets `openai.model`.
//!
//! Credentials are deliberately absent here: the tracking-service access
//! token and the completion-service API key arrive with each request and are
//! passed through, never stored.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "FEATURESMITH_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Directory where generated .feature files are written
    pub output_dir: PathBuf,
    /// Origins allowed by CORS; "*" allows any origin
    pub allowed_origins: Vec<String>,
    /// Work item tracking service settings
    pub devops: DevOpsConfig,
    /// Completion service settings
    pub openai: OpenAiConfig,
}

/// Settings for the project-tracking service REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevOpsConfig {
    /// Base URL of the tracking service (overridable for tests)
    pub base_url: Url,
    /// REST API version sent with every work item fetch
    pub api_version: String,
}

/// Settings for the OpenAI-compatible completion service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Base URL of the completion API (overridable for tests)
    pub base_url: Url,
    /// Model identifier used for scenario generation
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            output_dir: PathBuf::from("output"),
            allowed_origins: vec!["*".to_string()],
            devops: DevOpsConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl Default for DevOpsConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://dev.azure.com").expect("default URL is valid"),
            api_version: "7.1".to_string(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api.openai.com/v1").expect("default URL is valid"),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl Config {
    fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("FEATURESMITH_").split("__"))
    }

    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.devops.api_version.trim().is_empty() {
            anyhow::bail!("Config validation: devops.api_version must not be empty");
        }
        if self.openai.model.trim().is_empty() {
            anyhow::bail!("Config validation: openai.model must not be empty");
        }
        Ok(())
    }
}
