use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::models::CompanyDetails;
use crate::services::invoice_template::InvoiceSettings;
use crate::services::words::NumberingSystem;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PRINT_TIMEOUT_SECS: u64 = 60;

/// Invoice presentation settings
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InvoiceConfig {
    /// Heading override; defaults to "Inward Invoice" / "Tax Invoice"
    #[serde(default)]
    pub title: Option<String>,

    /// Declaration printed above the signatures
    #[validate(length(min = 1, message = "Invoice declaration cannot be empty"))]
    #[serde(default = "default_declaration")]
    pub declaration: String,

    /// Grouping used for the amount in words: "indian" or "international"
    #[serde(default)]
    pub numbering: NumberingSystem,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Seller block used when the backend has no company details
    #[serde(default)]
    pub company: Option<FallbackCompany>,
}

/// Company details kept in configuration. Keys are snake_case because the
/// config loader lowercases everything it reads.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FallbackCompany {
    pub company_name: String,
    pub address: String,
    pub gst_number: String,
    pub mobile: String,
    pub email: String,
}

impl From<FallbackCompany> for CompanyDetails {
    fn from(company: FallbackCompany) -> Self {
        Self {
            company_name: company.company_name,
            address: company.address,
            gst_number: company.gst_number,
            mobile: company.mobile,
            email: company.email,
            ..Default::default()
        }
    }
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            title: None,
            declaration: default_declaration(),
            numbering: NumberingSystem::default(),
            currency_symbol: default_currency_symbol(),
            company: None,
        }
    }
}

impl InvoiceConfig {
    pub fn settings(&self) -> InvoiceSettings {
        InvoiceSettings {
            title: self.title.clone(),
            declaration: self.declaration.clone(),
            numbering: self.numbering,
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    pub environment: String,

    /// Logging level
    #[validate(custom = "validate_log_level")]
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Backend root, e.g. `https://dairy.example.com`
    #[validate(custom = "validate_base_url")]
    pub api_base_url: String,

    /// Bearer token sent with every backend request
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout for backend calls (1s - 5min)
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound for rendering, printing and sharing one invoice
    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_print_timeout_secs")]
    pub print_timeout_secs: u64,

    /// Where printed invoices are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Where shared invoices are copied
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Where CSV exports are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[validate]
    #[serde(default)]
    pub invoice: InvoiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            print_timeout_secs: default_print_timeout_secs(),
            output_dir: default_output_dir(),
            documents_dir: default_documents_dir(),
            export_dir: default_export_dir(),
            invoice: InvoiceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_secs(self.print_timeout_secs)
    }

    /// Token with surrounding whitespace removed; blank counts as absent.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_print_timeout_secs() -> u64 {
    DEFAULT_PRINT_TIMEOUT_SECS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output/invoices")
}
fn default_documents_dir() -> PathBuf {
    PathBuf::from("output/documents")
}
fn default_export_dir() -> PathBuf {
    PathBuf::from("output/exports")
}
fn default_declaration() -> String {
    InvoiceSettings::default().declaration
}
fn default_currency_symbol() -> String {
    InvoiceSettings::default().currency_symbol
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    match reqwest::Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => {
            let mut err = ValidationError::new("api_base_url");
            err.message = Some("Must be an absolute http(s) URL".into());
            Err(err)
        }
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("dairy_ledger={},dairy_cli={}", level, level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    // stdout carries command output; logs go to stderr.
    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Same layering as [`load_config`] with an explicit config directory.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    let config = Config::builder()
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    if app_config.is_production() && app_config.api_token().is_none() {
        info!("No API token configured; backend requests will be unauthenticated");
    }

    info!("Configuration loaded successfully");
    Ok(app_config)
}
