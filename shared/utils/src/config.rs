use config::{Config, ConfigError, Environment, File};
use grooming_models::{UploadLimits, MEGABYTE};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{GroomingError, GroomingResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub uploads: UploadLimits,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
    pub timeout_seconds: u64,
}

/// Outbound mail settings.
///
/// Credentials and addresses are optional so the service can start without
/// them; sending then fails with a configuration error instead.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: Option<String>,
    pub from_name: String,
    pub to_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // GROOMING__EMAIL__SMTP_HOST and friends
            .add_source(Environment::with_prefix("GROOMING").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl EmailConfig {
    /// Credentials are only used when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (non_blank(&self.smtp_username), non_blank(&self.smtp_password)) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    /// `From` mailbox, e.g. `The Grooming Spot <bookings@example.com>`.
    pub fn sender_mailbox(&self) -> GroomingResult<String> {
        let address = non_blank(&self.from_address)
            .ok_or_else(|| GroomingError::configuration("email.from_address is not set"))?;

        if self.from_name.trim().is_empty() {
            Ok(address.to_string())
        } else {
            Ok(format!("{} <{}>", self.from_name.trim(), address))
        }
    }

    /// Operator inbox that receives appointment requests.
    pub fn recipient(&self) -> GroomingResult<String> {
        non_blank(&self.to_address)
            .map(str::to_string)
            .ok_or_else(|| GroomingError::configuration("email.to_address is not set"))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Hand-written so the SMTP password never reaches the logs.
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "***"))
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("to_address", &self.to_address)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            email: EmailConfig::default(),
            uploads: UploadLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_size: 10 * MEGABYTE as usize, // 10MB
            timeout_seconds: 30,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.mailgun.org".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: None,
            from_name: "The Grooming Spot".to_string(),
            to_address: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}
