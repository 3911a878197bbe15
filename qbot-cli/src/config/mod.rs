//! Environment configuration.
//!
//! `QBOT_ENV` selects development or production defaults; `DATABASE_URL` and `LOG_FILE`
//! override them.

use std::env;

use qbot_core::{QbotError, Result};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `dev`/`development` (any case) is development; anything else, including unset, is production.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("dev") | Some("development") => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn default_database_url(self) -> &'static str {
        match self {
            Environment::Development => "data/quotes_dev.db",
            Environment::Production => "data/quotes.db",
        }
    }

    /// Chat command prefix; development uses a different one so both bots can share a guild.
    pub fn command_prefix(self) -> &'static str {
        match self {
            Environment::Development => "?",
            Environment::Production => "!",
        }
    }

    pub fn mode_display(self) -> &'static str {
        match self {
            Environment::Development => "DEVELOPMENT",
            Environment::Production => "PRODUCTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QbotConfig {
    pub environment: Environment,
    pub database_url: String,
    pub log_file: Option<String>,
}

impl QbotConfig {
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_value(env::var("QBOT_ENV").ok().as_deref());

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) if url.trim().is_empty() => {
                return Err(QbotError::Config("DATABASE_URL is set but empty".to_string()));
            }
            Ok(url) => url.trim().to_string(),
            Err(_) => environment.default_database_url().to_string(),
        };

        let log_file = env::var("LOG_FILE")
            .ok()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());

        Ok(Self {
            environment,
            database_url,
            log_file,
        })
    }

    pub fn command_prefix(&self) -> &'static str {
        self.environment.command_prefix()
    }

    pub fn mode_display(&self) -> &'static str {
        self.environment.mode_display()
    }
}
