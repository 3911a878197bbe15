//! # qbot-cli
//!
//! Offline maintenance for a quote database: legacy migration, export and minimal CSV import.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, ExportFormat};
pub use config::{Environment, QbotConfig};
