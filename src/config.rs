// ABOUTME: Environment-based configuration for deployment-specific settings
// ABOUTME: Backend URL, page sizes and log level, all with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Environment-based configuration
//!
//! Configuration comes exclusively from environment variables; every value
//! has a default so a bare process comes up against the in-memory backend.
//! Invalid numeric values are logged and replaced with the default rather
//! than rejected.

use std::env;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::services::browse::BROWSE_PAGE_SIZE;
use crate::services::search::DEFAULT_SEARCH_PAGE_SIZE;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Full tracing output
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback to the default level
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Runtime configuration for the recipe core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Repository connection URL (`memory://` or a `sqlite:` URL)
    pub database_url: String,
    /// Results per search page
    pub search_page_size: u32,
    /// Recipes per browse page
    pub browse_page_size: u32,
    /// Log level
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// Recognized variables: `DATABASE_URL`, `SEARCH_PAGE_SIZE`,
    /// `BROWSE_PAGE_SIZE`, `LOG_LEVEL`.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps room for stricter
    /// validation without an API break.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_owned()),
            search_page_size: env_page_size("SEARCH_PAGE_SIZE", DEFAULT_SEARCH_PAGE_SIZE),
            browse_page_size: env_page_size("BROWSE_PAGE_SIZE", BROWSE_PAGE_SIZE),
            log_level: LogLevel::from_str_or_default(
                &env::var("LOG_LEVEL").unwrap_or_default(),
            ),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "memory://".to_owned(),
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
            browse_page_size: BROWSE_PAGE_SIZE,
            log_level: LogLevel::default(),
        }
    }
}

fn env_page_size(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                warn!("Invalid {key}={raw}, using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}
