// src/config.rs

//! Application configuration.
//!
//! Built once from environment variables at process start and passed
//! explicitly to each component. Absent optional settings are `None`,
//! never empty strings.

use std::env;
use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Default chat platform API host.
pub const DEFAULT_API_BASE_URL: &str = "https://open.larksuite.com";

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Share link resolving to the remote archive (mandatory for any action)
    pub source_url: Option<String>,

    /// Root directory for downloaded files
    pub storage_dir: PathBuf,

    /// Path of the snapshot file recording previously seen names
    pub snapshot_path: PathBuf,

    /// Incoming-webhook URL for card notifications
    pub webhook_url: Option<String>,

    /// Shared secret for webhook request signing
    pub webhook_secret: Option<String>,

    /// App id for the drive upload transport
    pub app_id: Option<String>,

    /// App secret for the drive upload transport
    pub app_secret: Option<String>,

    /// Destination drive folder token (root folder when unset)
    pub folder_token: Option<String>,

    /// Chat platform API host
    pub api_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            source_url: env_opt("ARCHIVE_SHARE_LINK"),
            storage_dir: env_opt("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("downloads")),
            snapshot_path: env_opt("SNAPSHOT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/snapshot.json")),
            webhook_url: env_opt("LARK_WEBHOOK_URL"),
            webhook_secret: env_opt("LARK_SECRET"),
            app_id: env_opt("LARK_APP_ID"),
            app_secret: env_opt("LARK_APP_SECRET"),
            folder_token: env_opt("LARK_FOLDER_TOKEN"),
            api_base_url: env_opt("LARK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        }
    }

    /// Whether the drive upload transport is usable.
    pub fn has_upload_credentials(&self) -> bool {
        self.app_id.is_some() && self.app_secret.is_some()
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.source_url {
            if url.trim().is_empty() {
                return Err(AppError::config("ARCHIVE_SHARE_LINK is empty"));
            }
        }
        if self.app_id.is_some() != self.app_secret.is_some() {
            return Err(AppError::config(
                "LARK_APP_ID and LARK_APP_SECRET must be set together",
            ));
        }
        Ok(())
    }
}

/// Read an environment variable, treating unset and blank as absent.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
