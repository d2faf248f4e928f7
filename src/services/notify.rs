// src/services/notify.rs

//! Chat notification service.
//!
//! Two independent capabilities: best-effort re-hosting of a file on the
//! platform drive, and delivery of a signed interactive card through an
//! incoming webhook. Re-hosting failures only downgrade the card to a
//! fallback link; webhook delivery is retried on transport failures.

use std::path::Path;
use std::time::Duration;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::UploadOutcome;
use crate::utils::http;
use crate::utils::RetryPolicy;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(60);
const NOTIFY_ATTEMPTS: u32 = 3;
const NOTIFY_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Public link prefix for files hosted on the drive.
const HOSTED_FILE_BASE_URL: &str = "https://www.larksuite.com/file";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    tenant_access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    file_token: Option<String>,
}

/// Service pushing run results to the team chat.
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    webhook_secret: Option<String>,
    app_id: Option<String>,
    app_secret: Option<String>,
    folder_token: Option<String>,
    api_base_url: String,
    retry: RetryPolicy,
}

impl Notifier {
    /// Create a notifier from the process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::create_client(NOTIFY_TIMEOUT)?,
            webhook_url: config.webhook_url.clone(),
            webhook_secret: config.webhook_secret.clone(),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            folder_token: config.folder_token.clone(),
            api_base_url: config.api_base_url.clone(),
            retry: RetryPolicy::new(NOTIFY_ATTEMPTS, NOTIFY_RETRY_DELAY),
        })
    }

    /// Exchange app credentials for a short-lived tenant access token.
    /// Returns `None` when the upload transport is not configured.
    async fn tenant_token(&self) -> Result<Option<String>> {
        let (Some(app_id), Some(app_secret)) = (&self.app_id, &self.app_secret) else {
            return Ok(None);
        };

        let url = format!(
            "{}/open-apis/auth/v3/tenant_access_token/internal",
            self.api_base_url
        );
        let payload = json!({ "app_id": app_id, "app_secret": app_secret });

        let token = self
            .retry
            .run("token exchange", || self.request_token(&url, &payload))
            .await?;

        Ok(Some(token))
    }

    async fn request_token(&self, url: &str, payload: &serde_json::Value) -> Result<String> {
        let response: TokenResponse = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await?
            .json()
            .await?;
        response
            .tenant_access_token
            .ok_or_else(|| AppError::upload("token exchange returned no token"))
    }

    /// Re-host a local file on the platform drive.
    ///
    /// Never fails the run: missing credentials yield `Skipped`, any
    /// rejection or transport problem yields `Failed` after logging.
    pub async fn upload_file(&self, path: &Path, display_name: &str) -> UploadOutcome {
        let token = match self.tenant_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return UploadOutcome::Skipped,
            Err(e) => {
                log::error!("Drive token exchange failed: {e}");
                return UploadOutcome::Failed(e.to_string());
            }
        };

        match self.try_upload(&token, path, display_name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Drive upload failed: {e}");
                UploadOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_upload(
        &self,
        token: &str,
        path: &Path,
        display_name: &str,
    ) -> Result<UploadOutcome> {
        let content = tokio::fs::read(path).await?;
        let size = content.len();

        let part = Part::bytes(content)
            .file_name(display_name.to_string())
            .mime_str(content_type_for(display_name))?;

        let form = Form::new()
            .text("file_name", display_name.to_string())
            .text("parent_type", "explorer")
            .text(
                "parent_token",
                self.folder_token.clone().unwrap_or_default(),
            )
            .text("size", size.to_string())
            .part("file", part);

        let url = format!("{}/open-apis/drive/v1/files/upload_all", self.api_base_url);
        let body = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .text()
            .await?;

        let response: UploadResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(_) => {
                log::error!("Drive upload returned an unexpected response: {body}");
                return Ok(UploadOutcome::Failed("unparseable response".into()));
            }
        };

        if response.code == 0 {
            if let Some(file_token) = response.data.and_then(|d| d.file_token) {
                let url = format!("{HOSTED_FILE_BASE_URL}/{file_token}");
                log::info!("Re-hosted {display_name} at {url}");
                return Ok(UploadOutcome::Uploaded {
                    token: file_token,
                    url,
                });
            }
        }

        log::error!("Drive upload rejected: {body}");
        Ok(UploadOutcome::Failed(format!(
            "code {} ({})",
            response.code,
            response.msg.unwrap_or_default()
        )))
    }

    /// Send an interactive card through the incoming webhook.
    ///
    /// A no-op when no webhook is configured. Non-2xx responses count as
    /// transient transport failures and are retried.
    pub async fn send_card(&self, title: &str, message: &str, color: &str) -> Result<()> {
        let Some(webhook_url) = self.webhook_url.as_deref() else {
            return Ok(());
        };

        self.retry
            .run("webhook notification", || {
                self.send_once(webhook_url, title, message, color)
            })
            .await?;

        log::info!("Notification sent.");
        Ok(())
    }

    async fn send_once(
        &self,
        webhook_url: &str,
        title: &str,
        message: &str,
        color: &str,
    ) -> Result<()> {
        let payload = self.card_payload(title, message, color)?;
        let response = self.client.post(webhook_url).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(AppError::transport(format!("webhook returned {status}")));
        }
        Ok(())
    }

    /// Build the card payload, attaching a fresh timestamp and signature
    /// when a shared secret is configured.
    fn card_payload(&self, title: &str, message: &str, color: &str) -> Result<serde_json::Value> {
        let mut payload = json!({
            "msg_type": "interactive",
            "card": {
                "config": { "wide_screen_mode": true },
                "header": {
                    "title": { "tag": "plain_text", "content": title },
                    "template": color,
                },
                "elements": [
                    { "tag": "div", "text": { "tag": "lark_md", "content": message } }
                ],
            },
        });

        if let Some(secret) = &self.webhook_secret {
            let timestamp = Utc::now().timestamp().to_string();
            let sign = sign_request(&timestamp, secret)?;
            payload["timestamp"] = json!(timestamp);
            payload["sign"] = json!(sign);
        }

        Ok(payload)
    }
}

/// Guess a content type from the display name. The drive renders PDFs
/// inline; everything else is handed over as an opaque blob.
fn content_type_for(display_name: &str) -> &'static str {
    if display_name.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Compute the webhook signature: HMAC-SHA256 keyed with
/// `"<timestamp>\n<secret>"` over an empty message, base64-encoded.
/// The receiving side verifies with the identical construction.
pub fn sign_request(timestamp: &str, secret: &str) -> Result<String> {
    let string_to_sign = format!("{timestamp}\n{secret}");
    let mac = Hmac::<Sha256>::new_from_slice(string_to_sign.as_bytes())
        .map_err(|e| AppError::Signature(e.to_string()))?;
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
