// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;

/// User-Agent sent with every request; some share hosts refuse the default.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Create a configured asynchronous HTTP client.
pub fn create_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
