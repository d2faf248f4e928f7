// src/pipeline/run.rs

//! One full monitor run.
//!
//! Sequences fetch, change detection, local persistence, notification,
//! and the snapshot update. Strictly sequential; the process performs a
//! single run and exits.

use crate::config::Config;
use crate::error::Result;
use crate::models::{RemoteEntry, UploadOutcome};
use crate::pipeline::detect_new;
use crate::services::{ArchiveFetcher, Notifier};
use crate::storage::SnapshotStore;

const CARD_TITLE: &str = "Archive monitor alert";
const CARD_COLOR: &str = "orange";

/// Run the monitor once.
pub async fn run_monitor(config: &Config) -> Result<()> {
    let Some(source_url) = config.source_url.as_deref() else {
        log::error!("ARCHIVE_SHARE_LINK is not configured; nothing to do");
        return Ok(());
    };

    let fetcher = ArchiveFetcher::new(config)?;
    let entries = match fetcher.fetch_entries().await {
        Ok(entries) => entries,
        Err(e) => {
            // Snapshot and local files stay untouched on a failed fetch.
            log::error!("Could not fetch the remote file list: {e}");
            return Ok(());
        }
    };

    if entries.is_empty() {
        log::info!("Archive contains no files.");
        return Ok(());
    }

    deliver(config, source_url, &entries).await
}

/// Steps after a successful fetch: diff, persist, notify, snapshot.
async fn deliver(config: &Config, source_url: &str, entries: &[RemoteEntry]) -> Result<()> {
    let store = SnapshotStore::new(&config.snapshot_path);
    let snapshot = store.load().await;
    let new_items = detect_new(entries, &snapshot);

    tokio::fs::create_dir_all(&config.storage_dir).await?;

    let mut written: Vec<&RemoteEntry> = Vec::new();
    for item in new_items {
        match tokio::fs::write(&item.target_path, &item.content).await {
            Ok(()) => {
                log::info!("Downloaded: {}", item.canonical_name);
                written.push(item);
            }
            // A single failed write drops that file from the run, nothing more.
            Err(e) => log::error!("Failed to save {}: {e}", item.canonical_name),
        }
    }

    if written.is_empty() {
        // Snapshot is deliberately not rewritten when nothing was persisted.
        log::info!("No new files.");
        return Ok(());
    }

    written.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
    let Some(latest) = written.last() else {
        return Ok(());
    };

    log::info!("New files detected, announcing: {}", latest.canonical_name);

    let notifier = Notifier::new(config)?;
    let upload = if config.has_upload_credentials() {
        log::info!("Re-hosting {} on the drive...", latest.canonical_name);
        notifier
            .upload_file(&latest.target_path, &latest.canonical_name)
            .await
    } else {
        UploadOutcome::Skipped
    };

    let message = compose_message(&latest.canonical_name, &upload, source_url);
    if let Err(e) = notifier.send_card(CARD_TITLE, &message, CARD_COLOR).await {
        // Best-effort: the snapshot still records this run.
        log::error!("Failed to send the notification: {e}");
    }

    // Fold in every fetched name, not just the newly written subset, so
    // files already on disk stop being re-detected.
    let mut merged = snapshot;
    merged.extend(entries.iter().map(|e| e.canonical_name.clone()));
    store.save(&merged).await?;

    Ok(())
}

/// Compose the card body: the latest canonical name plus either the
/// hosted link or a preview link back to the source archive.
fn compose_message(latest_name: &str, upload: &UploadOutcome, source_url: &str) -> String {
    let mut body = format!("**Latest file:**\n{latest_name}\n\n");
    match upload.url() {
        Some(url) => body.push_str(&format!("[Open the hosted copy]({url})\n")),
        None => body.push_str(&format!(
            "[View in the source archive]({})",
            preview_url(source_url)
        )),
    }
    format!("🔔 Archive file update\n\n{body}")
}

/// Rewrite the direct-download marker so the link opens as a preview.
fn preview_url(source_url: &str) -> String {
    source_url.replace("dl=1", "dl=0")
}
