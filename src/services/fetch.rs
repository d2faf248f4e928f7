// src/services/fetch.rs

//! Archive retrieval service.
//!
//! Downloads the share-link ZIP, enumerates its entries, and yields the
//! in-memory file set for the current run. Directories and hidden files
//! are skipped; surviving names are normalized so identities stay stable
//! across runs.

use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::time::Duration;

use zip::ZipArchive;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::RemoteEntry;
use crate::utils::http;
use crate::utils::{canonical_name, RetryPolicy};

/// Generous timeout: share hosts assemble the ZIP on the fly.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const DOWNLOAD_ATTEMPTS: u32 = 3;
const DOWNLOAD_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Service that fetches the remote archive and decomposes it into entries.
pub struct ArchiveFetcher {
    client: reqwest::Client,
    source_url: Option<String>,
    storage_dir: PathBuf,
    retry: RetryPolicy,
}

impl ArchiveFetcher {
    /// Create a fetcher from the process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::create_client(DOWNLOAD_TIMEOUT)?,
            source_url: config.source_url.clone(),
            storage_dir: config.storage_dir.clone(),
            retry: RetryPolicy::new(DOWNLOAD_ATTEMPTS, DOWNLOAD_RETRY_DELAY),
        })
    }

    /// Download the archive and return its file entries in archive order.
    ///
    /// An unconfigured source link is a logged no-op, not an error. A
    /// download that keeps failing after retries propagates; a blob that
    /// is not a valid archive is fatal and never retried.
    pub async fn fetch_entries(&self) -> Result<Vec<RemoteEntry>> {
        let Some(url) = self.source_url.as_deref() else {
            log::error!("ARCHIVE_SHARE_LINK is not configured");
            return Ok(Vec::new());
        };

        log::info!("Checking the archive for updates...");
        let bytes = self
            .retry
            .run("archive download", || self.download(url))
            .await?;

        self.unpack(&bytes)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::transport(format!(
                "archive host returned {status}"
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Decompose the downloaded blob into `RemoteEntry` values.
    fn unpack(&self, bytes: &[u8]) -> Result<Vec<RemoteEntry>> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::new();

        for index in 0..archive.len() {
            let mut member = archive.by_index(index)?;
            if member.is_dir() {
                continue;
            }

            // ZIP member names always use forward slashes.
            let base_name = member.name().rsplit('/').next().unwrap_or("").to_string();
            if base_name.is_empty() || base_name.starts_with('.') {
                continue;
            }

            let canonical = canonical_name(&base_name);
            let mut content = Vec::with_capacity(member.size() as usize);
            member.read_to_end(&mut content)?;

            entries.push(RemoteEntry::new(
                base_name,
                canonical,
                content,
                &self.storage_dir,
            ));
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::FileOptions;

    use super::*;

    fn test_fetcher(source_url: Option<&str>) -> ArchiveFetcher {
        ArchiveFetcher {
            client: http::create_client(DOWNLOAD_TIMEOUT).unwrap(),
            source_url: source_url.map(String::from),
            storage_dir: PathBuf::from("/tmp/dropwatch-test"),
            retry: RetryPolicy::new(1, Duration::ZERO),
        }
    }

    fn build_zip(members: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            for dir in dirs {
                writer
                    .add_directory(*dir, FileOptions::default())
                    .unwrap();
            }
            for (name, content) in members {
                writer.start_file(*name, FileOptions::default()).unwrap();
                writer.write_all(content).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[tokio::test]
    async fn test_unconfigured_source_yields_empty_list() {
        let fetcher = test_fetcher(None);
        let entries = fetcher.fetch_entries().await.unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unpack_filters_and_normalizes() {
        let bytes = build_zip(
            &[
                ("Report (Final).pdf", b"pdf bytes"),
                (".DS_Store", b"junk"),
                ("nested/My Notes.txt", b"notes"),
                ("nested/.hidden", b"secret"),
            ],
            &["nested", "empty-dir"],
        );

        let fetcher = test_fetcher(Some("https://example.com/share?dl=1"));
        let entries = fetcher.unpack(&bytes).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["report-(final).pdf", "my-notes.txt"]);

        assert_eq!(entries[0].original_name, "Report (Final).pdf");
        assert_eq!(entries[0].content, b"pdf bytes");
        assert_eq!(
            entries[0].target_path,
            PathBuf::from("/tmp/dropwatch-test/report-(final).pdf")
        );
        assert_eq!(entries[1].original_name, "My Notes.txt");
    }

    #[test]
    fn test_unpack_rejects_non_archive() {
        let fetcher = test_fetcher(Some("https://example.com/share?dl=1"));
        let err = fetcher.unpack(b"this is not a zip").unwrap_err();
        assert!(matches!(err, AppError::Archive(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_unpack_empty_archive() {
        let bytes = build_zip(&[], &[]);
        let fetcher = test_fetcher(Some("https://example.com/share?dl=1"));
        assert!(fetcher.unpack(&bytes).unwrap().is_empty());
    }
}
