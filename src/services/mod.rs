// src/services/mod.rs

//! Network-facing services: archive retrieval and chat notification.

pub mod fetch;
pub mod notify;

pub use fetch::ArchiveFetcher;
pub use notify::Notifier;
