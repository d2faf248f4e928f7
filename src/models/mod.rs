// src/models/mod.rs

//! Domain models for the monitor application.

mod entry;
mod upload;

pub use entry::RemoteEntry;
pub use upload::UploadOutcome;
