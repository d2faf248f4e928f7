// src/lib.rs

//! dropwatch Library
//!
//! Polls a share-link file archive, detects newly added files against a
//! persisted snapshot, downloads them, and announces the newest one to a
//! team chat webhook.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
