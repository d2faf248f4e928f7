// src/pipeline/mod.rs

//! Pipeline entry points for monitor operations.
//!
//! - `detect_new`: diff the fetched file set against the snapshot
//! - `run_monitor`: one full fetch / persist / notify run

pub mod diff;
pub mod run;

pub use diff::detect_new;
pub use run::run_monitor;
