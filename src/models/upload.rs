//! Drive upload outcome.

/// Result of the optional file re-hosting step.
///
/// Re-hosting is a best-effort enhancement: every variant leaves the run
/// able to proceed, with `Uploaded` switching the notification to the
/// hosted link and the other two falling back to the source link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// File was re-hosted; the card links to the hosted copy.
    Uploaded { token: String, url: String },

    /// Upload transport not configured; nothing was attempted.
    Skipped,

    /// Upload was attempted and failed (logged, never fatal).
    Failed(String),
}

impl UploadOutcome {
    /// Hosted URL, when the upload succeeded.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded { url, .. } => Some(url),
            _ => None,
        }
    }
}
