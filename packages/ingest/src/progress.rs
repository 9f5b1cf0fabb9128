//! Progress reporting for ingestion runs.
//!
//! Ingestion streams the input once, so progress is measured in bytes of
//! the source file consumed. Rendering is left to the caller: the CLI
//! plugs in an `indicatif` bar, library callers and tests use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a long-running ingestion.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total units of work, when known.
    fn set_total(&self, total: u64);

    /// Sets the current absolute position.
    fn set_position(&self, pos: u64);

    /// Updates the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks the work as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
