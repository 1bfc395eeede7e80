//! Progress notifications for long-running exports.

/// Receives lifecycle notifications from an export run.
///
/// `started` fires before any pipeline work; `finished` fires after cleanup,
/// whether the export succeeded or failed. UIs hang loading indicators off
/// these two calls.
pub trait ProgressListener {
    fn started(&self) {}
    fn finished(&self) {}
}

/// Listener that discards every notification.
pub struct NoProgress;

impl ProgressListener for NoProgress {}
