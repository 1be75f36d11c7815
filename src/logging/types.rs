//! The [`Log`] trait shared by the real logger and test doubles.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests substitute
/// a recording implementation so they can assert on what was reported
/// without installing a subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major step of a run).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that check mode skipped.
    fn dry_run(&self, msg: &str);
}
