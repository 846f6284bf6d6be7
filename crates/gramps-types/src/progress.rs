/// Progress reporting for long-running batch operations (imports, full
/// database comparisons).
///
/// Implementations decide how progress is shown; the engine only reports
/// steps.
pub trait Progress {
    /// A new phase with `total` steps begins.
    fn begin(&mut self, message: &str, total: usize);

    /// One step of the current phase completed.
    fn step(&mut self);

    /// The current phase is done.
    fn end(&mut self);
}

/// A [`Progress`] that reports nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin(&mut self, _message: &str, _total: usize) {}

    fn step(&mut self) {}

    fn end(&mut self) {}
}
