// src/progress.rs
/// Lightweight progress reporting for a run.
/// The binary implements this to print stage lines; tests pass `NullProgress`.
pub trait Progress {
    /// Called at the start with the number of stages.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one stage completes.
    fn stage_done(&mut self, _stage: Stage) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Load,
    Scrape,
    Merge,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Load, Stage::Scrape, Stage::Merge, Stage::Write];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Load => "load catalog",
            Stage::Scrape => "scrape reference",
            Stage::Merge => "merge timings",
            Stage::Write => "write catalog",
        }
    }
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
