// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// What to do with a data row whose cycle cell has no leading integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Abort the whole run.
    #[default]
    FailFast,
    /// Drop the row and log a warning.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub url: String,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub on_bad_cycles: CyclePolicy,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            url: s!(SOURCE_URL),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_redirects: MAX_REDIRECTS,
            on_bad_cycles: CyclePolicy::default(),
        }
    }
}

/// Everything one run needs. Nothing here is user-facing: the binary always
/// runs with `RunOptions::default()`, tests point it elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Read from and written back to.
    pub catalog: PathBuf,
    pub scrape: ScrapeOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(CATALOG_FILE),
            scrape: ScrapeOptions::default(),
        }
    }
}

impl RunOptions {
    pub fn with_catalog<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.catalog = path.into();
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.scrape.url = url.into();
        self
    }

    pub fn with_policy(mut self, policy: CyclePolicy) -> Self {
        self.scrape.on_bad_cycles = policy;
        self
    }
}
