// src/runner.rs
use std::error::Error;
use std::path::PathBuf;

use crate::{
    catalog,
    config::options::RunOptions,
    merge::{self, MergeReport},
    progress::{NullProgress, Progress, Stage},
    specs,
};

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub written: PathBuf,
    pub scraped: usize,
    pub merge: MergeReport,
}

/// Top-level driver: load → scrape → merge → write.
/// Nothing is written unless every earlier stage succeeded.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    opts: &RunOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error + Send + Sync>> {
    let mut null = NullProgress;
    let p: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    p.begin(Stage::ALL.len());
    let result = run_stages(opts, p);
    if let Err(e) = &result {
        log::error!("Run failed: {}", error_chain(&**e));
    }
    p.finish();
    result
}

/// `outer: cause: root cause`, following `Error::source`.
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        next = cause.source();
    }
    out
}

fn run_stages(
    opts: &RunOptions,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error + Send + Sync>> {
    let mut done = |stage: Stage, msg: String| {
        progress.log(&msg);
        progress.stage_done(stage);
    };

    let mut cat = catalog::load(&opts.catalog)?;
    done(Stage::Load, format!("Loaded {} records from {}", cat.len(), opts.catalog.display()));

    let table = specs::reference::fetch(&opts.scrape)?;
    done(Stage::Scrape, format!("Scraped {} opcodes from {}", table.len(), opts.scrape.url));

    let report = merge::apply(&mut cat, &table)?;
    done(
        Stage::Merge,
        format!("{} matched, {} defaulted", report.matched, report.defaulted),
    );

    let written = catalog::save(&opts.catalog, &cat)?;
    done(Stage::Write, format!("Wrote {}", written.display()));

    Ok(RunSummary { written, scraped: table.len(), merge: report })
}
