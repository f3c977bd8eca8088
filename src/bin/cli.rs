// src/bin/cli.rs
use color_eyre::eyre::{eyre, Result};
use log::LevelFilter;

use opcode_populate::{
    config::options::RunOptions,
    logger,
    progress::{Progress, Stage},
    runner,
};

/// Stage lines on stderr.
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("  {msg}");
    }

    fn stage_done(&mut self, stage: Stage) {
        self.done += 1;
        eprintln!("[{}/{}] {}", self.done, self.total, stage.label());
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    logger::init(LevelFilter::Debug);

    let opts = RunOptions::default();
    let mut progress = StderrProgress { total: 0, done: 0 };

    let summary = runner::run(&opts, Some(&mut progress)).map_err(|e| eyre!(e))?;

    println!(
        "Wrote {} ({} records, {} matched, {} defaulted)",
        summary.written.display(),
        summary.merge.records,
        summary.merge.matched,
        summary.merge.defaulted
    );
    Ok(())
}
