// src/logger.rs
// File sink for the `log` facade. Lines look like
// `[00:00:01.234][INFO] message` with time elapsed since start.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static START: OnceLock<Instant> = OnceLock::new();
static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

pub struct FileLogger {
    path: PathBuf,
    level: LevelFilter,
    lock: Mutex<()>,
}

impl FileLogger {
    pub fn new(path: PathBuf, level: LevelFilter) -> Self {
        Self { path, level, lock: Mutex::new(()) }
    }

    fn write_line(&self, line: &str) {
        if let Ok(_guard) = self.lock.lock() {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
            {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        let line = format!("[{elapsed}][{}] {}\n", record.level(), record.args());
        self.write_line(&line);
    }

    fn flush(&self) {}
}

/// Install the file logger at `.store/debug.log`. Safe to call more than once;
/// only the first call wins. Failing to create the store dir is not fatal,
/// log lines are just dropped.
pub fn init(level: LevelFilter) {
    start();
    let dir = PathBuf::from(STORE_DIR);
    let _ = fs::create_dir_all(&dir);

    let logger = LOGGER.get_or_init(|| FileLogger::new(dir.join(LOG_FILE), level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_format() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }

    #[test]
    fn file_logger_appends_lines() {
        let mut path = std::env::temp_dir();
        path.push("opcode_populate_logger_test.log");
        let _ = fs::remove_file(&path);

        let logger = FileLogger::new(path.clone(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .args(format_args!("hello {}", 1))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("filtered"))
                .build(),
        );

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("][INFO] hello 1\n"));
        assert!(!text.contains("filtered"));
    }
}
