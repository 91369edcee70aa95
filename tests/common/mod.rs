//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use backup_hooks::backup::ServerBackup;
use chrono::{TimeZone, Utc};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for `tracing` output
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Number of events logged at `level` ("ERROR", "WARN", ...)
    pub fn count(&self, level: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber and returns what it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

/// The backup used throughout the examples: `/backups/20180405` at midnight UTC
pub fn sample_backup() -> ServerBackup {
    ServerBackup::new(
        "/backups/20180405",
        Utc.with_ymd_and_hms(2018, 4, 5, 0, 0, 0).unwrap(),
    )
}
