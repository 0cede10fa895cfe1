//! Best-effort diagnostic side channel.
//!
//! Nothing written here can fail a generation pass.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait DiagnosticSink: Send + Sync {
    fn write(&self, text: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn write(&self, _text: &str) {}
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write(&self, text: &str) {
        self(text)
    }
}

/// Appends one line per diagnostic to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    // Keeps lines from parallel units from interleaving
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, text: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", text)
    }
}

impl DiagnosticSink for FileSink {
    fn write(&self, text: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = self.append(text) {
            tracing::trace!(path = %self.path.display(), error = %e, "diagnostic write dropped");
        }
    }
}
