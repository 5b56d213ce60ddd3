//! Persistence seam.
//!
//! Mutations conclude by handing the whole store to a [`Sink`]. The
//! engine does not care where the bytes go; hosts plug in file writers,
//! network shippers, or test doubles. The in-memory mutation is applied
//! before the sink runs and is not rolled back on a failed write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::db::store::Store;
use crate::error::Result;

/// Receives the full store state after every mutation.
pub trait Sink: Send + Sync {
    /// Persists the current state. Called once per successful mutation.
    fn write(&self, store: &Store) -> Result<()>;
}

impl<S: Sink> Sink for std::sync::Arc<S> {
    fn write(&self, store: &Store) -> Result<()> {
        (**self).write(store)
    }
}

/// Writes the store as pretty-printed JSON, replacing the target file
/// atomically through a sibling temp file so readers never observe a
/// torn document.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink targeting `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for JsonFileSink {
    fn write(&self, store: &Store) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, store)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "store persisted");
        Ok(())
    }
}

/// Test double capturing the latest snapshot and counting writes.
#[derive(Debug, Default)]
pub struct MemorySink {
    last: Mutex<Option<Value>>,
    writes: AtomicUsize,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes received so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The most recent snapshot, if any write happened.
    pub fn last_snapshot(&self) -> Option<Value> {
        self.last.lock().clone()
    }
}

impl Sink for MemorySink {
    fn write(&self, store: &Store) -> Result<()> {
        *self.last.lock() = Some(store.to_value());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
