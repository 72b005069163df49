//! Per-evaluation scratch directories.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::TempDir;

use crate::BridgeResult;

/// Process-wide evaluation counter, for log lines only.
static NEXT_EVAL: AtomicU64 = AtomicU64::new(0);

/// A fresh `<parent>/eval-<id>-<random>` directory, removed on drop.
///
/// The directory is created atomically with a random suffix, so live
/// workspaces never share a path, not even across processes sharing
/// `parent`.  Existing directories are never touched.
#[derive(Debug)]
pub struct EvalWorkspace {
    id: u64,
    dir: TempDir,
}

impl EvalWorkspace {
    pub fn create(parent: &Path) -> BridgeResult<Self> {
        let id = NEXT_EVAL.fetch_add(1, Ordering::Relaxed);
        let dir = tempfile::Builder::new()
            .prefix(&format!("eval-{id}-"))
            .tempdir_in(parent)?;
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn loops(&self) -> PathBuf {
        self.dir().join("loops.xml")
    }

    pub fn emitters(&self) -> PathBuf {
        self.dir().join("emitters.xml")
    }

    pub fn measurements(&self) -> PathBuf {
        self.dir().join("measurements.xml")
    }

    /// Simulator stdout and stderr.
    pub fn console(&self) -> PathBuf {
        self.dir().join("simulator.log")
    }
}
