use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;

use crate::io::npy::{self, NpyArray};

pub mod gcs;

/// Read-only object store holding serialized tensors. A missing key is
/// a fatal error; there is no retry.
pub trait ObjectStore: fmt::Debug {
    fn fetch_npy(&self, key: &str) -> Result<NpyArray>;

    /// Human-readable store identity for logs and errors.
    fn describe(&self) -> String;
}

/// Filesystem-backed store: keys resolve to paths under a root
/// directory. Used for local bucket mirrors and tests.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ObjectStore for DirStore {
    fn fetch_npy(&self, key: &str) -> Result<NpyArray> {
        let path = self.root.join(key);
        if !path.exists() {
            bail!("object {} not found under {}", key, self.root.display());
        }
        let file =
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;
        npy::parse(&mmap).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn describe(&self) -> String {
        format!("dir://{}", self.root.display())
    }
}
