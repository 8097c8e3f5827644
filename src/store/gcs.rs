use std::io;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::io::npy::{self, NpyArray};
use crate::store::ObjectStore;

const GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Public-bucket GCS fetch over the XML API. Blobs are staged to a
/// temporary file that is removed on every exit path, then parsed
/// through a memory map of the staged copy.
#[derive(Debug)]
pub struct GcsStore {
    client: Client,
    bucket: String,
}

impl GcsStore {
    // No request timeout: a hang blocks the whole batch, matching the
    // synchronous single-shot execution model.
    pub fn new(bucket: &str) -> Self {
        Self {
            client: Client::new(),
            bucket: bucket.to_string(),
        }
    }
}

impl ObjectStore for GcsStore {
    fn fetch_npy(&self, key: &str) -> Result<NpyArray> {
        let url = format!("{}/{}/{}", GCS_ENDPOINT, self.bucket, key);
        let mut response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("failed to fetch {}", url))?;
        if response.status() == StatusCode::NOT_FOUND {
            bail!("object {} not found in bucket {}", key, self.bucket);
        }
        if !response.status().is_success() {
            bail!("fetch {} failed with status {}", url, response.status());
        }

        let mut staged = NamedTempFile::new().context("failed to create staging file")?;
        let bytes = io::copy(&mut response, staged.as_file_mut())
            .with_context(|| format!("failed to stage {}", url))?;
        debug!(key, bytes, "blob staged");

        let mmap = unsafe { Mmap::map(staged.as_file()) }
            .with_context(|| format!("failed to map staged copy of {}", key))?;
        npy::parse(&mmap).with_context(|| format!("failed to parse {}", key))
    }

    fn describe(&self) -> String {
        format!("gs://{}", self.bucket)
    }
}
