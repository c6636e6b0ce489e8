//! `bvs put` – upload a file as a content-addressed blob.

use anyhow::{Context, Result};
use bvs_core::{BlobId, Remote};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

pub async fn run_put(remote: Remote, path: PathBuf) -> Result<()> {
    let blob = tokio::task::spawn_blocking(move || -> Result<_> {
        let id = BlobId::of_path(&path).with_context(|| format!("hash {}", path.display()))?;
        tracing::info!(blob_id = %id, file = %path.display(), "uploading");
        let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        let mut upload = remote.begin_blob_upload(id.as_bytes())?;
        io::copy(&mut BufReader::new(file), &mut upload)
            .with_context(|| format!("stream {}", path.display()))?;
        Ok(upload.end()?)
    })
    .await??;
    println!("{}  {}  {}", blob.path, blob.checksum, blob.size);
    Ok(())
}
