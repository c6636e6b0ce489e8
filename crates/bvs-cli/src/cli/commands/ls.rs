//! `bvs ls` – list stored blobs.

use anyhow::Result;
use bvs_core::Remote;

pub async fn run_ls(remote: Remote) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut count = 0u64;
        let mut total = 0u64;
        println!("{:>12} {:<40} {}", "SIZE", "ETAG", "PATH");
        for blob in remote.list_blobs() {
            let blob = blob?;
            println!("{:>12} {:<40} {}", blob.size, blob.checksum, blob.path);
            count += 1;
            total += blob.size;
        }
        println!("{} blobs, {} bytes", count, total);
        Ok(())
    })
    .await?
}
