//! `bvs backup` – upload a database backup under a non-blob name.

use anyhow::{Context, Result};
use bvs_core::Remote;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub async fn run_backup(remote: Remote, path: PathBuf, name: Option<String>) -> Result<()> {
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let name = match name {
        Some(n) => n,
        None => {
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
            remote.backup_name(now)
        }
    };
    let blob =
        tokio::task::spawn_blocking(move || remote.upload_database_backup(&data, &name)).await??;
    println!("{}  {}  {}", blob.path, blob.checksum, blob.size);
    Ok(())
}
