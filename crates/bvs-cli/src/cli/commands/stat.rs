//! `bvs stat` – size and ETag of one object.

use anyhow::Result;
use bvs_core::Remote;

pub async fn run_stat(remote: Remote, key: String) -> Result<()> {
    let meta = {
        let key = key.clone();
        tokio::task::spawn_blocking(move || remote.metadata(&key)).await??
    };
    println!("{}  {}  {}", key, meta.checksum, meta.size);
    Ok(())
}
