//! `bvs cat` – write a section of an object to stdout.

use anyhow::{Context, Result};
use bvs_core::Remote;
use std::io::{self, Write};

pub async fn run_cat(remote: Remote, key: String, offset: u64, length: Option<u64>) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let length = match length {
            Some(n) => n,
            None => remote.metadata(&key)?.size.saturating_sub(offset),
        };
        let mut section = remote.download_section(&key, offset, length)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let copied = io::copy(&mut section, &mut out).context("write to stdout")?;
        out.flush()?;
        tracing::debug!(key = %key, offset, copied, "section written");
        Ok(())
    })
    .await?
}
