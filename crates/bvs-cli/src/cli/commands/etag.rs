//! `bvs etag` – S3 ETag of a local file.

use anyhow::{Context, Result};
use bvs_core::checksum::ETagCalculator;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Compute and print the ETag S3 would report for this file uploaded with `part_size` parts.
pub async fn run_etag(path: &Path, part_size: u64) -> Result<()> {
    if part_size == 0 {
        anyhow::bail!("part size must be greater than zero");
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut calc = ETagCalculator::new(part_size);
    io::copy(&mut BufReader::new(file), &mut calc)
        .with_context(|| format!("read {}", path.display()))?;
    println!("{}  {}", calc.finish(), path.display());
    Ok(())
}
