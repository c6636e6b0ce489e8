//! CLI for BVS verified blob storage.

mod commands;

use anyhow::Result;
use bvs_core::config::{self, BvsConfig};
use bvs_core::transport::S3Store;
use bvs_core::Remote;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use commands::{run_backup, run_cat, run_etag, run_info, run_ls, run_put, run_stat};

/// Top-level CLI for BVS.
#[derive(Debug, Parser)]
#[command(name = "bvs")]
#[command(about = "BVS: verified blob uploads to S3-compatible storage", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a file as a content-addressed blob and verify it.
    Put {
        /// Path to the file.
        path: PathBuf,
    },

    /// Upload a database backup under a backup name and verify it.
    Backup {
        /// Path to the (already encrypted) database file.
        path: PathBuf,
        /// Object name; defaults to the backup marker plus the current Unix time.
        #[arg(long)]
        name: Option<String>,
    },

    /// List all blobs under the configured root path.
    Ls,

    /// Show size and ETag of a stored object.
    Stat {
        /// Remote key.
        key: String,
    },

    /// Write a byte range of a stored object to stdout.
    Cat {
        /// Remote key.
        key: String,
        /// Start offset in bytes.
        #[arg(long, default_value = "0")]
        offset: u64,
        /// Number of bytes; defaults to the rest of the object.
        #[arg(long)]
        length: Option<u64>,
    },

    /// Compute the S3 ETag of a local file without uploading it.
    Etag {
        /// Path to the file.
        path: PathBuf,
        /// Part size in bytes; defaults to the configured part size.
        #[arg(long, value_name = "BYTES")]
        part_size: Option<u64>,
    },

    /// Show the configured remote.
    Info,
}

async fn connect(cfg: &BvsConfig) -> Result<Remote> {
    let remote_cfg = cfg.remote()?;
    let store = S3Store::connect(&remote_cfg).await;
    Ok(Remote::new(remote_cfg, Arc::new(store)))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        if let CliCommand::Etag { path, part_size } = &cli.command {
            return run_etag(path, part_size.unwrap_or(cfg.part_size)).await;
        }

        let remote = connect(&cfg).await?;
        match cli.command {
            CliCommand::Put { path } => run_put(remote, path).await?,
            CliCommand::Backup { path, name } => run_backup(remote, path, name).await?,
            CliCommand::Ls => run_ls(remote).await?,
            CliCommand::Stat { key } => run_stat(remote, key).await?,
            CliCommand::Cat {
                key,
                offset,
                length,
            } => run_cat(remote, key, offset, length).await?,
            CliCommand::Info => run_info(&remote),
            CliCommand::Etag { .. } => unreachable!("handled before connecting"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
