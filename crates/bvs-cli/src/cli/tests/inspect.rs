use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_ls() {
    assert!(matches!(parse(&["bvs", "ls"]), CliCommand::Ls));
}

#[test]
fn cli_parse_stat() {
    match parse(&["bvs", "stat", "root/db-backup-1"]) {
        CliCommand::Stat { key } => assert_eq!(key, "root/db-backup-1"),
        _ => panic!("expected Stat"),
    }
}

#[test]
fn cli_parse_etag_part_size() {
    match parse(&["bvs", "etag", "f.bin", "--part-size", "8388608"]) {
        CliCommand::Etag { part_size, .. } => assert_eq!(part_size, Some(8 * 1024 * 1024)),
        _ => panic!("expected Etag"),
    }
}

#[test]
fn cli_parse_info() {
    assert!(matches!(parse(&["bvs", "info"]), CliCommand::Info));
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["bvs", "add", "https://example.com"]).is_err());
}
