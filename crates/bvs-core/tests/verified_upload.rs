//! Integration tests: streaming uploads through the in-memory store, with the
//! store's ETag computed independently from the uploaded body.

mod common;

use bvs_core::checksum::DEFAULT_PART_SIZE;
use bvs_core::transport::Faults;
use bvs_core::{Error, TransportError};
use common::{body, id, memory_remote, upload, MIB};
use std::io::{Read, Write};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn forty_mib_in_sixteen_mib_parts_is_three_part_etag() {
    let (remote, store) = memory_remote("", DEFAULT_PART_SIZE);
    let data = body(40 * MIB);
    let blob = upload(&remote, &id(7), &data, MIB).expect("verified upload");

    assert_eq!(blob.size, 41_943_040);
    let (digest, parts) = blob.checksum.split_once('-').expect("multipart etag");
    assert_eq!(digest.len(), 32);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(parts, "3");
    assert_eq!(blob.path, format!("07/07/{}", "07".repeat(32)));
    assert_eq!(store.object(&blob.path).unwrap().len(), data.len());
}

#[test]
fn boundary_lengths_pick_plain_or_multipart_format() {
    const PART: u64 = 4096;
    let p = PART as usize;
    let cases = [
        (0, None),
        (1, None),
        (p - 1, None),
        (p, None),
        (p + 1, Some(2)),
        (3 * p, Some(3)),
    ];
    for (i, (len, parts)) in cases.into_iter().enumerate() {
        let (remote, _) = memory_remote("r", PART);
        let blob = upload(&remote, &id(i as u8), &body(len), 1000)
            .unwrap_or_else(|e| panic!("len {}: {}", len, e));
        assert_eq!(blob.size, len as u64);
        match parts {
            None => {
                assert_eq!(blob.checksum.len(), 32, "len {}", len);
                assert!(!blob.checksum.contains('-'));
            }
            Some(n) => assert!(
                blob.checksum.ends_with(&format!("-{}", n)),
                "len {} gave {}",
                len,
                blob.checksum
            ),
        }
    }
}

#[test]
fn empty_blob_has_md5_of_nothing() {
    let (remote, _) = memory_remote("", 1024);
    let blob = upload(&remote, &id(0), &[], 1).unwrap();
    assert_eq!(blob.checksum, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(blob.size, 0);
}

#[test]
fn same_bytes_same_checksum_on_different_paths() {
    let (remote, _) = memory_remote("", 1000);
    let data = body(5500);
    let a = upload(&remote, &id(1), &data, 333).unwrap();
    let b = upload(&remote, &id(2), &data, 4096).unwrap();
    assert_ne!(a.path, b.path);
    assert_eq!(a.checksum, b.checksum);
}

#[test]
fn reported_size_mismatch_fails_end() {
    let (remote, store) = memory_remote("", 1024);
    store.set_faults(Faults {
        size_offset: 1,
        ..Faults::default()
    });
    let err = upload(&remote, &id(3), &body(3000), 512).unwrap_err();
    assert!(
        matches!(err, Error::SizeMismatch { local: 3000, remote: 3001, .. }),
        "{}",
        err
    );
}

#[test]
fn reported_checksum_mismatch_fails_end_even_with_equal_size() {
    let (remote, store) = memory_remote("", 1024);
    store.set_faults(Faults {
        etag_override: Some("0123456789abcdef0123456789abcdef-3".to_string()),
        ..Faults::default()
    });
    let err = upload(&remote, &id(4), &body(3000), 512).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }), "{}", err);
    assert!(err.is_integrity_failure());
}

#[test]
fn transport_failure_unblocks_writer_and_fails_end() {
    let (remote, store) = memory_remote("", 1024);
    store.set_faults(Faults {
        fail_upload_after: Some(64 * 1024),
        ..Faults::default()
    });
    let blob = id(5);
    let mut up = remote.begin_blob_upload(blob.as_bytes()).unwrap();
    let chunk = vec![9u8; 4096];
    let mut write_err = None;
    for _ in 0..1024 {
        if let Err(e) = up.write_all(&chunk) {
            write_err = Some(e);
            break;
        }
    }
    let write_err = write_err.expect("writer must see the transport error");
    assert!(write_err.to_string().contains("injected failure"), "{}", write_err);

    let err = up.end().unwrap_err();
    assert!(
        matches!(err, Error::Transport(TransportError::Service(_))),
        "{}",
        err
    );
    assert!(store.object(&bvs_core::path_scheme::blob_path("", &blob)).is_none());
}

#[test]
fn rejects_malformed_blob_id() {
    let (remote, store) = memory_remote("", 1024);
    assert!(matches!(
        remote.begin_blob_upload(&[1u8; 31]),
        Err(Error::InvalidBlobId(31))
    ));
    assert_eq!(store.calls().put, 0);
}

#[test]
fn dropped_upload_stores_nothing() {
    let (remote, store) = memory_remote("", 1024);
    let blob = id(6);
    {
        let mut up = remote.begin_blob_upload(blob.as_bytes()).unwrap();
        up.write_all(&body(100)).unwrap();
    }
    // The worker is detached; wait until it has seen the abandoned body.
    let deadline = Instant::now() + Duration::from_secs(5);
    while store.calls().put == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(store.calls().put, 1);
    thread::sleep(Duration::from_millis(200));
    assert!(store.object(&bvs_core::path_scheme::blob_path("", &blob)).is_none());
    assert!(store.is_empty());
}

#[test]
fn zero_part_size_fails_without_uploading() {
    let (remote, store) = memory_remote("", 0);
    let err = remote.begin_blob_upload(id(12).as_bytes()).err().unwrap();
    assert!(matches!(err, Error::InvalidPartSize));
    let err = remote.upload_database_backup(b"db", "db-backup-9").unwrap_err();
    assert!(matches!(err, Error::InvalidPartSize));
    assert_eq!(store.calls().put, 0);
    assert!(store.is_empty());
}

#[test]
fn uploaded_blob_is_listed_with_same_checksum() {
    let (remote, _) = memory_remote("gb", 2048);
    let up = upload(&remote, &id(8), &body(5000), 700).unwrap();
    let name = remote.backup_name(1);
    remote.upload_database_backup(b"db", &name).unwrap();

    let listed = remote.list_blobs().collect_all().unwrap();
    assert_eq!(listed, vec![up.clone()]);
    let meta = remote.metadata(&up.path).unwrap();
    assert_eq!(meta.checksum, up.checksum);
}

#[test]
fn section_download_reads_back_uploaded_bytes() {
    let (remote, store) = memory_remote("", 1024);
    let data = body(2500);
    let up = upload(&remote, &id(9), &data, 100).unwrap();
    let mut out = Vec::new();
    remote
        .download_section(&up.path, 1000, 600)
        .unwrap()
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, &data[1000..1600]);

    let before = store.calls().get;
    let mut empty = Vec::new();
    remote
        .download_section(&up.path, 5, 0)
        .unwrap()
        .read_to_end(&mut empty)
        .unwrap();
    assert!(empty.is_empty());
    assert_eq!(store.calls().get, before);
}

#[test]
fn concurrent_uploads_are_independent() {
    let (remote, _) = memory_remote("", 1000);
    let handles: Vec<_> = (0u8..4)
        .map(|i| {
            let remote = remote.clone();
            std::thread::spawn(move || upload(&remote, &id(10 + i), &body(3000 + i as usize), 128))
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let blob = h.join().unwrap().unwrap();
        assert_eq!(blob.size, 3000 + i as u64);
    }
}

#[test]
fn writer_is_plain_io_write() {
    let (remote, _) = memory_remote("", 1024);
    let mut up = remote.begin_blob_upload(id(20).as_bytes()).unwrap();
    std::io::copy(&mut &body(4000)[..], &mut up).unwrap();
    up.flush().unwrap();
    let blob = up.end().unwrap();
    assert!(blob.checksum.ends_with("-4"));
}
