//! End-to-end integrity checks for whole-file duplication

use std::fs;

use tempfile::TempDir;

use tract_core::{copy, copy_with, CopyOptions};

const LARGE_SIZE: usize = 10_000_000;

fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn pseudo_random_payload(len: usize) -> Vec<u8> {
    // Simple LCG; deterministic content that does not compress to runs.
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

#[test]
fn test_large_copy_hash_matches() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let src = dir.path().join("volume.dat");
    let dst = dir.path().join("volume_copy.dat");

    let payload = pseudo_random_payload(LARGE_SIZE);
    fs::write(&src, &payload).expect("Failed to write source dataset");

    copy(&src, &dst).expect("Copy should succeed");

    let copied = fs::read(&dst).expect("Failed to read duplicate");
    assert_eq!(copied.len(), LARGE_SIZE);
    assert_eq!(crc32(&copied), crc32(&payload));
}

#[test]
fn test_large_copy_hash_matches_buffered_path() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let src = dir.path().join("volume.dat");
    let dst = dir.path().join("volume_copy.dat");

    let payload = pseudo_random_payload(LARGE_SIZE);
    fs::write(&src, &payload).expect("Failed to write source dataset");

    // Force the chunked fallback by setting the mapping limit below the
    // file size.
    let options = CopyOptions { mmap_limit: 1 << 20 };
    copy_with(&src, &dst, &options).expect("Buffered copy should succeed");

    let copied = fs::read(&dst).expect("Failed to read duplicate");
    assert_eq!(copied.len(), LARGE_SIZE);
    assert_eq!(crc32(&copied), crc32(&payload));
}

#[test]
fn test_copy_overwrites_stale_duplicate() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let src = dir.path().join("run2.dat");
    let dst = dir.path().join("archive.dat");

    fs::write(&dst, pseudo_random_payload(65536)).expect("Failed to write stale archive");
    let payload = pseudo_random_payload(1024);
    fs::write(&src, &payload).expect("Failed to write source dataset");

    copy(&src, &dst).expect("Copy should succeed");

    let copied = fs::read(&dst).expect("Failed to read duplicate");
    assert_eq!(copied.len(), 1024);
    assert_eq!(crc32(&copied), crc32(&payload));
}
