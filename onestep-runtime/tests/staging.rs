//! Input staging contract

use std::fs;

use onestep_runtime::crypto::keccak256;
use onestep_runtime::InputStager;

#[test]
fn test_stage_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let stager = InputStager::new(dir.path()).unwrap();

    let first = stager.stage(b"the same payload").unwrap();
    let second = stager.stage(b"the same payload").unwrap();
    assert_eq!(first, second);

    // At most one persisted write.
    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_stage_name_is_content_hash() {
    let dir = tempfile::tempdir().unwrap();
    let stager = InputStager::new(dir.path()).unwrap();
    let digest = stager.stage(b"payload bytes").unwrap();
    assert_eq!(digest, keccak256(b"payload bytes"));
    assert_eq!(
        fs::read(dir.path().join(digest.to_hex())).unwrap(),
        b"payload bytes"
    );
}

#[test]
fn test_distinct_payloads_stage_separately() {
    let dir = tempfile::tempdir().unwrap();
    let stager = InputStager::new(dir.path()).unwrap();
    let a = stager.stage(b"alpha").unwrap();
    let b = stager.stage(b"beta").unwrap();
    assert_ne!(a, b);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_combine_order_sensitivity() {
    let h1 = keccak256(b"first");
    let h2 = keccak256(b"second");
    assert_ne!(
        InputStager::combine(&[h1, h2]),
        InputStager::combine(&[h2, h1])
    );
}

#[test]
fn test_combine_matches_manual_concat() {
    let h1 = keccak256(b"sav");
    let h2 = keccak256(b"inp");
    let h3 = keccak256(b"rom");
    let mut preimage = Vec::new();
    preimage.extend_from_slice(h1.as_bytes());
    preimage.extend_from_slice(h2.as_bytes());
    preimage.extend_from_slice(h3.as_bytes());
    assert_eq!(InputStager::combine(&[h1, h2, h3]), keccak256(&preimage));
}

#[test]
fn test_stage_combined_round_trips_constituents() {
    let dir = tempfile::tempdir().unwrap();
    let stager = InputStager::new(dir.path()).unwrap();
    let h1 = stager.stage(b"config").unwrap();
    let h2 = stager.stage(b"weights").unwrap();
    let combined = stager.stage_combined(&[h1, h2]).unwrap();

    let preimage = fs::read(dir.path().join(combined.to_hex())).unwrap();
    assert_eq!(preimage.len(), 64);
    assert_eq!(&preimage[..32], h1.as_bytes());
    assert_eq!(&preimage[32..], h2.as_bytes());
    assert_eq!(keccak256(&preimage), combined);
}
