//! E2E: block one-shot API
//!
//! Exercises the top-level block functions the way a caller embedding the
//! codec would: compress into a growing vector, then decode through the
//! window-based call and the `Result`-based wrappers.

use lzo::{
    compress, compress_bound, compress_to_vec, decompress, decompress_safe, decompress_to_vec,
    LzoStatus,
};

fn corpus() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..2000u32 {
        let line = format!("{:05} GET /index.html 200 {}\n", i, i * 37 % 1009);
        out.extend_from_slice(line.as_bytes());
    }
    out
}

#[test]
fn short_input_is_one_literal_run() {
    // Inputs this small are never searched for matches.
    let packed = compress_to_vec(b"hello");
    assert_eq!(packed, [22, b'h', b'e', b'l', b'l', b'o', 0x11, 0, 0]);
    assert_eq!(decompress_to_vec(&packed, 5).unwrap(), b"hello");
}

#[test]
fn corpus_roundtrip_through_window_call() {
    let data = corpus();
    let mut packed = Vec::new();
    let n = compress(&data, &mut packed);
    assert_eq!(n, packed.len());
    assert!(n <= compress_bound(data.len()));
    assert!(n < data.len() * 3 / 4);

    let mut out = Vec::new();
    let (status, written) = decompress(&packed, 0, packed.len(), &mut out, 0);
    assert_eq!(status, LzoStatus::Ok);
    assert_eq!(status.code(), 0);
    assert_eq!(written, data.len());
    assert_eq!(out, data);
}

#[test]
fn stream_embedded_in_larger_buffer() {
    let data = corpus();
    let mut framed = b"HEADER--".to_vec();
    let packed_len = compress(&data, &mut framed);
    framed.extend_from_slice(b"--TRAILER");

    let mut out = b"keep".to_vec();
    let (status, written) = decompress(&framed, 8, packed_len, &mut out, 4);
    assert!(status.is_ok());
    assert_eq!(written, data.len());
    assert_eq!(&out[..4], b"keep");
    assert_eq!(&out[4..], &data[..]);
}

#[test]
fn independent_blocks_concatenate() {
    let a = corpus();
    let b: Vec<u8> = a.iter().rev().copied().collect();
    let pa = compress_to_vec(&a);
    let pb = compress_to_vec(&b);

    let mut out = Vec::new();
    assert_eq!(decompress_safe(&pa, &mut out).unwrap(), a.len());
    assert_eq!(decompress_safe(&pb, &mut out).unwrap(), b.len());
    assert_eq!(&out[..a.len()], &a[..]);
    assert_eq!(&out[a.len()..], &b[..]);
}

#[test]
fn sparse_binary_roundtrip() {
    let mut data = vec![0u8; 200_000];
    for i in (0..data.len()).step_by(4099) {
        data[i] = (i % 251) as u8;
    }
    let packed = compress_to_vec(&data);
    assert!(packed.len() < data.len() / 20);
    assert_eq!(decompress_to_vec(&packed, 0).unwrap(), data);
}
