//! E2E: error handling
//!
//! Damaged input must yield an error (never a panic) at both layers, and
//! the block layer must report the liblzo status that matches the damage.

use lzo::frame::{compress_frame_to_vec, decompress_frame_to_vec, FrameError, FramePrefs};
use lzo::{compress_to_vec, decompress, decompress_to_vec, DecompressError, LzoStatus};

fn text() -> Vec<u8> {
    b"Error handling must be boring. "
        .iter()
        .copied()
        .cycle()
        .take(20_000)
        .collect()
}

fn xorshift_bytes(seed: u32, n: usize) -> Vec<u8> {
    let mut s = seed | 1;
    (0..n)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            s as u8
        })
        .collect()
}

#[test]
fn truncated_block_fails() {
    let packed = compress_to_vec(&text());
    for cut in [1, packed.len() / 3, packed.len() / 2, packed.len() - 1] {
        assert!(decompress_to_vec(&packed[..cut], 0).is_err(), "cut at {}", cut);
    }
}

#[test]
fn truncation_reports_input_overrun() {
    let packed = compress_to_vec(&text());
    let mut out = Vec::new();
    let (status, _) = decompress(&packed, 0, packed.len() - 2, &mut out, 0);
    assert_eq!(status, LzoStatus::InputOverrun);
    assert_eq!(status.code(), -4);
}

#[test]
fn padding_after_stream_not_consumed() {
    let mut packed = compress_to_vec(&text());
    packed.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(
        decompress_to_vec(&packed, 0).unwrap_err(),
        DecompressError::InputNotConsumed
    );
}

#[test]
fn match_before_window_start() {
    // Literal "abcd", then an M2 match reaching 5 bytes back.
    let stream = [21, b'a', b'b', b'c', b'd', 0x50, 0x00, 0x11, 0x00, 0x00];
    let mut out = Vec::new();
    let (status, _) = decompress(&stream, 0, stream.len(), &mut out, 0);
    assert_eq!(status, LzoStatus::LookbehindOverrun);

    // The same match is fine once it fits the produced output.
    let stream = [21, b'a', b'b', b'c', b'd', 0x6c, 0x00, 0x11, 0x00, 0x00];
    assert_eq!(decompress_to_vec(&stream, 0).unwrap(), b"abcdabcd");
}

#[test]
fn random_bytes_never_panic() {
    for seed in 1..200u32 {
        let junk = xorshift_bytes(seed, 64 + seed as usize * 7);
        let mut out = Vec::new();
        let (status, _) = decompress(&junk, 0, junk.len(), &mut out, 0);
        let _ = status.code();
        let _ = decompress_frame_to_vec(&junk);
    }
}

#[test]
fn flipped_bits_in_container_detected() {
    let data = text();
    let packed = compress_frame_to_vec(&data, &FramePrefs::default()).unwrap();
    for at in (0..packed.len()).step_by(97) {
        let mut damaged = packed.clone();
        damaged[at] ^= 0x01;
        match decompress_frame_to_vec(&damaged) {
            Ok(out) => panic!("damage at {} went unnoticed ({} bytes)", at, out.len()),
            Err(FrameError::Io(e)) => panic!("unexpected I/O error: {}", e),
            Err(_) => {}
        }
    }
}
