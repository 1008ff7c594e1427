#![no_main]
use libfuzzer_sys::fuzz_target;

use lzo::frame::{compress_frame_to_vec, decompress_frame_to_vec, FramePrefs};

fuzz_target!(|data: &[u8]| {
    // Small blocks so multi-block containers show up on short inputs.
    let block_size = 1 + data.first().copied().unwrap_or(0) as usize * 64;
    let prefs = FramePrefs {
        block_size,
        checksum_compressed: data.len() % 2 == 0,
        ..FramePrefs::default()
    };
    let packed = compress_frame_to_vec(data, &prefs).expect("in-memory compression cannot fail");
    let recovered = decompress_frame_to_vec(&packed)
        .unwrap_or_else(|e| panic!("self-compressed container rejected: {e}"));
    assert_eq!(recovered, data, "frame round-trip mismatch");
});
