#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Err results are expected; only panics are bugs.
    let decoded = lzo::frame::decompress_frame_to_vec(data);

    // Listing walks the same block headers without decoding, so it must
    // accept everything full decoding accepts and agree on the sizes.
    let scanned = lzo::frame::scan_frame(&mut &data[..]);
    if let Ok(out) = decoded {
        let info = scanned.expect("scan rejected a decodable container");
        assert_eq!(info.stats.raw_bytes, out.len() as u64);
    }
});
