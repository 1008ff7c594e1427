#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = lzo::block::compress_to_vec(data);
    assert!(compressed.len() <= lzo::block::compress_bound(data.len()));

    let recovered = lzo::block::decompress_to_vec(&compressed, data.len())
        .unwrap_or_else(|e| panic!("self-compressed block rejected: {e} ({} bytes in)", data.len()));
    assert_eq!(recovered, data, "block round-trip mismatch");
});
