// LZO1X-1 compressor: output validity, bounds, and compression on typical
// inputs.

use lzo::block::{compress, compress_bound, compress_to_vec, decompress_to_vec, END_OF_STREAM};

fn xorshift_bytes(n: usize, mut state: u32) -> Vec<u8> {
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn round_trip(data: &[u8]) -> Vec<u8> {
    let packed = compress_to_vec(data);
    assert!(packed.len() <= compress_bound(data.len()));
    assert!(packed.ends_with(&END_OF_STREAM));
    let out = decompress_to_vec(&packed, data.len()).unwrap();
    assert_eq!(out, data);
    packed
}

#[test]
fn tiny_inputs() {
    round_trip(b"");
    round_trip(b"a");
    round_trip(b"ab");
    round_trip(b"abc");
    round_trip(b"abcd");
}

#[test]
fn random_data_stays_within_bound() {
    let data = xorshift_bytes(300_000, 0x1234_5678);
    let packed = round_trip(&data);
    assert!(packed.len() > data.len());
}

#[test]
fn runs_compress_well() {
    let mut data = vec![0u8; 200_000];
    data.extend(std::iter::repeat(b'z').take(100_000));
    let packed = round_trip(&data);
    assert!(packed.len() < data.len() / 50);
}

#[test]
fn repeats_across_chunk_boundaries() {
    // A 1000-byte random unit repeated well past the 48 KiB chunk size,
    // so matches and pending literals straddle chunk edges.
    let unit = xorshift_bytes(1000, 7);
    let data: Vec<u8> = unit.iter().copied().cycle().take(150_000).collect();
    let packed = round_trip(&data);
    assert!(packed.len() < data.len() / 10);
}

#[test]
fn distant_repeats_round_trip() {
    // Two copies of a 40 KiB random block: the second copy can only match
    // at distances above 16 KiB.
    let block = xorshift_bytes(40_000, 99);
    let mut data = block.clone();
    data.extend_from_slice(&block);
    round_trip(&data);
}

#[test]
fn mixed_text_and_binary() {
    let mut data = Vec::new();
    for i in 0..3000u32 {
        data.extend_from_slice(format!("record {} value {}\n", i, i * 31 % 1000).as_bytes());
        data.extend_from_slice(&i.to_le_bytes());
    }
    round_trip(&data);
}

#[test]
fn compress_appends_and_reports_length() {
    let mut dst = b"prefix".to_vec();
    let n = compress(b"hello hello hello hello", &mut dst);
    assert_eq!(dst.len(), 6 + n);
    assert_eq!(&dst[..6], b"prefix");
    assert_eq!(decompress_to_vec(&dst[6..], 0).unwrap(), b"hello hello hello hello");
}

#[test]
fn output_is_deterministic() {
    let data = xorshift_bytes(10_000, 3).repeat(3);
    assert_eq!(compress_to_vec(&data), compress_to_vec(&data));
}
