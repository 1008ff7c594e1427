// Container writer: block layout, stored blocks, worker counts.

use lzo::frame::types::adler32;
use lzo::frame::{
    compress_frame, compress_frame_to_vec, decompress_frame_to_vec, FrameError, FrameHeader,
    FramePrefs, MAX_BLOCK_SIZE,
};

fn noise(n: usize) -> Vec<u8> {
    let mut s = 0x2545_f491u32;
    (0..n)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            (s >> 8) as u8
        })
        .collect()
}

fn header_len(prefs: &FramePrefs) -> usize {
    FrameHeader::for_prefs(prefs).encoded_len()
}

fn be32(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes(buf[at..at + 4].try_into().unwrap())
}

#[test]
fn empty_input_is_header_plus_end_marker() {
    let prefs = FramePrefs::default();
    let packed = compress_frame_to_vec(b"", &prefs).unwrap();
    assert_eq!(packed.len(), header_len(&prefs) + 4);
    assert_eq!(&packed[packed.len() - 4..], &[0, 0, 0, 0]);
    assert!(decompress_frame_to_vec(&packed).unwrap().is_empty());
}

#[test]
fn compressible_block_layout() {
    let data = b"abcabcabcabcabcabcabcabcabcabcabcabcabcabc".repeat(20);
    let prefs = FramePrefs::default();
    let packed = compress_frame_to_vec(&data, &prefs).unwrap();
    let at = header_len(&prefs);

    assert_eq!(be32(&packed, at) as usize, data.len());
    let packed_len = be32(&packed, at + 4) as usize;
    assert!(packed_len < data.len());
    assert_eq!(be32(&packed, at + 8), adler32(&data));
    assert_eq!(packed.len(), at + 12 + packed_len + 4);
}

#[test]
fn incompressible_block_is_stored() {
    let data = noise(5000);
    let prefs = FramePrefs::default();
    let packed = compress_frame_to_vec(&data, &prefs).unwrap();
    let at = header_len(&prefs);

    assert_eq!(be32(&packed, at), 5000);
    assert_eq!(be32(&packed, at + 4), 5000);
    assert_eq!(&packed[at + 12..at + 12 + 5000], &data[..]);
    assert_eq!(decompress_frame_to_vec(&packed).unwrap(), data);
}

#[test]
fn compressed_checksum_only_on_packed_blocks() {
    let prefs = FramePrefs {
        block_size: 4096,
        checksum_compressed: true,
        ..FramePrefs::default()
    };
    // One stored block followed by one compressed block.
    let mut data = noise(4096);
    data.extend(std::iter::repeat(b'r').take(4096));
    let packed = compress_frame_to_vec(&data, &prefs).unwrap();

    let first = header_len(&prefs);
    assert_eq!(be32(&packed, first + 4), 4096);
    let second = first + 12 + 4096;
    let packed_len = be32(&packed, second + 4) as usize;
    assert!(packed_len < 4096);
    let payload = &packed[second + 16..second + 16 + packed_len];
    assert_eq!(be32(&packed, second + 12), adler32(payload));
    assert_eq!(decompress_frame_to_vec(&packed).unwrap(), data);
}

#[test]
fn block_count_and_stats() {
    let data = b"0123456789".repeat(10_000);
    let prefs = FramePrefs {
        block_size: 30_000,
        ..FramePrefs::default()
    };
    let mut out = Vec::new();
    let stats = compress_frame(&mut &data[..], &mut out, &prefs).unwrap();
    assert_eq!(stats.blocks, 4);
    assert_eq!(stats.raw_bytes, 100_000);
    assert_eq!(stats.packed_bytes, out.len() as u64);
}

#[test]
fn worker_count_does_not_change_output() {
    let data: Vec<u8> = (0..400_000u32).flat_map(|i| (i / 7).to_le_bytes()).collect();
    let single = FramePrefs {
        block_size: 64 * 1024,
        nb_workers: 1,
        ..FramePrefs::default()
    };
    let parallel = FramePrefs {
        nb_workers: 4,
        ..single.clone()
    };
    let a = compress_frame_to_vec(&data, &single).unwrap();
    let b = compress_frame_to_vec(&data, &parallel).unwrap();
    assert_eq!(a, b);
    assert_eq!(decompress_frame_to_vec(&b).unwrap(), data);
}

#[test]
fn invalid_block_sizes_rejected() {
    for size in [0, MAX_BLOCK_SIZE + 1] {
        let prefs = FramePrefs {
            block_size: size,
            ..FramePrefs::default()
        };
        assert!(matches!(
            compress_frame_to_vec(b"x", &prefs),
            Err(FrameError::InvalidBlockSize(s)) if s == size
        ));
    }
}

#[test]
fn largest_blocks_with_many_workers_on_small_input() {
    let data = b"small input, large settings ".repeat(50);
    let prefs = FramePrefs {
        block_size: MAX_BLOCK_SIZE,
        nb_workers: 200,
        ..FramePrefs::default()
    };
    let packed = compress_frame_to_vec(&data, &prefs).unwrap();
    let single = FramePrefs {
        nb_workers: 1,
        ..prefs.clone()
    };
    assert_eq!(packed, compress_frame_to_vec(&data, &single).unwrap());
    assert_eq!(decompress_frame_to_vec(&packed).unwrap(), data);
}
