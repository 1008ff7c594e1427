// Container reader: corruption and truncation handling, listing, and
// hand-built containers in the layout lzop itself writes.

use lzo::block::{compress_to_vec, decompress_safe_limited, DecompressError};
use lzo::frame::types::{adler32, F_ADLER32_D, F_OS_UNIX, MAX_BLOCK_SIZE};
use lzo::frame::{
    compress_frame_to_vec, decompress_frame, decompress_frame_to_vec, scan_frame, write_header,
    FrameError, FrameHeader, FramePrefs,
};

fn header_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    write_header(&mut buf, &FrameHeader::for_prefs(&FramePrefs::default())).unwrap();
    buf
}

fn push_block(buf: &mut Vec<u8>, raw_len: u32, payload: &[u8], raw_sum: u32) {
    buf.extend_from_slice(&raw_len.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&raw_sum.to_be_bytes());
    buf.extend_from_slice(payload);
}

fn text(n: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times. "
        .iter()
        .copied()
        .cycle()
        .take(n)
        .collect()
}

#[test]
fn hand_built_container_decodes() {
    let plain = text(3000);
    let packed = compress_to_vec(&plain);
    let mut buf = header_bytes();
    push_block(&mut buf, 3000, &packed, adler32(&plain));
    push_block(&mut buf, 3, b"end", adler32(b"end"));
    buf.extend_from_slice(&0u32.to_be_bytes());

    let mut out = Vec::new();
    let (header, stats) = decompress_frame(&mut &buf[..], &mut out).unwrap();
    assert_eq!(header.flags & (F_ADLER32_D | F_OS_UNIX), F_ADLER32_D | F_OS_UNIX);
    assert_eq!(stats.blocks, 2);
    assert_eq!(stats.packed_bytes, buf.len() as u64);
    assert_eq!(&out[..3000], &plain[..]);
    assert_eq!(&out[3000..], b"end");
}

#[test]
fn stored_block_corruption_fails_checksum() {
    let mut buf = header_bytes();
    push_block(&mut buf, 4, b"data", adler32(b"data"));
    buf.extend_from_slice(&0u32.to_be_bytes());
    let at = buf.len() - 5;
    buf[at] ^= 0x20;
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::BlockChecksum { block: 0, .. })
    ));
}

#[test]
fn compressed_payload_corruption_detected_with_checksum() {
    let prefs = FramePrefs {
        checksum_compressed: true,
        ..FramePrefs::default()
    };
    let mut buf = compress_frame_to_vec(&text(10_000), &prefs).unwrap();
    let at = buf.len() - 10;
    buf[at] ^= 0xff;
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::BlockChecksum { kind: "compressed data", .. })
    ));
}

#[test]
fn declared_size_must_match_decoded_size() {
    let plain = text(1000);
    let packed = compress_to_vec(&plain);
    let mut buf = header_bytes();
    push_block(&mut buf, 1001, &packed, adler32(&plain));
    buf.extend_from_slice(&0u32.to_be_bytes());
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::SizeMismatch { expected: 1001, actual: 1000, .. })
    ));
}

#[test]
fn corrupt_stream_reports_block_error() {
    let mut buf = header_bytes();
    // Initial literal run of 3 followed by an end marker with length 2.
    push_block(&mut buf, 10, &[20, b'a', b'b', b'c', 0x12, 0, 0], 0);
    buf.extend_from_slice(&0u32.to_be_bytes());
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::CorruptBlock(_))
    ));
}

#[test]
fn oversized_and_inverted_blocks_rejected() {
    let mut buf = header_bytes();
    buf.extend_from_slice(&(MAX_BLOCK_SIZE as u32 + 1).to_be_bytes());
    buf.extend_from_slice(&8u32.to_be_bytes());
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::BlockTooLarge { .. })
    ));

    let mut buf = header_bytes();
    buf.extend_from_slice(&8u32.to_be_bytes());
    buf.extend_from_slice(&9u32.to_be_bytes());
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::BadBlockSize { packed: 9, raw: 8, .. })
    ));
}

#[test]
fn missing_end_marker_is_truncated() {
    let mut buf = compress_frame_to_vec(&text(500), &FramePrefs::default()).unwrap();
    buf.truncate(buf.len() - 4);
    assert!(matches!(decompress_frame_to_vec(&buf), Err(FrameError::Truncated)));
    assert!(matches!(scan_frame(&mut &buf[..]), Err(FrameError::Truncated)));
}

#[test]
fn scan_agrees_with_decode() {
    let data = text(700_000);
    let prefs = FramePrefs {
        block_size: 100_000,
        name: "times.txt".to_owned(),
        ..FramePrefs::default()
    };
    let buf = compress_frame_to_vec(&data, &prefs).unwrap();

    let info = scan_frame(&mut &buf[..]).unwrap();
    let mut sink = Vec::new();
    let (header, stats) = decompress_frame(&mut &buf[..], &mut sink).unwrap();
    assert_eq!(info.header, header);
    assert_eq!(info.stats, stats);
    assert_eq!(info.stats.blocks, 7);
    assert_eq!(info.header.name, "times.txt");
}

#[test]
fn block_cannot_expand_past_declared_size() {
    // One literal, then an M3 match whose length is extended by 40000 zero
    // bytes: about 10 MB of output from a 40 KB payload.
    let mut stream = vec![0x12, b'a', 0x20];
    stream.extend(std::iter::repeat(0).take(40_000));
    stream.extend_from_slice(&[1, 0, 0, 0x11, 0, 0]);
    let raw_len = stream.len() + 1;

    let mut buf = header_bytes();
    push_block(&mut buf, raw_len as u32, &stream, 0);
    buf.extend_from_slice(&0u32.to_be_bytes());
    assert!(matches!(
        decompress_frame_to_vec(&buf),
        Err(FrameError::CorruptBlock(DecompressError::Malformed))
    ));

    let mut out = Vec::new();
    assert_eq!(
        decompress_safe_limited(&stream, &mut out, raw_len),
        Err(DecompressError::Malformed)
    );
    assert!(out.len() <= raw_len);
}
