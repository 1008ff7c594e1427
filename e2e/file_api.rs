//! E2E: streaming container API
//!
//! Drives `compress_frame` / `decompress_frame` through `Read` / `Write`
//! implementations that behave like pipes and sockets: short reads and
//! writers that only accept a few bytes at a time.

use std::io::{self, Cursor, Read, Write};

use lzo::frame::{scan_frame, FrameStats};
use lzo::{compress_frame, decompress_frame, FramePrefs};

/// Returns at most `step` bytes per `read` call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Accepts at most 7 bytes per `write` call.
struct Narrow(Vec<u8>);

impl Write for Narrow {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(7);
        self.0.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn payload() -> Vec<u8> {
    (0..150_000u32)
        .map(|i| if i % 1000 < 600 { b'a' + (i % 26) as u8 } else { (i * 31 >> 3) as u8 })
        .collect()
}

#[test]
fn short_reads_produce_identical_container() {
    let data = payload();
    let prefs = FramePrefs {
        block_size: 32 * 1024,
        ..FramePrefs::default()
    };

    let mut whole = Vec::new();
    compress_frame(&mut Cursor::new(&data), &mut whole, &prefs).unwrap();

    let mut trickled = Vec::new();
    let mut reader = Trickle { data: &data, step: 1000 };
    compress_frame(&mut reader, &mut trickled, &prefs).unwrap();

    assert_eq!(whole, trickled);
}

#[test]
fn decode_from_trickling_reader_to_narrow_writer() {
    let data = payload();
    let prefs = FramePrefs {
        block_size: 40_000,
        checksum_compressed: true,
        ..FramePrefs::default()
    };
    let mut packed = Vec::new();
    let written = compress_frame(&mut &data[..], &mut packed, &prefs).unwrap();

    let mut reader = Trickle { data: &packed, step: 13 };
    let mut out = Narrow(Vec::new());
    let (header, read) = decompress_frame(&mut reader, &mut out).unwrap();
    assert_eq!(out.0, data);
    assert_eq!(header.name, "");
    assert_eq!(read, written);
    assert_eq!(
        read,
        FrameStats {
            raw_bytes: 150_000,
            packed_bytes: packed.len() as u64,
            blocks: 4,
        }
    );
}

#[test]
fn containers_read_back_to_back() {
    let first = b"first member ".repeat(100);
    let second = b"second member ".repeat(100);
    let mut stream = Vec::new();
    compress_frame(&mut &first[..], &mut stream, &FramePrefs::default()).unwrap();
    compress_frame(&mut &second[..], &mut stream, &FramePrefs::default()).unwrap();

    let mut cursor = Cursor::new(&stream);
    let mut out = Vec::new();
    decompress_frame(&mut cursor, &mut out).unwrap();
    assert_eq!(out, first);

    let info = scan_frame(&mut cursor).unwrap();
    assert_eq!(info.stats.raw_bytes, second.len() as u64);
    assert_eq!(cursor.position(), stream.len() as u64);
}

#[test]
fn header_metadata_is_carried() {
    let prefs = FramePrefs {
        name: "report.csv".to_owned(),
        mode: 0o640,
        mtime: 1_600_000_000,
        ..FramePrefs::default()
    };
    let mut packed = Vec::new();
    compress_frame(&mut &b"a,b,c\n1,2,3\n"[..], &mut packed, &prefs).unwrap();

    let mut out = Vec::new();
    let (header, _) = decompress_frame(&mut &packed[..], &mut out).unwrap();
    assert_eq!(header.name, "report.csv");
    assert_eq!(header.mode, 0o640);
    assert_eq!(header.mtime, 1_600_000_000);
    assert_eq!(out, b"a,b,c\n1,2,3\n");
}
