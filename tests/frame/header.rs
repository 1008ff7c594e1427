// lzop header parsing: field layout, version-dependent fields, and the
// features this reader refuses.

use std::io::Cursor;

use lzo::frame::types::{
    adler32, F_ADLER32_D, F_CRC32_D, F_H_EXTRA_FIELD, F_MULTIPART, F_OS_UNIX, F_STDIN,
    LZOP_MAGIC, LZOP_VERSION,
};
use lzo::frame::{read_header, write_header, FrameError, FrameHeader, FramePrefs, Method};

fn encoded(prefs: &FramePrefs) -> Vec<u8> {
    let mut buf = Vec::new();
    write_header(&mut buf, &FrameHeader::for_prefs(prefs)).unwrap();
    buf
}

/// Rewrites the trailing header checksum after a test edited the body.
fn reseal(buf: &mut [u8]) {
    let end = buf.len() - 4;
    let sum = adler32(&buf[LZOP_MAGIC.len()..end]);
    buf[end..].copy_from_slice(&sum.to_be_bytes());
}

const FLAGS_AT: usize = 17;

#[test]
fn written_header_fields() {
    let buf = encoded(&FramePrefs {
        name: "a.txt".to_owned(),
        mode: 0o640,
        mtime: 0x1_0000_0002,
        ..FramePrefs::default()
    });
    assert_eq!(&buf[..9], &LZOP_MAGIC);
    assert_eq!(u16::from_be_bytes([buf[9], buf[10]]), LZOP_VERSION);
    assert_eq!(buf[15], Method::Lzo1x1 as u8);
    let flags = u32::from_be_bytes(buf[FLAGS_AT..FLAGS_AT + 4].try_into().unwrap());
    assert_eq!(flags & F_ADLER32_D, F_ADLER32_D);
    assert_eq!(flags & F_OS_UNIX, F_OS_UNIX);
    assert_eq!(u32::from_be_bytes(buf[21..25].try_into().unwrap()), 0o640);
    assert_eq!(u32::from_be_bytes(buf[25..29].try_into().unwrap()), 2);
    assert_eq!(u32::from_be_bytes(buf[29..33].try_into().unwrap()), 1);
    assert_eq!(buf[33], 5);
    assert_eq!(&buf[34..39], b"a.txt");
    assert_eq!(buf.len(), 39 + 4);
}

#[test]
fn stdin_flag_round_trips() {
    let buf = encoded(&FramePrefs {
        from_stdin: true,
        ..FramePrefs::default()
    });
    let h = read_header(&mut Cursor::new(&buf)).unwrap();
    assert!(h.has_flag(F_STDIN));
    assert!(h.name.is_empty());
}

#[test]
fn old_header_without_extended_fields() {
    // A 0x0900 header has no version_needed, level or mtime_high.
    let mut body = Vec::new();
    body.extend_from_slice(&0x0900u16.to_be_bytes());
    body.extend_from_slice(&0x1080u16.to_be_bytes());
    body.push(1);
    body.extend_from_slice(&(F_ADLER32_D | F_OS_UNIX).to_be_bytes());
    body.extend_from_slice(&0o644u32.to_be_bytes());
    body.extend_from_slice(&1234u32.to_be_bytes());
    body.push(3);
    body.extend_from_slice(b"old");
    let mut buf = LZOP_MAGIC.to_vec();
    buf.extend_from_slice(&body);
    buf.extend_from_slice(&adler32(&body).to_be_bytes());

    let h = read_header(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(h.version, 0x0900);
    assert_eq!(h.method, Method::Lzo1x1);
    assert_eq!(h.mode, 0o644);
    assert_eq!(h.mtime, 1234);
    assert_eq!(h.name, "old");
}

#[test]
fn too_old_version_rejected() {
    let mut buf = encoded(&FramePrefs::default());
    buf[9..11].copy_from_slice(&0x0800u16.to_be_bytes());
    reseal(&mut buf);
    assert!(matches!(
        read_header(&mut Cursor::new(&buf)),
        Err(FrameError::UnsupportedVersion(0x0800))
    ));
}

#[test]
fn unknown_method_rejected() {
    let mut buf = encoded(&FramePrefs::default());
    buf[15] = 9;
    reseal(&mut buf);
    assert!(matches!(
        read_header(&mut Cursor::new(&buf)),
        Err(FrameError::UnsupportedMethod(9))
    ));
}

#[test]
fn unsupported_flags_rejected() {
    for flag in [F_CRC32_D, F_H_EXTRA_FIELD, F_MULTIPART] {
        let mut buf = encoded(&FramePrefs::default());
        let flags = u32::from_be_bytes(buf[FLAGS_AT..FLAGS_AT + 4].try_into().unwrap()) | flag;
        buf[FLAGS_AT..FLAGS_AT + 4].copy_from_slice(&flags.to_be_bytes());
        reseal(&mut buf);
        assert!(
            matches!(read_header(&mut Cursor::new(&buf)), Err(FrameError::Unsupported(_))),
            "flag 0x{:x}",
            flag
        );
    }
}

#[test]
fn edited_body_fails_checksum() {
    let mut buf = encoded(&FramePrefs {
        name: "x".to_owned(),
        ..FramePrefs::default()
    });
    buf[34] = b'y';
    assert!(matches!(
        read_header(&mut Cursor::new(&buf)),
        Err(FrameError::HeaderChecksum { .. })
    ));
}

#[test]
fn short_input_is_bad_magic_or_truncated() {
    assert!(matches!(read_header(&mut Cursor::new(&[0x89u8, b'L'])), Err(FrameError::BadMagic)));
    let buf = encoded(&FramePrefs::default());
    assert!(matches!(
        read_header(&mut Cursor::new(&buf[..20])),
        Err(FrameError::Truncated)
    ));
}
