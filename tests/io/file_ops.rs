use std::fs;
use std::path::Path;

use lzo::frame::read_header;
use lzo::io::file_info::get_compressed_file_info;
use lzo::io::{
    compress_filename, compress_multiple_filenames, decompress_filename,
    decompress_multiple_filenames, Prefs, NUL_MARK,
};
use tempfile::TempDir;

fn sample(n: usize) -> Vec<u8> {
    (0..n).map(|i| b"lzo file layer "[i % 15] ^ (i / 997) as u8).collect()
}

fn write(dir: &TempDir, name: &str, data: &[u8]) -> String {
    let p = dir.path().join(name);
    fs::write(&p, data).unwrap();
    p.to_str().unwrap().to_owned()
}

#[test]
fn multi_block_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let data = sample(300_000);
    let src = write(&dir, "big.dat", &data);
    let packed = format!("{}.lzo", src);
    let out = dir.path().join("big.out");
    let out = out.to_str().unwrap();

    let mut prefs = Prefs::default();
    prefs.set_block_size(64 * 1024).set_nb_workers(2);
    let c = compress_filename(&src, &packed, &prefs).unwrap();
    assert_eq!(c.bytes_in, 300_000);

    let d = decompress_filename(&packed, out, &prefs).unwrap();
    assert_eq!(d.decompressed_bytes, 300_000);
    assert_eq!(d.compressed_bytes, c.bytes_out);
    assert_eq!(fs::read(out).unwrap(), data);

    let info = get_compressed_file_info(&packed).unwrap();
    assert_eq!(info.frame.stats.blocks, 5);
    assert_eq!(info.frame.stats.raw_bytes, 300_000);
    assert_eq!(info.file_name, "big.dat.lzo");
    assert_eq!(info.frame.header.name, "big.dat");
}

#[test]
fn empty_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let src = write(&dir, "empty", b"");
    let packed = format!("{}.lzo", src);
    compress_filename(&src, &packed, &Prefs::default()).unwrap();
    fs::remove_file(&src).unwrap();
    let stats = decompress_filename(&packed, &src, &Prefs::default()).unwrap();
    assert_eq!(stats.decompressed_bytes, 0);
    assert!(fs::read(&src).unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn permissions_restored_unless_disabled() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let src = write(&dir, "script.sh", b"#!/bin/sh\necho hi\n");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o751)).unwrap();
    let packed = format!("{}.lzo", src);
    compress_filename(&src, &packed, &Prefs::default()).unwrap();
    let header = read_header(&mut &fs::read(&packed).unwrap()[..]).unwrap();
    assert_eq!(header.mode, 0o751);

    fs::remove_file(&src).unwrap();
    decompress_filename(&packed, &src, &Prefs::default()).unwrap();
    assert_eq!(fs::metadata(&src).unwrap().permissions().mode() & 0o777, 0o751);

    let plain = dir.path().join("plain.sh");
    let mut prefs = Prefs::default();
    prefs.set_restore_metadata(false);
    decompress_filename(&packed, plain.to_str().unwrap(), &prefs).unwrap();
    assert_ne!(fs::metadata(&plain).unwrap().permissions().mode() & 0o777, 0o751);
}

#[test]
fn batch_compress_then_decompress() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.txt", &sample(1000));
    let b = write(&dir, "b.txt", &sample(2000));

    let missed =
        compress_multiple_filenames(&[a.as_str(), b.as_str()], ".lzo", &Prefs::default()).unwrap();
    assert_eq!(missed, 0);
    fs::remove_file(&a).unwrap();
    fs::remove_file(&b).unwrap();

    let packed = [format!("{}.lzo", a), format!("{}.lzo", b)];
    let srcs: Vec<&str> = packed.iter().map(String::as_str).collect();
    decompress_multiple_filenames(&srcs, ".lzo", &Prefs::default()).unwrap();
    assert_eq!(fs::read(&a).unwrap(), sample(1000));
    assert_eq!(fs::read(&b).unwrap(), sample(2000));
}

#[test]
fn batch_test_mode_reports_corrupt_member() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good", &sample(4000));
    compress_filename(&good, &format!("{}.lzo", good), &Prefs::default()).unwrap();
    let bad = write(&dir, "bad.lzo", b"\x89LZO\0\r\n\x1a\nbroken");

    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let good_lzo = format!("{}.lzo", good);
    assert!(decompress_multiple_filenames(&[good_lzo.as_str()], NUL_MARK, &prefs).is_ok());
    let both = [good_lzo.as_str(), bad.as_str()];
    assert!(decompress_multiple_filenames(&both, NUL_MARK, &prefs).is_err());
    assert!(!Path::new(&dir.path().join("bad")).exists());
}

#[test]
fn raw_mode_roundtrip() {
    let dir = TempDir::new().unwrap();
    let data = sample(50_000);
    let src = write(&dir, "raw.bin", &data);
    let packed = format!("{}.lzo", src);
    let out = dir.path().join("raw.out");

    let mut prefs = Prefs::default();
    prefs.set_raw(true);
    compress_filename(&src, &packed, &prefs).unwrap();
    assert!(read_header(&mut &fs::read(&packed).unwrap()[..]).is_err());
    decompress_filename(&packed, out.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}
