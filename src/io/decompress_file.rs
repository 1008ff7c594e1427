//! File-level decompression.
//!
//! - [`decompress_filename`]: decode one source into one destination.
//! - [`decompress_multiple_filenames`]: decode a batch, stripping the
//!   suffix from each source name (or writing to stdout / discarding).
//!
//! Containers restore the stored modification time and permission bits on
//! the output file unless [`Prefs::restore_metadata`] is cleared. A failed
//! decode removes the partially written output.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use filetime::FileTime;

use crate::block;
use crate::config::RAW_STREAM_MAX;
use crate::frame::{decompress_blocks, read_header, FrameHeader};
use crate::io::file_io::{
    clear_progress, is_stdin, open_dst_file, open_src_file, ProgressReader, NUL_MARK,
    STDOUT_MARK,
};
use crate::io::prefs::{display_level, final_time_display, Prefs};

/// Byte counts of a successful decompression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecompressStats {
    pub compressed_bytes: u64,
    pub decompressed_bytes: u64,
}

// Bare streams carry no size; start from this multiple of the input.
const RAW_SIZE_HINT_FACTOR: usize = 4;

fn decompress_raw<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    let hint = input.len().saturating_mul(RAW_SIZE_HINT_FACTOR).min(RAW_STREAM_MAX);
    let mut out = Vec::with_capacity(hint);
    block::decompress_safe_limited(&input, &mut out, RAW_STREAM_MAX)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.write_all(&out)?;
    writer.flush()?;
    Ok(out.len() as u64)
}

fn restore_metadata(path: &Path, header: &FrameHeader) -> io::Result<()> {
    if header.mtime != 0 {
        filetime::set_file_mtime(path, FileTime::from_unix_time(header.mtime as i64, 0))?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if header.mode != 0 {
            fs::set_permissions(path, fs::Permissions::from_mode(header.mode & 0o7777))?;
        }
    }
    Ok(())
}

fn decompress_one(src: &str, dst: &str, prefs: &Prefs) -> io::Result<DecompressStats> {
    let reader = open_src_file(src)?;
    let mut reader = ProgressReader::new(reader, "Decompressing");
    let dst = if prefs.test_mode { NUL_MARK } else { dst };
    let mut out = open_dst_file(dst, prefs)?;

    let result = if prefs.raw {
        decompress_raw(&mut reader, &mut out).map(|n| (None, n))
    } else {
        read_header(&mut reader)
            .and_then(|header| {
                let stats = decompress_blocks(&mut reader, &mut out, &header)?;
                Ok((Some(header), stats.raw_bytes))
            })
            .map_err(io::Error::from)
    };
    clear_progress();

    let (header, decoded) = match result {
        Ok(r) => r,
        Err(e) => {
            display_level(1, &format!("lzo: {}: {}\n", src, e));
            out.discard();
            return Err(e);
        }
    };

    let path = out.path.clone();
    drop(out);
    if let (Some(path), Some(header), true) = (path, header, prefs.restore_metadata) {
        if let Err(e) = restore_metadata(&path, &header) {
            display_level(2, &format!("lzo: {}: cannot restore metadata: {}\n", path.display(), e));
        }
    }

    if prefs.test_mode {
        display_level(2, &format!("{}: OK\n", src));
    } else {
        display_level(2, &format!("{:<20}: decoded {} bytes \n", src, decoded));
    }

    if prefs.remove_src_file && !prefs.test_mode && !is_stdin(src) {
        fs::remove_file(src)?;
        display_level(4, &format!("Removed {}\n", src));
    }

    Ok(DecompressStats {
        compressed_bytes: reader.bytes,
        decompressed_bytes: decoded,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decompresses `src` into `dst`.
///
/// `src` may be `"stdin"`; `dst` may be `"stdout"` or the null device.
pub fn decompress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<DecompressStats> {
    let start = Instant::now();
    let stats = decompress_one(src, dst, prefs)?;
    final_time_display(start, stats.decompressed_bytes);
    Ok(stats)
}

/// Decompresses each source.
///
/// `suffix` is either a sentinel (`"stdout"` or the null device), in which
/// case every source is decoded there, or the extension to strip from each
/// source name to form its output name. Sources without that extension are
/// skipped. Fails if any file failed or was skipped.
pub fn decompress_multiple_filenames(srcs: &[&str], suffix: &str, prefs: &Prefs) -> io::Result<()> {
    let start = Instant::now();
    let dst_is_special = suffix == STDOUT_MARK || suffix == NUL_MARK;
    let mut total = 0u64;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for &src in srcs {
        let dst = if dst_is_special || prefs.test_mode {
            suffix
        } else {
            match src.strip_suffix(suffix) {
                Some(stem) if !stem.is_empty() => stem,
                _ => {
                    display_level(
                        1,
                        &format!("lzo: {}: unknown suffix (expected {}) -- ignored\n", src, suffix),
                    );
                    skipped += 1;
                    continue;
                }
            }
        };
        match decompress_one(src, dst, prefs) {
            Ok(stats) => total += stats.decompressed_bytes,
            Err(_) => failed += 1,
        }
    }

    final_time_display(start, total);

    if failed + skipped > 0 {
        Err(io::Error::other(format!(
            "{} file(s) could not be decompressed; {} file(s) skipped",
            failed, skipped
        )))
    } else {
        Ok(())
    }
}
