//! File-level compression.
//!
//! - [`compress_filename`]: compress one source into one destination.
//! - [`compress_multiple_filenames`]: compress a batch, appending a suffix
//!   to each source name (or writing everything to stdout).
//!
//! By default the output is an lzop container whose header records the
//! source's name, permission bits and modification time. With
//! [`Prefs::raw`] the whole input is packed into one bare LZO1X stream
//! instead.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use filetime::FileTime;

use crate::block;
use crate::config::RAW_STREAM_MAX;
use crate::frame::{compress_frame, FramePrefs};
use crate::io::file_io::{
    clear_progress, is_stdin, open_dst_file, open_src_file, ProgressReader, STDOUT_MARK,
};
use crate::io::prefs::{display_level, final_time_display, Prefs};

/// Byte counts of a successful compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

// ---------------------------------------------------------------------------
// Source metadata
// ---------------------------------------------------------------------------

/// Fills the header fields that describe the source file.
fn describe_source(src: &str, fp: &mut FramePrefs) {
    if is_stdin(src) {
        fp.from_stdin = true;
        return;
    }
    if let Some(name) = Path::new(src).file_name() {
        fp.name = name.to_string_lossy().into_owned();
    }
    if let Ok(meta) = fs::metadata(src) {
        fp.mtime = FileTime::from_last_modification_time(&meta)
            .unix_seconds()
            .max(0) as u64;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fp.mode = meta.permissions().mode() & 0o7777;
        }
    }
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

fn compress_raw<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut input = Vec::new();
    reader.take(RAW_STREAM_MAX as u64 + 1).read_to_end(&mut input)?;
    if input.len() > RAW_STREAM_MAX {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("raw mode is limited to {} bytes of input", RAW_STREAM_MAX),
        ));
    }
    let packed = block::compress_to_vec(&input);
    writer.write_all(&packed)?;
    writer.flush()?;
    Ok(packed.len() as u64)
}

fn compress_stream(src: &str, dst: &str, prefs: &Prefs) -> io::Result<CompressStats> {
    let reader = open_src_file(src)?;
    let mut reader = ProgressReader::new(reader, "Compressing");
    let mut out = open_dst_file(dst, prefs)?;

    let result = if prefs.raw {
        compress_raw(&mut reader, &mut out)
    } else {
        let mut fp = prefs.frame_prefs();
        describe_source(src, &mut fp);
        compress_frame(&mut reader, &mut out, &fp)
            .map(|stats| stats.packed_bytes)
            .map_err(io::Error::from)
    };
    clear_progress();

    match result {
        Ok(bytes_out) => Ok(CompressStats {
            bytes_in: reader.bytes,
            bytes_out,
        }),
        Err(e) => {
            display_level(1, &format!("lzo: {}: {}\n", src, e));
            out.discard();
            Err(e)
        }
    }
}

fn compress_one(src: &str, dst: &str, prefs: &Prefs) -> io::Result<CompressStats> {
    let stats = compress_stream(src, dst, prefs)?;

    let ratio = if stats.bytes_in == 0 {
        100.0
    } else {
        stats.bytes_out as f64 / stats.bytes_in as f64 * 100.0
    };
    display_level(
        2,
        &format!(
            "Compressed {} bytes into {} bytes ==> {:.2}% \n",
            stats.bytes_in, stats.bytes_out, ratio
        ),
    );

    if prefs.remove_src_file && !is_stdin(src) {
        fs::remove_file(src)?;
        display_level(4, &format!("Removed {}\n", src));
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compresses `src` into `dst`.
///
/// `src` may be `"stdin"` and `dst` may be `"stdout"` or the null device.
/// A failed run removes the partially written destination.
pub fn compress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<CompressStats> {
    let start = Instant::now();
    let stats = compress_one(src, dst, prefs)?;
    final_time_display(start, stats.bytes_in);
    Ok(stats)
}

/// Compresses each source to `<src><suffix>`, or to stdout when `suffix`
/// is `"stdout"`. Returns the number of files that failed.
pub fn compress_multiple_filenames(srcs: &[&str], suffix: &str, prefs: &Prefs) -> io::Result<usize> {
    let start = Instant::now();
    let mut total_in = 0u64;
    let mut missed = 0usize;

    for &src in srcs {
        let dst = if suffix == STDOUT_MARK {
            STDOUT_MARK.to_owned()
        } else {
            format!("{}{}", src, suffix)
        };
        match compress_one(src, &dst, prefs) {
            Ok(stats) => total_in += stats.bytes_in,
            Err(_) => missed += 1,
        }
    }

    final_time_display(start, total_in);
    Ok(missed)
}
