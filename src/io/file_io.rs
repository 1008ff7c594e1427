//! File I/O primitives for the compression pipeline.
//!
//! - [`open_src_file`]: resolves a path string to a `Box<dyn Read>`,
//!   handling the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`]: resolves a path string to a [`DstFile`], handling
//!   the `"stdout"` and null sentinels and enforcing the overwrite policy.
//! - [`ProgressReader`]: counts bytes as they are read and reports
//!   progress at notification level 2.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::io::prefs::{display_level, display_update, Prefs, MB};

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

/// Sentinel: discard output.
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

/// Alternate sentinel accepted for discard output.
pub const NULL_OUTPUT: &str = "null";

#[inline]
pub fn is_stdin(s: &str) -> bool {
    s == STDIN_MARK
}

#[inline]
pub fn is_stdout(s: &str) -> bool {
    s == STDOUT_MARK
}

#[inline]
pub fn is_null_output(s: &str) -> bool {
    s == NUL_MARK || s == NULL_OUTPUT
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source file for reading.
///
/// - `"stdin"` returns standard input.
/// - A directory is rejected with [`io::ErrorKind::InvalidInput`].
/// - Anything else is opened and wrapped in a [`BufReader`].
pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if is_stdin(path) {
        display_level(4, "Using stdin for input\n");
        return Ok(Box::new(io::stdin().lock()));
    }

    if Path::new(path).is_dir() {
        display_level(1, &format!("lzo: {} is a directory -- ignored\n", path));
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path).map_err(|e| {
        display_level(1, &format!("{}: {}\n", path, e));
        e
    })?;
    Ok(Box::new(BufReader::new(f)))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`].
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
    /// Set for regular files only; used to restore metadata or to remove a
    /// partial output after a failure.
    pub path: Option<PathBuf>,
}

impl DstFile {
    /// Deletes a partially written destination. Standard output and the
    /// null device are left alone.
    pub fn discard(self) {
        let path = self.path.clone();
        drop(self);
        if let Some(p) = path {
            let _ = fs::remove_file(p);
        }
    }
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens (creating or truncating) the destination.
///
/// An existing regular file is only replaced when `prefs.overwrite` is set.
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<DstFile> {
    if is_stdout(path) {
        display_level(4, "Using stdout for output\n");
        return Ok(DstFile {
            inner: Box::new(io::stdout().lock()),
            is_stdout: true,
            path: None,
        });
    }

    if is_null_output(path) {
        return Ok(DstFile {
            inner: Box::new(io::sink()),
            is_stdout: false,
            path: None,
        });
    }

    if Path::new(path).exists() && !prefs.overwrite {
        display_level(1, &format!("lzo: {} already exists; not overwritten\n", path));
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists", path),
        ));
    }

    let f = File::create(path).map_err(|e| {
        display_level(1, &format!("{}: {}\n", path, e));
        e
    })?;
    Ok(DstFile {
        inner: Box::new(BufWriter::new(f)),
        is_stdout: false,
        path: Some(PathBuf::from(path)),
    })
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Wraps a reader and reports the running byte count.
pub struct ProgressReader<R: Read> {
    inner: R,
    pub bytes: u64,
    label: &'static str,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, label: &'static str) -> Self {
        Self {
            inner,
            bytes: 0,
            label,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes += n as u64;
        display_update(
            2,
            &format!("\r{} : {} MiB   ", self.label, self.bytes / MB as u64),
        );
        Ok(n)
    }
}

/// Clears the progress line.
pub fn clear_progress() {
    display_update(2, &format!("\r{:79}\r", ""));
}
