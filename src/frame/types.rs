//! lzop container constants, preferences, statistics, and error type.
//!
//! The container layout follows lzop 1.04: a 9-byte magic, a big-endian
//! header protected by an Adler-32 checksum, then a sequence of blocks each
//! carrying its uncompressed and compressed sizes and optional checksums,
//! terminated by a zero uncompressed size.

use std::io;

use thiserror::Error;

use crate::block::DecompressError;

pub const MB: usize = 1 << 20;

// ─────────────────────────────────────────────────────────────────────────────
// Magic and versions
// ─────────────────────────────────────────────────────────────────────────────

pub const LZOP_MAGIC: [u8; 9] = [0x89, b'L', b'Z', b'O', 0x00, 0x0d, 0x0a, 0x1a, 0x0a];

/// Container version written by this crate (lzop 1.04).
pub const LZOP_VERSION: u16 = 0x1040;
/// Library version written into the header (liblzo 2.10).
pub const LZO_LIB_VERSION: u16 = 0x20a0;
/// Minimum reader version needed for the headers written here.
pub const LZOP_VERSION_NEEDED: u16 = 0x0940;
/// From this version on, headers carry `version_needed`, `level` and
/// `mtime_high`.
pub const VERSION_EXTENDED_HEADER: u16 = 0x0940;
/// Oldest container version this reader accepts.
pub const MIN_READ_VERSION: u16 = 0x0900;

/// Compression level recorded in headers (lzop's default `-3`).
pub const LEVEL_DEFAULT: u8 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Header flags (lzop conf.h)
// ─────────────────────────────────────────────────────────────────────────────

pub const F_ADLER32_D: u32 = 0x0000_0001;
pub const F_ADLER32_C: u32 = 0x0000_0002;
pub const F_STDIN: u32 = 0x0000_0004;
pub const F_STDOUT: u32 = 0x0000_0008;
pub const F_NAME_DEFAULT: u32 = 0x0000_0010;
pub const F_DOSISH: u32 = 0x0000_0020;
pub const F_H_EXTRA_FIELD: u32 = 0x0000_0040;
pub const F_H_GMTDIFF: u32 = 0x0000_0080;
pub const F_CRC32_D: u32 = 0x0000_0100;
pub const F_CRC32_C: u32 = 0x0000_0200;
pub const F_MULTIPART: u32 = 0x0000_0400;
pub const F_H_FILTER: u32 = 0x0000_0800;
pub const F_H_CRC32: u32 = 0x0000_1000;
pub const F_H_PATH: u32 = 0x0000_2000;
pub const F_OS_UNIX: u32 = 0x0300_0000;

// ─────────────────────────────────────────────────────────────────────────────
// Block limits
// ─────────────────────────────────────────────────────────────────────────────

/// Largest uncompressed block a reader accepts (lzop `MAX_BLOCK_SIZE`).
pub const MAX_BLOCK_SIZE: usize = 64 * MB;
/// Block size used when none is configured.
pub use crate::config::BLOCK_SIZE_DEFAULT;

// ─────────────────────────────────────────────────────────────────────────────
// Method
// ─────────────────────────────────────────────────────────────────────────────

/// Compression method byte. All three produce plain LZO1X streams and share
/// one decoder; only [`Method::Lzo1x1`] is produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Method {
    Lzo1x1 = 1,
    Lzo1x1_15 = 2,
    Lzo1x999 = 3,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::Lzo1x1 => "LZO1X-1",
            Method::Lzo1x1_15 => "LZO1X-1(15)",
            Method::Lzo1x999 => "LZO1X-999",
        }
    }
}

impl TryFrom<u8> for Method {
    type Error = FrameError;

    fn try_from(v: u8) -> Result<Self, FrameError> {
        match v {
            1 => Ok(Method::Lzo1x1),
            2 => Ok(Method::Lzo1x1_15),
            3 => Ok(Method::Lzo1x999),
            other => Err(FrameError::UnsupportedMethod(other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences and statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for writing a container.
#[derive(Debug, Clone)]
pub struct FramePrefs {
    /// Uncompressed bytes per block.
    pub block_size: usize,
    /// Also checksum the compressed payload of each block (`F_ADLER32_C`).
    pub checksum_compressed: bool,
    /// Blocks compressed concurrently per batch.
    pub nb_workers: usize,
    /// Original file name stored in the header.
    pub name: String,
    /// Unix permission bits stored in the header.
    pub mode: u32,
    /// Modification time (seconds since the epoch) stored in the header.
    pub mtime: u64,
    /// Input came from standard input (`F_STDIN`).
    pub from_stdin: bool,
}

impl Default for FramePrefs {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE_DEFAULT,
            checksum_compressed: false,
            nb_workers: 1,
            name: String::new(),
            mode: 0o644,
            mtime: 0,
            from_stdin: false,
        }
    }
}

/// Byte counts of one container run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Uncompressed bytes.
    pub raw_bytes: u64,
    /// Container bytes, header and block framing included.
    pub packed_bytes: u64,
    /// Number of data blocks.
    pub blocks: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("not an lzop file")]
    BadMagic,
    #[error("unexpected end of file")]
    Truncated,
    #[error("unsupported lzop version 0x{0:04x}")]
    UnsupportedVersion(u16),
    #[error("unsupported compression method {0}")]
    UnsupportedMethod(u8),
    #[error("unsupported lzop feature: {0}")]
    Unsupported(&'static str),
    #[error("header checksum error (stored 0x{stored:08x}, computed 0x{computed:08x})")]
    HeaderChecksum { stored: u32, computed: u32 },
    #[error("{kind} checksum error in block {block}")]
    BlockChecksum { kind: &'static str, block: u64 },
    #[error("block {block} too large ({size} bytes)")]
    BlockTooLarge { block: u64, size: usize },
    #[error("invalid sizes in block {block} (compressed {packed}, uncompressed {raw})")]
    BadBlockSize { block: u64, packed: usize, raw: usize },
    #[error("block {block} decoded to {actual} bytes, expected {expected}")]
    SizeMismatch { block: u64, expected: usize, actual: usize },
    #[error("corrupt block: {0}")]
    CorruptBlock(#[from] DecompressError),
    #[error("invalid block size {0}")]
    InvalidBlockSize(usize),
}

impl From<FrameError> for io::Error {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}

/// Adler-32 as used by lzop for headers and block payloads.
pub fn adler32(data: &[u8]) -> u32 {
    let mut hasher = simd_adler32::Adler32::new();
    hasher.write(data);
    hasher.finish()
}

/// Maps an unexpected EOF from `read_exact` to [`FrameError::Truncated`].
pub(crate) fn map_eof(e: io::Error) -> FrameError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        FrameError::Truncated
    } else {
        FrameError::Io(e)
    }
}
