// lzor: LZO1X codec, lzop-compatible container, and the `lzo` tool

pub mod config;
pub mod block;
pub mod frame;
pub mod io;
pub mod cli;

// ── Version constants ────────────────────────────────────────────────────────
pub const LZO_VERSION_MAJOR: u32 = 0;
pub const LZO_VERSION_MINOR: u32 = 2;
pub const LZO_VERSION_RELEASE: u32 = 0;
pub const LZO_VERSION_NUMBER: u32 =
    LZO_VERSION_MAJOR * 100 * 100 + LZO_VERSION_MINOR * 100 + LZO_VERSION_RELEASE;
pub const LZO_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

pub fn version_number() -> u32 {
    LZO_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    LZO_VERSION_STRING
}

// ── Top-level re-exports ─────────────────────────────────────────────────────
pub use block::{
    compress, compress_bound, compress_to_vec, decompress, decompress_safe, decompress_to_vec,
    DecompressError, LzoStatus,
};
pub use frame::{compress_frame, decompress_frame, FrameError, FrameHeader, FramePrefs};
