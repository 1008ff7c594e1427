//! lzop-compatible container around LZO1X blocks.
//!
//! Files written here are readable by `lzop -d`, and files written by
//! `lzop` with its default Adler-32 checksums are readable here.

pub mod compress;
pub mod decompress;
pub mod header;
pub mod types;

pub use compress::{compress_frame, compress_frame_to_vec};
pub use decompress::{decompress_blocks, decompress_frame, decompress_frame_to_vec, scan_frame, FrameInfo};
pub use header::{read_header, write_header, FrameHeader};
pub use types::{FrameError, FramePrefs, FrameStats, Method, BLOCK_SIZE_DEFAULT, LZOP_MAGIC, MAX_BLOCK_SIZE};
