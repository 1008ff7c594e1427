//! LZO1X block compression and decompression.
//!
//! A block is a raw LZO1X stream: no header, no checksum, no length field.
//! The caller supplies the compressed length and knows (or bounds) the
//! uncompressed size.

pub mod compress;
pub mod decompress_api;
pub mod decompress_core;
pub mod types;

// Re-export the most important public API items at the module level.
pub use compress::{compress, compress_bound, compress_to_vec};
pub use decompress_api::{decompress, decompress_safe, decompress_safe_limited, decompress_to_vec};
pub use types::{DecompressError, LzoStatus, END_OF_STREAM, M4_MAX_OFFSET};
