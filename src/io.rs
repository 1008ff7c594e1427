//! File-level operations used by the `lzo` binary.
//!
//! This module assembles the file-handling sub-modules and re-exports the
//! symbols consumed by the CLI and library users.

pub mod compress_file;
pub mod decompress_file;
pub mod file_info;
pub mod file_io;
pub mod prefs;

// ── Core types ───────────────────────────────────────────────────────────────
pub use compress_file::CompressStats;
pub use decompress_file::DecompressStats;
pub use file_info::CompressedFileInfo;
pub use prefs::Prefs;

// ── Special I/O sentinels ────────────────────────────────────────────────────
pub use file_io::{NULL_OUTPUT, NUL_MARK, STDIN_MARK, STDOUT_MARK};

// ── Notification level ───────────────────────────────────────────────────────
pub use prefs::{default_nb_workers, set_notification_level};

// ── Compression ──────────────────────────────────────────────────────────────
pub use compress_file::{compress_filename, compress_multiple_filenames};

// ── Decompression ────────────────────────────────────────────────────────────
pub use decompress_file::{decompress_filename, decompress_multiple_filenames};

// ── --list ───────────────────────────────────────────────────────────────────
pub use file_info::display_compressed_files_info;
