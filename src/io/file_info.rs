//! File information display for the `--list` flag.
//!
//! Walks the block headers of one or more containers without decoding any
//! payload and prints a summary table: method, compressed and uncompressed
//! sizes, ratio, and the name stored in the header.
//!
//! Entry point: [`display_compressed_files_info`].

use std::fs::File;
use std::io::{self, BufReader};

use crate::cli::arg_utils::last_name_from_path;
use crate::frame::{scan_frame, FrameInfo};
use crate::io::prefs::{display_level, notification_level};

/// Summary of one container on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFileInfo {
    /// Display name (basename of the file path).
    pub file_name: String,
    pub frame: FrameInfo,
}

impl CompressedFileInfo {
    /// Compressed / uncompressed, as a percentage. `None` for empty content.
    pub fn ratio(&self) -> Option<f64> {
        let stats = &self.frame.stats;
        if stats.raw_bytes == 0 {
            None
        } else {
            Some(stats.packed_bytes as f64 / stats.raw_bytes as f64 * 100.0)
        }
    }
}

/// Scans the container at `path`.
pub fn get_compressed_file_info(path: &str) -> io::Result<CompressedFileInfo> {
    let f = File::open(path)?;
    let frame = scan_frame(&mut BufReader::new(f))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(CompressedFileInfo {
        file_name: last_name_from_path(path).to_owned(),
        frame,
    })
}

/// Formats a byte count with binary suffixes (`12.00K`, `3.50M`).
fn to_human(mut size: f64) -> String {
    const UNITS: &[&str] = &["", "K", "M", "G", "T", "P", "E"];
    let mut i = 0usize;
    while size >= 1024.0 && i + 1 < UNITS.len() {
        size /= 1024.0;
        i += 1;
    }
    format!("{:.2}{}", size, UNITS[i])
}

/// Prints one table row per container. At notification level 3 and above a
/// detailed block listing follows each row.
///
/// Stops at the first file that cannot be opened or parsed.
pub fn display_compressed_files_info(paths: &[&str]) -> io::Result<()> {
    println!(
        "{:>12} {:>11} {:>13} {:>8}   {}",
        "Method", "Compressed", "Uncompressed", "Ratio", "Name"
    );

    for &path in paths {
        let info = get_compressed_file_info(path).map_err(|e| {
            display_level(1, &format!("lzo: {}: {}\n", path, e));
            e
        })?;
        let header = &info.frame.header;
        let stats = &info.frame.stats;
        let name = if header.name.is_empty() {
            info.file_name.as_str()
        } else {
            header.name.as_str()
        };
        let ratio = match info.ratio() {
            Some(r) => format!("{:.2}%", r),
            None => "-".to_owned(),
        };
        println!(
            "{:>12} {:>11} {:>13} {:>8}   {}",
            header.method.name(),
            to_human(stats.packed_bytes as f64),
            to_human(stats.raw_bytes as f64),
            ratio,
            name
        );

        if notification_level() >= 3 {
            println!(
                "    blocks: {}  version: 0x{:04x}  flags: 0x{:08x}  mode: {:o}  mtime: {}",
                stats.blocks, header.version, header.flags, header.mode, header.mtime
            );
        }
    }
    Ok(())
}
