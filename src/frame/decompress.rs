//! lzop container decompression and inspection.
//!
//! Blocks are read, verified and decoded one at a time, so memory use is
//! bounded by the largest block (at most [`MAX_BLOCK_SIZE`]). A block is
//! never decoded past its declared uncompressed size.

use std::io::{self, Read, Write};

use super::header::{has_data_checksum, has_packed_checksum, read_header, FrameHeader};
use super::types::{adler32, map_eof, FrameError, FrameStats, MAX_BLOCK_SIZE};
use crate::block::decompress_api::decompress_safe_limited;

/// Size fields and checksums that precede a block payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockHeader {
    raw_len: usize,
    packed_len: usize,
    raw_checksum: Option<u32>,
    packed_checksum: Option<u32>,
}

impl BlockHeader {
    fn is_stored(&self) -> bool {
        self.packed_len == self.raw_len
    }

    /// Bytes taken by the size fields and checksums.
    fn framing_len(&self) -> u64 {
        8 + 4 * (self.raw_checksum.is_some() as u64 + self.packed_checksum.is_some() as u64)
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, FrameError> {
    let mut b = [0u8; 4];
    reader.read_exact(&mut b).map_err(map_eof)?;
    Ok(u32::from_be_bytes(b))
}

/// Reads the next block header. `None` is the end-of-container marker.
fn read_block_header<R: Read>(
    reader: &mut R,
    header: &FrameHeader,
    block: u64,
) -> Result<Option<BlockHeader>, FrameError> {
    let raw_len = read_u32(reader)? as usize;
    if raw_len == 0 {
        return Ok(None);
    }
    if raw_len > MAX_BLOCK_SIZE {
        return Err(FrameError::BlockTooLarge { block, size: raw_len });
    }
    let packed_len = read_u32(reader)? as usize;
    if packed_len == 0 || packed_len > raw_len {
        return Err(FrameError::BadBlockSize {
            block,
            packed: packed_len,
            raw: raw_len,
        });
    }
    let raw_checksum = if has_data_checksum(header) {
        Some(read_u32(reader)?)
    } else {
        None
    };
    let packed_checksum = if has_packed_checksum(header) && packed_len < raw_len {
        Some(read_u32(reader)?)
    } else {
        None
    };
    Ok(Some(BlockHeader {
        raw_len,
        packed_len,
        raw_checksum,
        packed_checksum,
    }))
}

/// Decodes the blocks following an already-read `header`.
pub fn decompress_blocks<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    header: &FrameHeader,
) -> Result<FrameStats, FrameError> {
    let mut stats = FrameStats {
        packed_bytes: header.encoded_len() as u64,
        ..FrameStats::default()
    };
    let mut packed = Vec::new();
    let mut raw = Vec::new();

    loop {
        let block = stats.blocks;
        let bh = match read_block_header(reader, header, block)? {
            Some(bh) => bh,
            None => break,
        };

        packed.resize(bh.packed_len, 0);
        reader.read_exact(&mut packed).map_err(map_eof)?;

        if let Some(expected) = bh.packed_checksum {
            if adler32(&packed) != expected {
                return Err(FrameError::BlockChecksum {
                    kind: "compressed data",
                    block,
                });
            }
        }

        let data: &[u8] = if bh.is_stored() {
            &packed
        } else {
            raw.clear();
            raw.reserve(bh.raw_len);
            let n = decompress_safe_limited(&packed, &mut raw, bh.raw_len)?;
            if n != bh.raw_len {
                return Err(FrameError::SizeMismatch {
                    block,
                    expected: bh.raw_len,
                    actual: n,
                });
            }
            &raw
        };

        if let Some(expected) = bh.raw_checksum {
            if adler32(data) != expected {
                return Err(FrameError::BlockChecksum {
                    kind: "uncompressed data",
                    block,
                });
            }
        }

        writer.write_all(data)?;
        stats.raw_bytes += bh.raw_len as u64;
        stats.packed_bytes += bh.framing_len() + bh.packed_len as u64;
        stats.blocks += 1;
    }

    stats.packed_bytes += 4;
    writer.flush()?;
    Ok(stats)
}

/// Decodes a complete container: header, blocks and end marker.
pub fn decompress_frame<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<(FrameHeader, FrameStats), FrameError> {
    let header = read_header(reader)?;
    let stats = decompress_blocks(reader, writer, &header)?;
    Ok((header, stats))
}

/// Decodes an in-memory container.
pub fn decompress_frame_to_vec(data: &[u8]) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::new();
    decompress_frame(&mut &data[..], &mut out)?;
    Ok(out)
}

/// Container summary produced without decoding any block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub header: FrameHeader,
    pub stats: FrameStats,
}

/// Walks a container's block headers, skipping payloads, to collect sizes.
pub fn scan_frame<R: Read>(reader: &mut R) -> Result<FrameInfo, FrameError> {
    let header = read_header(reader)?;
    let mut stats = FrameStats {
        packed_bytes: header.encoded_len() as u64,
        ..FrameStats::default()
    };
    while let Some(bh) = read_block_header(reader, &header, stats.blocks)? {
        let skipped = io::copy(&mut reader.by_ref().take(bh.packed_len as u64), &mut io::sink())?;
        if skipped != bh.packed_len as u64 {
            return Err(FrameError::Truncated);
        }
        stats.raw_bytes += bh.raw_len as u64;
        stats.packed_bytes += bh.framing_len() + bh.packed_len as u64;
        stats.blocks += 1;
    }
    stats.packed_bytes += 4;
    Ok(FrameInfo { header, stats })
}
