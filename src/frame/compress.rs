//! lzop container compression.
//!
//! The input is cut into blocks of `prefs.block_size` bytes. Blocks are
//! independent, so each batch of up to `nb_workers` blocks is compressed on
//! a rayon pool and then written in input order. The batch buffer grows
//! with the input read, and the worker count is lowered when a full batch
//! would exceed [`BATCH_MEMORY_MAX`]. A block whose compressed
//! form is not smaller than its input is stored verbatim.

use std::io::{self, Read, Write};

use rayon::prelude::*;

use super::header::{write_header, FrameHeader};
use super::types::{adler32, FrameError, FramePrefs, FrameStats, MAX_BLOCK_SIZE};
use crate::block::compress::compress_to_vec;
use crate::config::{BATCH_MEMORY_MAX, MULTITHREAD};

/// One block ready to be written.
struct EncodedBlock {
    raw_len: usize,
    /// `None` when the block is stored uncompressed.
    packed: Option<Vec<u8>>,
    raw_checksum: u32,
    packed_checksum: Option<u32>,
}

fn encode_block(raw: &[u8], checksum_compressed: bool) -> EncodedBlock {
    let raw_checksum = adler32(raw);
    let packed = compress_to_vec(raw);
    if packed.len() < raw.len() {
        let packed_checksum = checksum_compressed.then(|| adler32(&packed));
        EncodedBlock {
            raw_len: raw.len(),
            packed: Some(packed),
            raw_checksum,
            packed_checksum,
        }
    } else {
        EncodedBlock {
            raw_len: raw.len(),
            packed: None,
            raw_checksum,
            packed_checksum: None,
        }
    }
}

/// Writes one block. `raw` is the uncompressed input, used for stored
/// blocks. Returns the bytes written.
fn write_block<W: Write>(writer: &mut W, block: &EncodedBlock, raw: &[u8]) -> io::Result<u64> {
    let payload: &[u8] = block.packed.as_deref().unwrap_or(raw);
    writer.write_all(&(block.raw_len as u32).to_be_bytes())?;
    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(&block.raw_checksum.to_be_bytes())?;
    let mut written = 12u64;
    if let Some(c) = block.packed_checksum {
        writer.write_all(&c.to_be_bytes())?;
        written += 4;
    }
    writer.write_all(payload)?;
    Ok(written + payload.len() as u64)
}

/// Appends up to `blocks` whole blocks from `reader` to `buf`. The buffer
/// grows with the data actually read. Returns `true` once the reader is
/// exhausted.
fn fill_batch<R: Read>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    block_size: usize,
    blocks: usize,
) -> io::Result<bool> {
    for _ in 0..blocks {
        let n = reader
            .by_ref()
            .take(block_size as u64)
            .read_to_end(buf)?;
        if n < block_size {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Workers per batch, reduced so one batch of uncompressed input stays
/// within [`BATCH_MEMORY_MAX`].
pub(crate) fn batch_workers(block_size: usize, requested: usize) -> usize {
    let budget = (BATCH_MEMORY_MAX / block_size.max(1)).max(1);
    requested.clamp(1, budget)
}

fn encode_batch(
    chunks: &[&[u8]],
    checksum_compressed: bool,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<EncodedBlock> {
    match pool {
        Some(pool) => pool.install(|| {
            chunks
                .par_iter()
                .map(|c| encode_block(c, checksum_compressed))
                .collect()
        }),
        None => chunks
            .iter()
            .map(|c| encode_block(c, checksum_compressed))
            .collect(),
    }
}

/// Compresses everything `reader` yields into one lzop container on
/// `writer`.
pub fn compress_frame<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prefs: &FramePrefs,
) -> Result<FrameStats, FrameError> {
    if prefs.block_size == 0 || prefs.block_size > MAX_BLOCK_SIZE {
        return Err(FrameError::InvalidBlockSize(prefs.block_size));
    }
    let workers = batch_workers(prefs.block_size, prefs.nb_workers);
    let pool = if MULTITHREAD && workers > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(io::Error::other)?,
        )
    } else {
        None
    };

    let header = FrameHeader::for_prefs(prefs);
    let mut stats = FrameStats {
        packed_bytes: write_header(writer, &header)? as u64,
        ..FrameStats::default()
    };

    let mut batch_buf = Vec::new();
    loop {
        batch_buf.clear();
        let exhausted = fill_batch(reader, &mut batch_buf, prefs.block_size, workers)?;
        if batch_buf.is_empty() {
            break;
        }
        let chunks: Vec<&[u8]> = batch_buf.chunks(prefs.block_size).collect();
        let encoded = encode_batch(&chunks, prefs.checksum_compressed, pool.as_ref());
        for (block, raw) in encoded.iter().zip(&chunks) {
            stats.packed_bytes += write_block(writer, block, raw)?;
            stats.raw_bytes += raw.len() as u64;
            stats.blocks += 1;
        }
        if exhausted {
            break;
        }
    }

    writer.write_all(&0u32.to_be_bytes())?;
    stats.packed_bytes += 4;
    writer.flush()?;
    Ok(stats)
}

/// Compresses `data` into an in-memory container.
pub fn compress_frame_to_vec(data: &[u8], prefs: &FramePrefs) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::with_capacity(crate::block::compress_bound(data.len()) + 64);
    compress_frame(&mut &data[..], &mut out, prefs)?;
    Ok(out)
}
