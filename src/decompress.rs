//! Block-based decompression of the replay payload.
//!
//! Starting at `header_size`, the file holds `block_count` compressed
//! blocks back to back. Each block is an independent zlib stream; the
//! inflated outputs are concatenated in declared order to form the byte
//! stream walked by [`crate::records`].
//!
//! # Example
//!
//! ```no_run
//! use w3g_replay::decompress::{decompress_blocks, DEFAULT_MAX_DECOMPRESSED_SIZE};
//! use w3g_replay::format::BlockLayout;
//! use w3g_replay::header::ReplayHeader;
//!
//! let data = std::fs::read("replay.w3g").unwrap();
//! let header = ReplayHeader::parse(&data).unwrap();
//! let layout = BlockLayout::detect(&data, header.data_offset(), header.layout_hint());
//! let stream = decompress_blocks(&data, &header, layout, DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap();
//! println!("Decompressed {} bytes from {} blocks", stream.len(), header.block_count);
//! ```

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::binary::read_bytes;
use crate::error::{ReplayError, Result};
use crate::format::BlockLayout;
use crate::header::ReplayHeader;

/// Default upper bound on the total inflated size (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Cap on the up-front allocation taken from the declared size.
const INITIAL_CAPACITY_LIMIT: usize = 1024 * 1024;

/// Information parsed from a block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// The size of the compressed data following this header.
    pub compressed_size: u32,

    /// The declared size after decompression (typically 8192).
    pub decompressed_size: u32,

    /// The total size of this block header in bytes.
    pub header_size: usize,
}

impl BlockHeader {
    /// Parses a block header at `offset` using the given layout.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if the header does not fit.
    pub fn parse(data: &[u8], offset: usize, layout: BlockLayout) -> Result<Self> {
        let (compressed_size, decompressed_size) = layout.read_lengths(data, offset)?;
        Ok(BlockHeader {
            compressed_size,
            decompressed_size,
            header_size: layout.block_header_size(),
        })
    }
}

/// Inflates every compressed block and concatenates the output.
///
/// # Errors
///
/// Returns `ReplayError::CorruptBlock` if a block header or its compressed
/// bytes extend beyond the file, a block fails to inflate, or the total
/// output would exceed `max_output` bytes.
pub fn decompress_blocks(
    data: &[u8],
    header: &ReplayHeader,
    layout: BlockLayout,
    max_output: usize,
) -> Result<Vec<u8>> {
    let capacity = (header.decompressed_size as usize)
        .min(max_output)
        .min(INITIAL_CAPACITY_LIMIT);
    let mut result = Vec::with_capacity(capacity);

    let mut offset = header.data_offset();

    for block_index in 0..header.block_count {
        let block_header = BlockHeader::parse(data, offset, layout).map_err(|e| {
            ReplayError::corrupt_block(
                block_index,
                format!("block header at offset 0x{offset:X} unreadable: {e}"),
            )
        })?;

        let compressed_start = offset + block_header.header_size;
        let compressed_data =
            read_bytes(data, compressed_start, block_header.compressed_size as usize).map_err(
                |_| {
                    ReplayError::corrupt_block(
                        block_index,
                        format!(
                            "block at offset 0x{offset:X} declares {} compressed bytes, only {} remain",
                            block_header.compressed_size,
                            data.len().saturating_sub(compressed_start)
                        ),
                    )
                },
            )?;

        let budget = max_output.saturating_sub(result.len()) as u64;
        let before = result.len();
        ZlibDecoder::new(compressed_data)
            .take(budget.saturating_add(1))
            .read_to_end(&mut result)
            .map_err(|e| {
                ReplayError::corrupt_block(
                    block_index,
                    format!("inflate failed at offset 0x{offset:X}: {e}"),
                )
            })?;

        if result.len() > max_output {
            return Err(ReplayError::corrupt_block(
                block_index,
                format!("inflated output exceeds the {max_output} byte limit"),
            ));
        }

        tracing::trace!(
            block_index,
            offset,
            compressed = block_header.compressed_size,
            declared = block_header.decompressed_size,
            inflated = result.len() - before,
            "inflated block"
        );

        offset = compressed_start + compressed_data.len();
    }

    Ok(result)
}
