use rayon::prelude::*;

use super::record::BlockRecord;
use crate::engine::core::{BLOCK_SIZE, Block};

pub const PARALLEL_THRESHOLD: usize = 4 * 1024; // process independent blocks in parallel from 4 KiB

/// Maps every 16-byte chunk of `input` (the last may be shorter) to a record, in parallel for
/// large inputs. Records come back in input order either way.
pub(crate) fn map_blocks<F>(input: &[u8], f: F) -> Vec<BlockRecord>
where
    F: Fn(usize, &[u8]) -> BlockRecord + Sync + Send,
{
    if input.len() >= PARALLEL_THRESHOLD {
        input
            .par_chunks(BLOCK_SIZE)
            .enumerate()
            .map(|(i, chunk)| f(i, chunk))
            .collect()
    } else {
        input
            .chunks(BLOCK_SIZE)
            .enumerate()
            .map(|(i, chunk)| f(i, chunk))
            .collect()
    }
}

/// Copies up to 16 bytes into a zeroed block.
#[inline(always)]
pub(crate) fn to_block(chunk: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    let n = chunk.len().min(BLOCK_SIZE);
    block[..n].copy_from_slice(&chunk[..n]);
    block
}

#[inline(always)]
pub(crate) fn xor_blocks(a: &Block, b: &Block) -> Block {
    let mut out = *a;
    for (o, x) in out.iter_mut().zip(b) {
        *o ^= x;
    }
    out
}

/// XORs a data chunk (1-16 bytes) with the leading bytes of the keystream block.
#[inline(always)]
pub(crate) fn xor_chunk(keystream: &Block, chunk: &[u8]) -> Vec<u8> {
    chunk.iter().zip(keystream).map(|(c, k)| c ^ k).collect()
}

/// Counter block for unit `offset`: the nonce read as a big-endian 128-bit integer plus `offset`.
#[inline(always)]
pub(crate) fn counter_block(nonce: &Block, offset: u128) -> Block {
    u128::from_be_bytes(*nonce).wrapping_add(offset).to_be_bytes()
}
