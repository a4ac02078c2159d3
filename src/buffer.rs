//! Work buffer construction
//!
//! Every trial hashes `[counter (4 bytes, LE)] ++ [token x 262144]`. Only the
//! counter changes, so the ~12.6 MB payload is built once and shared
//! read-only between workers behind an `Arc`.

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Size of the mutable counter prefix
pub const COUNTER_LEN: usize = 4;

/// Number of token copies in the payload
pub const TOKEN_COPIES: usize = 262_144;

/// Immutable trailing part of the work buffer
#[derive(Debug, Clone)]
pub struct WorkBuffer {
    payload: Arc<[u8]>,
}

impl WorkBuffer {
    /// Tile `token` back to back `TOKEN_COPIES` times
    pub fn new(token: &[u8]) -> Self {
        let mut payload = vec![0u8; token.len() * TOKEN_COPIES];
        if !token.is_empty() {
            payload
                .par_chunks_mut(token.len())
                .for_each(|chunk| chunk.copy_from_slice(token));
        }

        Self {
            payload: payload.into(),
        }
    }

    /// Shared static bytes that follow the counter
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Length of the full buffer including the counter prefix
    pub fn full_len(&self) -> usize {
        COUNTER_LEN + self.payload.len()
    }

    /// Contiguous `[0, 0, 0, 0] ++ payload` buffer, for searchers that
    /// rewrite the counter in place and hash the whole thing.
    pub fn materialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.full_len());
        buffer.extend_from_slice(&[0u8; COUNTER_LEN]);
        buffer.extend_from_slice(&self.payload);
        buffer
    }

    /// Digest prefix for `counter` without touching a contiguous buffer
    pub fn digest_prefix(&self, counter: u32) -> u32 {
        let mut hasher = Sha256::new();
        hasher.update(counter.to_le_bytes());
        hasher.update(&self.payload);
        let digest: [u8; 32] = hasher.finalize().into();
        read_prefix(&digest)
    }
}

/// First four digest bytes as a big-endian integer
#[inline(always)]
pub fn read_prefix(digest: &[u8; 32]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
