//! crypto/sha1.rs
//! Incremental SHA-1 (FIPS 180-1).
//!
//! Design:
//! - Input is buffered into 64-byte blocks; each full block runs one compression.
//! - The message schedule is a 16-word circular window local to each compression,
//!   so independent `Sha1` values never share scratch state.
//! - `finalize` takes `self`: a state cannot be fed or finalized twice.
//!
//! Backup content addresses depend on this being bit-exact. Test vectors live in
//! `tests/test_digest.rs`.

use std::fmt;
use byteorder::{BigEndian, ByteOrder};

use crate::constants::{BLOCK_LEN, DIGEST_LEN};
use crate::crypto::types::Digest;

const INITIAL_STATE: [u32; 5] = [
    0x6745_2301,
    0xEFCD_AB89,
    0x98BA_DCFE,
    0x1032_5476,
    0xC3D2_E1F0,
];

const ROUND_CONSTANTS: [u32; 4] = [
    0x5A82_7999, // steps  0..20
    0x6ED9_EBA1, // steps 20..40
    0x8F1B_BCDC, // steps 40..60
    0xCA62_C1D6, // steps 60..80
];

/// Bytes appended after the 0x80 marker; at most one block's worth is needed.
const ZERO_PAD: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// Offset within a block where the 64-bit length trailer starts.
const LENGTH_OFFSET: usize = BLOCK_LEN - 8;

/// Running SHA-1 state.
#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    /// Total message bits absorbed so far.
    bit_count: u64,
    buffer: [u8; BLOCK_LEN],
    /// Pending bytes in `buffer`, always < BLOCK_LEN between calls.
    filled: usize,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha1")
            .field("bit_count", &self.bit_count)
            .field("filled", &self.filled)
            .finish()
    }
}

impl Sha1 {
    /// Fresh state with the standard initial words and zero counters.
    #[inline]
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            bit_count: 0,
            buffer: [0u8; BLOCK_LEN],
            filled: 0,
        }
    }

    /// Absorb `data`. Any length, any number of calls.
    pub fn update(&mut self, mut data: &[u8]) {
        self.bit_count = self
            .bit_count
            .wrapping_add((data.len() as u64).wrapping_mul(8));

        // Top up a partially filled block first.
        if self.filled > 0 {
            let take = (BLOCK_LEN - self.filled).min(data.len());
            self.buffer[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];

            if self.filled < BLOCK_LEN {
                return;
            }
            compress(&mut self.state, &self.buffer);
            self.filled = 0;
        }

        // Whole blocks straight from the input, no copy.
        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.filled = rest.len();
    }

    /// Number of message bytes absorbed so far.
    #[inline]
    pub fn len(&self) -> u64 {
        self.bit_count / 8
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Pad, append the big-endian bit length and return the digest.
    pub fn finalize(mut self) -> Digest {
        let bit_len = self.bit_count;

        self.update(&[0x80]);
        let zeros = (BLOCK_LEN + LENGTH_OFFSET - self.filled) % BLOCK_LEN;
        self.update(&ZERO_PAD[..zeros]);
        self.update(&bit_len.to_be_bytes());
        debug_assert_eq!(self.filled, 0, "padding must end on a block boundary");

        let mut out = [0u8; DIGEST_LEN];
        BigEndian::write_u32_into(&self.state, &mut out);
        Digest::from(out)
    }
}

/// One-shot digest of `data`.
#[inline]
pub fn sha1(data: &[u8]) -> Digest {
    let mut h = Sha1::new();
    h.update(data);
    h.finalize()
}

/// Compress one 64-byte block into `state`.
fn compress(state: &mut [u32; 5], block: &[u8]) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut w = [0u32; 16];
    BigEndian::read_u32_into(block, &mut w);

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for i in 0..80 {
        if i >= 16 {
            let s = i & 15;
            w[s] = (w[(i + 13) & 15] ^ w[(i + 8) & 15] ^ w[(i + 2) & 15] ^ w[s]).rotate_left(1);
        }

        let f = match i / 20 {
            0 => ((c ^ d) & b) ^ d,        // choose
            2 => ((b | c) & d) | (b & c),  // majority
            _ => b ^ c ^ d,                // parity
        };

        let t = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(ROUND_CONSTANTS[i / 20])
            .wrapping_add(w[i & 15]);

        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = t;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_level_stays_below_block_len() {
        let mut h = Sha1::new();
        for n in [0usize, 1, 63, 64, 65, 127, 128, 1000] {
            h.update(&vec![0x5a; n]);
            assert!(h.filled < BLOCK_LEN);
        }
        assert_eq!(h.len(), 1 + 63 + 64 + 65 + 127 + 128 + 1000);
    }

    #[test]
    fn exact_block_leaves_nothing_pending() {
        let mut h = Sha1::new();
        h.update(&[0u8; BLOCK_LEN * 3]);
        assert_eq!(h.filled, 0);
        assert_ne!(h.state, INITIAL_STATE);
    }

    #[test]
    fn fresh_state_is_empty() {
        let h = Sha1::default();
        assert!(h.is_empty());
        assert_eq!(h.state, INITIAL_STATE);
    }
}
