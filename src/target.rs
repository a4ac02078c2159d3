use crate::buffer::read_prefix;

/// Acceptance threshold derived from a challenge's easiness byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    easiness: u8,
    value: u32,
}

impl Threshold {
    /// Derive the threshold from the server-supplied easiness.
    ///
    /// `base` is an odd number in 1..=127 taken from the low six bits, and
    /// the top two bits pick a shift of 3, 10, 17 or 24.
    pub fn from_easiness(easiness: u8) -> Self {
        let base = (((easiness & 63) as u32) << 1) + 1;
        let shifts = ((easiness >> 6) as u32) * 7 + 3;

        Self {
            easiness,
            value: base << shifts,
        }
    }

    /// Check a big-endian digest prefix against the threshold
    #[inline(always)]
    pub fn accepts(&self, hash_prefix: u32) -> bool {
        hash_prefix <= self.value
    }

    /// Check a full SHA-256 digest: its first four bytes are read big-endian
    #[inline(always)]
    pub fn matches(&self, digest: &[u8; 32]) -> bool {
        self.accepts(read_prefix(digest))
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn easiness(&self) -> u8 {
        self.easiness
    }

    /// Chance that a single trial is accepted: `(value + 1) / 2^32`
    pub fn hit_probability(&self) -> f64 {
        (self.value as f64 + 1.0) / (1u64 << 32) as f64
    }

    /// Estimate attempts needed (average case)
    pub fn estimated_attempts(&self) -> u64 {
        (1u64 << 32) / (self.value as u64 + 1)
    }
}
