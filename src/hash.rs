//! Hash functions over byte-string keys.
//!
//! All functions are pure and unseeded: the same bytes always hash to the
//! same value, which rehashing relies on to place an entry reproducibly.
//! Bytes are mixed in as unsigned values (0..=255), so keys with bytes above
//! 0x7f hash differently than under a signed-`char` C implementation.

/// FNV 32-bit offset basis (2^24 + 2^8 + 0x93).
pub const OFFSET_BASIS32: u32 = 2_166_136_261;
/// FNV 32-bit prime.
pub const FNV_PRIME32: u32 = 16_777_619;

/// Selects the hash function a table places its entries with.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HashMode {
    /// FNV-1a: xor the byte in, then multiply.
    #[default]
    Fnv1a,
    /// FNV-1: multiply, then xor the byte in.
    Fnv1,
    /// Deliberately weak `h * 3 + b` hash for exercising long chains.
    Debug,
}

impl HashMode {
    pub const ALL: [HashMode; 3] = [HashMode::Fnv1a, HashMode::Fnv1, HashMode::Debug];

    #[inline]
    pub fn hash(self, bytes: &[u8]) -> u32 {
        match self {
            HashMode::Fnv1a => fnv1a(bytes),
            HashMode::Fnv1 => fnv1(bytes),
            HashMode::Debug => debug_hash(bytes),
        }
    }
}

#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(OFFSET_BASIS32, |h, &b| {
        (h ^ u32::from(b)).wrapping_mul(FNV_PRIME32)
    })
}

#[inline]
pub fn fnv1(bytes: &[u8]) -> u32 {
    bytes.iter().fold(OFFSET_BASIS32, |h, &b| {
        h.wrapping_mul(FNV_PRIME32) ^ u32::from(b)
    })
}

#[inline]
pub fn debug_hash(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(3).wrapping_add(u32::from(b)))
}

/// Bucket for `hash` in a table of `capacity` buckets. `capacity` is never zero.
#[inline]
pub(crate) fn bucket_index(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash as usize) % capacity
}
