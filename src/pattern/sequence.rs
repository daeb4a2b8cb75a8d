//! Sequence expansion and verification.
//!
//! A diagnostic payload is a seed sequence repeated out to a target length
//! and truncated, so every length-`seed.len()` chunk equals the seed and
//! the final partial chunk equals the seed's prefix. The verifier walks
//! the same chunking, which makes it tolerant of truncation by design of
//! the wire format rather than by special-casing.

/// Expand a seed sequence into a payload of exactly `length` bytes.
///
/// The seed is doubled geometrically until it covers `length`, then
/// truncated, so `result[i] == seed[i % seed.len()]` for every index.
/// A zero `length` yields an empty payload.
///
/// # Example
///
/// ```
/// use linkdiag::pattern::expand_sequence;
///
/// assert_eq!(expand_sequence(b"ab", 5), b"ababa");
/// assert_eq!(expand_sequence(b"ab", 0), b"");
/// ```
pub fn expand_sequence(seed: &[u8], length: usize) -> Vec<u8> {
    debug_assert!(!seed.is_empty(), "seed sequence must be non-empty");
    if length == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(length.max(seed.len()));
    out.extend_from_slice(seed);
    while out.len() < length {
        out.extend_from_within(..);
    }
    out.truncate(length);
    out
}

/// Check that `payload` is a (possibly truncated) repetition of `seed`.
///
/// Walks the payload in chunks of `min(remaining, seed.len())`; each chunk
/// must equal the corresponding leading prefix of the seed. Returns `false`
/// at the first unequal chunk. An empty payload trivially matches.
pub fn check_sequence(seed: &[u8], payload: &[u8]) -> bool {
    debug_assert!(!seed.is_empty(), "seed sequence must be non-empty");
    let mut rest = payload;
    while !rest.is_empty() {
        let m = rest.len().min(seed.len());
        if rest[..m] != seed[..m] {
            return false;
        }
        rest = &rest[m..];
    }
    true
}
