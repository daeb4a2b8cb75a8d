//! Wire format encoding and header parsing.
//!
//! A frame is a text header between two blank-line delimiters, followed by
//! raw payload bytes:
//!
//! ```text
//! \n\n
//! Pattern: <name>\n
//! Length: <decimal>\n
//! Sha256: <64 lowercase hex>\n
//! \n
//! <payload bytes>
//! ```
//!
//! Field order inside the header is not fixed; each field is matched as a
//! whole line anywhere in the header segment. The payload length is given
//! exactly by the `Length` field, and the digest is SHA-256 of the payload
//! alone.

use std::sync::LazyLock;

use regex::bytes::Regex;
use sha2::{Digest, Sha256};

use crate::error::{LinkdiagError, Result};

/// Header line label for the pattern name.
pub const PATTERN_FIELD: &str = "Pattern: ";

/// Header line label for the payload length.
pub const LENGTH_FIELD: &str = "Length: ";

/// Header line label for the payload digest.
pub const SHA256_FIELD: &str = "Sha256: ";

/// The byte sequence that starts every frame: the blank-line delimiter
/// immediately followed by the pattern label. The sink scans for this to
/// find (and re-find) frame boundaries in a noisy stream.
pub const FRAME_MARKER: &[u8] = b"\n\nPattern: ";

// Field matchers are compiled once and shared read-only across all sinks.
static PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^{PATTERN_FIELD}([\p{{L}}\d_]+)$"))
        .expect("pattern field matcher compiles")
});
static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^{LENGTH_FIELD}(\d+)$")).expect("length field matcher compiles")
});
static SHA256_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^{SHA256_FIELD}([0-9a-fA-F]+)$"))
        .expect("sha256 field matcher compiles")
});

/// Parsed frame header. Transient: exists only between header parse and
/// frame resolution, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Declared pattern name (word characters, Unicode-aware).
    pub pattern: String,
    /// Declared payload length in bytes.
    pub length: usize,
    /// Declared payload digest as hex (case preserved as received).
    pub sha256: String,
}

fn capture<'h>(re: &Regex, header: &'h [u8]) -> Option<&'h [u8]> {
    re.captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_bytes())
}

/// Parse the three header fields out of a header segment.
///
/// `header` is everything between the frame marker's leading `\n\n` and
/// the end of the terminating blank-line delimiter. Fields may appear in
/// any order; each must be a whole line. Anything missing or malformed
/// (including a length that does not fit `usize`) is a protocol error.
///
/// # Errors
///
/// Returns [`LinkdiagError::Protocol`] naming the offending field. The
/// sink maps this onto its protocol-error counter; it is never surfaced
/// to the sink's caller.
pub fn parse_header(header: &[u8]) -> Result<FrameHeader> {
    let pattern = capture(&PATTERN_RE, header)
        .ok_or_else(|| LinkdiagError::Protocol("missing or malformed Pattern field".into()))?;
    let length = capture(&LENGTH_RE, header)
        .ok_or_else(|| LinkdiagError::Protocol("missing or malformed Length field".into()))?;
    let sha256 = capture(&SHA256_RE, header)
        .ok_or_else(|| LinkdiagError::Protocol("missing or malformed Sha256 field".into()))?;

    // The matchers only accept UTF-8-clean content, but decode defensively
    // rather than unwrap on the hot path.
    let pattern = std::str::from_utf8(pattern)
        .map_err(|_| LinkdiagError::Protocol("Pattern field is not valid UTF-8".into()))?
        .to_owned();
    let sha256 = std::str::from_utf8(sha256)
        .map_err(|_| LinkdiagError::Protocol("Sha256 field is not valid UTF-8".into()))?
        .to_owned();
    let length = std::str::from_utf8(length)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| LinkdiagError::Protocol("Length field out of range".into()))?;

    Ok(FrameHeader {
        pattern,
        length,
        sha256,
    })
}

/// Render a payload digest as 64 lowercase hex characters.
pub fn sha256_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Serialize a named pattern instance into wire bytes.
///
/// Produces the byte-exact header layout above followed by the payload.
/// This layout is the wire contract shared with the sink; any deviation
/// breaks interoperability.
///
/// # Example
///
/// ```
/// use linkdiag::protocol::encode_frame;
///
/// let frame = encode_frame("FF", &[0xff, 0xff]);
/// assert!(frame.starts_with(b"\n\nPattern: FF\nLength: 2\nSha256: "));
/// ```
pub fn encode_frame(name: &str, payload: &[u8]) -> Vec<u8> {
    let digest = sha256_hex(payload);
    let mut frame = format!(
        "\n\n{PATTERN_FIELD}{name}\n{LENGTH_FIELD}{length}\n{SHA256_FIELD}{digest}\n\n",
        length = payload.len()
    )
    .into_bytes();
    frame.extend_from_slice(payload);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{ALPHA, ALPHA_SEED};

    const ALPHA_WIRE: &[u8] = b"\n\nPattern: Alpha\nLength: 43\nSha256: \
d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592\n\n\
The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_encode_alpha_exact_bytes() {
        // Pinned wire bytes with a precalculated digest.
        let frame = encode_frame(ALPHA, ALPHA_SEED);
        assert_eq!(frame, ALPHA_WIRE);
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = encode_frame("00", b"");
        let expected = format!(
            "\n\nPattern: 00\nLength: 0\nSha256: {}\n\n",
            sha256_hex(b"")
        );
        assert_eq!(frame, expected.as_bytes());
    }

    #[test]
    fn test_marker_matches_encoded_prefix() {
        let frame = encode_frame("AA55", &[0xaa, 0x55]);
        assert!(frame.starts_with(FRAME_MARKER));
    }

    #[test]
    fn test_parse_header_roundtrip() {
        let frame = encode_frame(ALPHA, ALPHA_SEED);
        // Header segment: after the leading \n\n, through the blank line.
        let header = &frame[2..frame.len() - ALPHA_SEED.len()];
        let parsed = parse_header(header).unwrap();
        assert_eq!(parsed.pattern, ALPHA);
        assert_eq!(parsed.length, 43);
        assert_eq!(parsed.sha256, sha256_hex(ALPHA_SEED));
    }

    #[test]
    fn test_parse_header_fields_any_order() {
        let header = b"Sha256: abc123\nLength: 7\nPattern: Alpha\n\n";
        let parsed = parse_header(header).unwrap();
        assert_eq!(parsed.pattern, "Alpha");
        assert_eq!(parsed.length, 7);
        assert_eq!(parsed.sha256, "abc123");
    }

    #[test]
    fn test_parse_header_uppercase_hex_preserved() {
        let header = b"Pattern: FF\nLength: 2\nSha256: ABCDEF012345\n\n";
        let parsed = parse_header(header).unwrap();
        assert_eq!(parsed.sha256, "ABCDEF012345");
    }

    #[test]
    fn test_parse_header_unicode_pattern_name() {
        let header = "Pattern: Mönster_1\nLength: 0\nSha256: 00\n\n".as_bytes();
        let parsed = parse_header(header).unwrap();
        assert_eq!(parsed.pattern, "Mönster_1");
    }

    #[test]
    fn test_parse_header_missing_field() {
        let header = b"Pattern: Alpha\nLength: 43\n\n";
        let err = parse_header(header).unwrap_err();
        assert!(err.to_string().contains("Sha256"));
    }

    #[test]
    fn test_parse_header_non_numeric_length() {
        let header = b"Pattern: Alpha\nLength: forty\nSha256: d7a8\n\n";
        assert!(parse_header(header).is_err());
    }

    #[test]
    fn test_parse_header_overflowing_length() {
        let header = b"Pattern: Alpha\nLength: 99999999999999999999999999\nSha256: d7a8\n\n";
        let err = parse_header(header).unwrap_err();
        assert!(err.to_string().contains("Length"));
    }

    #[test]
    fn test_parse_header_rejects_mid_line_label() {
        // Labels must be anchored at line start.
        let header = b"xPattern: Alpha\nLength: 1\nSha256: d7a8\n\n";
        assert!(parse_header(header).is_err());
    }

    #[test]
    fn test_parse_header_garbage_between_fields() {
        // Foreign lines are ignored as long as the three fields are present.
        let header = b"Pattern: Alpha\nX-Extra: junk\nLength: 5\nSha256: d7a8\n\n";
        let parsed = parse_header(header).unwrap();
        assert_eq!(parsed.length, 5);
    }
}
