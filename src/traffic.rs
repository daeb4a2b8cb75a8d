//! Test and stress traffic generation.
//!
//! Helpers for the sending side of a diagnostic session. These are
//! tooling paths, not part of the decode core's contract: the random
//! builder asserts on misuse instead of threading errors through
//! production decoding.

use rand::Rng;

use crate::error::{LinkdiagError, Result};
use crate::pattern::PatternCatalog;

/// Exclusive upper bound on randomly chosen payload lengths.
const MAX_RANDOM_LEN: usize = 0xffff;

/// Build a wire message for the named pattern at the given payload length.
///
/// # Errors
///
/// Returns [`LinkdiagError::UnknownPattern`] if `name` is not registered.
pub fn message(catalog: &PatternCatalog, name: &str, length: usize) -> Result<Vec<u8>> {
    let pattern = catalog
        .lookup(name)
        .ok_or_else(|| LinkdiagError::UnknownPattern(name.to_owned()))?;
    Ok(pattern.message(length))
}

/// Build a wire message for a uniformly random catalog entry with a
/// uniformly random payload length in `[0, 65535)`.
///
/// # Panics
///
/// Panics if the catalog is empty.
pub fn random_message(catalog: &PatternCatalog) -> Vec<u8> {
    assert!(
        !catalog.is_empty(),
        "cannot generate traffic from an empty catalog"
    );
    let mut rng = rand::thread_rng();
    let index = rng.gen_range(0..catalog.len());
    let pattern = catalog
        .patterns()
        .nth(index)
        .expect("index is within catalog bounds");
    pattern.message(rng.gen_range(0..MAX_RANDOM_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Sink;

    #[test]
    fn test_message_unknown_pattern() {
        let catalog = PatternCatalog::builtin();
        let err = message(&catalog, "NoSuchPattern", 10).unwrap_err();
        assert!(matches!(err, LinkdiagError::UnknownPattern(_)));
    }

    #[test]
    fn test_message_decodes_cleanly() {
        let catalog = PatternCatalog::builtin();
        let msg = message(&catalog, "55AA", 100).unwrap();

        let mut sink = Sink::new(catalog, true);
        assert_eq!(sink.push(&msg), msg.len());
        assert_eq!(sink.good_frames, 1);
        assert!(sink.residual().is_empty());
    }

    #[test]
    fn test_random_message_decodes_cleanly() {
        let catalog = PatternCatalog::builtin();
        let mut sink = Sink::new(catalog.clone(), true);
        for i in 1..=100u64 {
            let msg = random_message(&catalog);
            sink.push(&msg);
            assert_eq!(sink.good_frames, i);
            assert!(sink.residual().is_empty());
        }
        assert_eq!(sink.framing_err, 0);
        assert_eq!(sink.protocol_err, 0);
        assert_eq!(sink.checksum_err, 0);
        assert_eq!(sink.pattern_err, 0);
    }

    #[test]
    #[should_panic(expected = "empty catalog")]
    fn test_random_message_empty_catalog_panics() {
        let catalog = PatternCatalog::builder().build();
        random_message(&catalog);
    }
}
