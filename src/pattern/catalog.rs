//! Pattern catalog - the immutable name -> pattern registry.
//!
//! A catalog is built once (typically at process start), validated at
//! construction time, and then shared read-only across every sink and
//! traffic generator. Seed problems fail loudly here so the decode path
//! never has to deal with them.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;

use super::sequence::{check_sequence, expand_sequence};
use crate::error::{LinkdiagError, Result};
use crate::protocol::encode_frame;

/// Name of the builtin human-readable pattern.
pub const ALPHA: &str = "Alpha";

/// Seed sequence of the builtin [`ALPHA`] pattern (43 bytes).
pub const ALPHA_SEED: &[u8] = b"The quick brown fox jumps over the lazy dog";

/// A named, registered seed sequence with its generate/verify operations.
///
/// Immutable once registered. Payloads are the seed repeated out to a
/// target length and truncated; verification walks the same chunking.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    seed: Bytes,
}

impl Pattern {
    /// Get the pattern name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the seed sequence.
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Generate a payload of exactly `length` bytes from the seed.
    pub fn generate(&self, length: usize) -> Vec<u8> {
        expand_sequence(&self.seed, length)
    }

    /// Check a received payload against the seed sequence.
    ///
    /// Tolerant of truncation: a payload shorter than one full repetition
    /// still matches as long as it is a prefix of the expansion.
    pub fn verify(&self, payload: &[u8]) -> bool {
        check_sequence(&self.seed, payload)
    }

    /// Build a complete wire message carrying `length` bytes of this
    /// pattern: generated payload, framed and checksummed.
    pub fn message(&self, length: usize) -> Vec<u8> {
        encode_frame(&self.name, &self.generate(length))
    }
}

/// Builder for [`PatternCatalog`].
///
/// Registration validates seeds up front; an empty seed or a duplicate
/// name is a construction error, never a runtime decode condition.
#[derive(Debug, Default)]
pub struct PatternCatalogBuilder {
    patterns: HashMap<String, Pattern>,
}

impl PatternCatalogBuilder {
    /// Register a pattern under `name` with the given seed sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LinkdiagError::EmptySeed`] for a zero-length seed and
    /// [`LinkdiagError::DuplicatePattern`] if `name` is already taken.
    pub fn register(mut self, name: impl Into<String>, seed: impl Into<Bytes>) -> Result<Self> {
        let name = name.into();
        let seed = seed.into();
        if seed.is_empty() {
            return Err(LinkdiagError::EmptySeed(name));
        }
        if self.patterns.contains_key(&name) {
            return Err(LinkdiagError::DuplicatePattern(name));
        }
        self.patterns.insert(
            name.clone(),
            Pattern { name, seed },
        );
        Ok(self)
    }

    /// Finalize the catalog.
    pub fn build(self) -> PatternCatalog {
        PatternCatalog {
            patterns: self.patterns,
        }
    }
}

/// The immutable name -> [`Pattern`] registry.
#[derive(Debug)]
pub struct PatternCatalog {
    patterns: HashMap<String, Pattern>,
}

impl PatternCatalog {
    /// Start building a custom catalog.
    pub fn builder() -> PatternCatalogBuilder {
        PatternCatalogBuilder::default()
    }

    /// The builtin catalog of standard diagnostic patterns.
    ///
    /// Built once per process and shared; contains the single-byte and
    /// alternating-byte patterns plus [`ALPHA`].
    pub fn builtin() -> Arc<PatternCatalog> {
        static BUILTIN: OnceLock<Arc<PatternCatalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let catalog =
                    Self::build_builtin().expect("builtin catalog seeds are valid");
                Arc::new(catalog)
            })
            .clone()
    }

    fn build_builtin() -> Result<PatternCatalog> {
        const SEEDS: &[(&str, &[u8])] = &[
            ("00", &[0x00]),
            ("FF", &[0xff]),
            ("AA", &[0xaa]),
            ("55", &[0x55]),
            ("AA55", &[0xaa, 0x55]),
            ("55AA", &[0x55, 0xaa]),
            ("00FF", &[0x00, 0xff]),
            ("FF00", &[0xff, 0x00]),
            (ALPHA, ALPHA_SEED),
        ];
        let mut builder = PatternCatalog::builder();
        for (name, seed) in SEEDS {
            builder = builder.register(*name, *seed)?;
        }
        Ok(builder.build())
    }

    /// Look up a pattern by name.
    ///
    /// Absence during decode is a pattern-error condition for the caller,
    /// not a failure here.
    pub fn lookup(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(name)
    }

    /// Iterate over the registered patterns (arbitrary order).
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check whether the catalog has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
