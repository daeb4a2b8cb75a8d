//! Pattern module - named seed sequences and their operations.
//!
//! - Catalog: the immutable name -> pattern registry
//! - Sequence ops: expansion of a seed to a target length, and
//!   truncation-tolerant verification of received payloads

mod catalog;
mod sequence;

pub use catalog::{Pattern, PatternCatalog, PatternCatalogBuilder, ALPHA, ALPHA_SEED};
pub use sequence::{check_sequence, expand_sequence};
