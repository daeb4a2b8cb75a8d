//! # linkdiag
//!
//! Link diagnostic protocol: validates the integrity of a point-to-point
//! data link by sending known bit patterns with a declared length and a
//! SHA-256 checksum, and statistically confirming on the receive side
//! that the bytes arriving match what was sent.
//!
//! ## Architecture
//!
//! - **Patterns** ([`pattern`]): an immutable catalog of named seed
//!   sequences, each expandable to any payload length and verifiable
//!   under truncation.
//! - **Protocol** ([`protocol`]): the text wire format and the
//!   resynchronizing [`Sink`] - a stream decoder that tolerates
//!   arbitrary chunk sizes, streams beginning mid-frame, and noise
//!   between frames, classifying every failure into monotonic counters.
//! - **Traffic** ([`traffic`]): helpers that build (random) diagnostic
//!   messages for test and stress traffic.
//!
//! ## Concurrency
//!
//! A [`Sink`] assumes exactly one writer (one task per receive channel
//! feeding bytes sequentially). Counters are plain fields; embedders that
//! need concurrent observation must add their own synchronization.
//!
//! ## Example
//!
//! ```
//! use linkdiag::pattern::PatternCatalog;
//! use linkdiag::protocol::{encode_frame, Sink};
//!
//! let catalog = PatternCatalog::builtin();
//! let wire = encode_frame("AA55", &catalog.lookup("AA55").unwrap().generate(64));
//!
//! let mut sink = Sink::new(catalog, true);
//! sink.push(&wire);
//! assert_eq!(sink.good_frames, 1);
//! ```

pub mod error;
pub mod pattern;
pub mod protocol;
pub mod traffic;

pub use error::LinkdiagError;
pub use pattern::{Pattern, PatternCatalog};
pub use protocol::{encode_frame, Sink};
