//! Protocol module - wire format and the stream sink.
//!
//! This module implements the diagnostic wire protocol:
//! - Text header encoding and field parsing
//! - The resynchronizing sink that decodes an unreliable byte stream

mod sink;
mod wire_format;

pub use sink::Sink;
pub use wire_format::{
    encode_frame, parse_header, sha256_hex, FrameHeader, FRAME_MARKER, LENGTH_FIELD,
    PATTERN_FIELD, SHA256_FIELD,
};
