//! The stream sink - a resynchronizing receive-side decoder.
//!
//! Uses `bytes::BytesMut` for residual buffer management. The sink scans
//! an unbounded byte stream for frame boundaries, tolerating arbitrary
//! chunking (down to one byte per push), streams that begin mid-frame,
//! and noise between frames. It never refuses bytes and never blocks:
//! every failure mode is classified into one of four monotonic error
//! counters instead of being reported to the caller.
//!
//! # Example
//!
//! ```
//! use linkdiag::pattern::PatternCatalog;
//! use linkdiag::protocol::{encode_frame, Sink};
//!
//! let mut sink = Sink::new(PatternCatalog::builtin(), true);
//! let frame = encode_frame("FF", &[0xff; 8]);
//! sink.push(&frame);
//! assert_eq!(sink.good_frames, 1);
//! ```

use std::io;
use std::sync::Arc;

use bytes::{Buf, BytesMut};

use super::wire_format::{parse_header, sha256_hex, FrameHeader, FRAME_MARKER};
use crate::pattern::PatternCatalog;

/// Locate the first blank-line delimiter (two consecutive newlines).
fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

/// Receive-side decoder state for one logical channel.
///
/// Holds the residual buffer, the sync flag, and five monotonically
/// non-decreasing counters. The counter fields are public and may be read
/// at any time; exactly one writer per instance is assumed (see the crate
/// docs for the concurrency contract).
#[derive(Debug)]
pub struct Sink {
    /// Count of good frames received.
    pub good_frames: u64,
    /// Count of framing errors (one per loss-of-sync edge).
    pub framing_err: u64,
    /// Count of protocol errors (unparseable headers).
    pub protocol_err: u64,
    /// Count of checksum errors (digest disagreed with the header).
    pub checksum_err: u64,
    /// Count of pattern errors (content mismatch or unknown name).
    pub pattern_err: u64,
    /// Do we believe the next residual bytes start a fresh frame?
    sync: bool,
    /// Bytes received but not yet resolved into a frame or discarded.
    residual: BytesMut,
    catalog: Arc<PatternCatalog>,
}

impl Sink {
    /// Create a new sink decoding against `catalog`.
    ///
    /// If the sender and receiver start independently the stream will
    /// usually begin mid-frame; pass `pre_sync = false` so the leading
    /// partial frame is discarded silently instead of being counted as a
    /// framing error. For loopback tests pass `pre_sync = true` so any
    /// spurious bytes are counted.
    pub fn new(catalog: Arc<PatternCatalog>, pre_sync: bool) -> Self {
        Self {
            good_frames: 0,
            framing_err: 0,
            protocol_err: 0,
            checksum_err: 0,
            pattern_err: 0,
            sync: pre_sync,
            residual: BytesMut::new(),
            catalog,
        }
    }

    /// Push received bytes into the sink, draining every complete frame
    /// currently buffered.
    ///
    /// Always accepts the whole chunk and returns `chunk.len()`: a
    /// receiver on a live, possibly noisy channel cannot refuse bytes.
    /// May resolve many frames in one call, or none if the chunk is a
    /// single stray byte. Never blocks.
    pub fn push(&mut self, chunk: &[u8]) -> usize {
        self.residual.extend_from_slice(chunk);

        loop {
            // Scan for the frame marker, dropping noise one byte at a
            // time. The framing counter moves once per loss-of-sync edge,
            // not once per discarded byte.
            while self.residual.len() >= FRAME_MARKER.len()
                && !self.residual.starts_with(FRAME_MARKER)
            {
                if self.sync {
                    self.sync = false;
                    self.framing_err += 1;
                }
                self.residual.advance(1);
            }
            // Too short to carry anything beyond the marker itself.
            if self.residual.len() <= FRAME_MARKER.len() {
                break;
            }

            // Find the end-of-header blank line, skipping the marker's
            // own leading newlines. A header may span pushes.
            let Some(pos) = find_blank_line(&self.residual[2..]) else {
                break;
            };
            let header_end = 2 + pos + 2;

            let header = match parse_header(&self.residual[2..header_end]) {
                Ok(header) => header,
                Err(err) => {
                    tracing::debug!(error = %err, "dropping unparseable header");
                    self.sync = false;
                    self.protocol_err += 1;
                    // Discard through the blank-line delimiter and retry
                    // against the rest of the buffer immediately.
                    self.residual.advance(header_end);
                    continue;
                }
            };

            // Complete header; is the payload fully buffered? If not,
            // keep header and all for the next push.
            if self.residual.len() - header_end < header.length {
                break;
            }

            self.residual.advance(header_end);
            let payload = self.residual.split_to(header.length);
            self.sync = true;

            self.resolve(&header, &payload);
        }

        chunk.len()
    }

    /// Classify one fully received frame.
    fn resolve(&mut self, header: &FrameHeader, payload: &[u8]) {
        let computed = sha256_hex(payload);
        let checksum_good = computed.eq_ignore_ascii_case(&header.sha256);
        let pattern_good = self.check_payload(&header.pattern, payload);

        if checksum_good && pattern_good {
            self.good_frames += 1;
            return;
        }
        // Checksum and pattern errors are not mutually exclusive; both
        // may fire for the same frame.
        if !checksum_good {
            tracing::warn!(
                pattern = %header.pattern,
                expected = %header.sha256,
                computed = %computed,
                "checksum mismatch"
            );
            self.checksum_err += 1;
        }
        if !pattern_good {
            self.pattern_err += 1;
        }
    }

    fn check_payload(&self, name: &str, payload: &[u8]) -> bool {
        match self.catalog.lookup(name) {
            Some(pattern) => {
                let ok = pattern.verify(payload);
                if !ok {
                    tracing::warn!(pattern = %name, "payload does not match pattern sequence");
                }
                ok
            }
            None => {
                tracing::warn!(pattern = %name, "unknown pattern");
                false
            }
        }
    }

    /// Whether the sink currently believes it is aligned on a frame
    /// boundary.
    pub fn is_synced(&self) -> bool {
        self.sync
    }

    /// Bytes received but not yet resolved into a frame or discarded.
    pub fn residual(&self) -> &[u8] {
        &self.residual
    }
}

impl io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.push(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
