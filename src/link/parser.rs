//! Byte-at-a-time frame parser
//!
//! Input may arrive in arbitrary chunks; the parser keeps a partial frame
//! between calls, so the events produced depend only on the concatenated
//! byte sequence. Bytes outside a frame are dropped until the next start
//! marker. A frame with a bad checksum is dropped whole and hunting restarts
//! at the byte after it, so a start marker inside a corrupted frame is never
//! treated as the beginning of a new one.

use std::sync::Arc;

use tracing::{debug, trace};

use super::event::{ChecksumFailure, DecodedMessage, Event, EventSink};
use crate::protocol::{
    Error, FRAME_OVERHEAD, Frame, FrameOutcome, HEADER_SIZE, Metrics,
    ProtocolVersion, SchemaRegistry, checksum, decode_payload, frame_checksum,
};

/// Receive buffer size; larger than any frame
pub const RECEIVE_BUFFER_SIZE: usize = 512;

/// Where the parser is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Discarding bytes until a start marker
    AwaitingStart,
    /// Start marker seen; next byte is the payload length
    ReadingLength,
    /// Collecting the rest of the frame
    ReadingBody,
}

/// Accept frames from one system/component, or from anyone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceFilter {
    /// System id to accept; `0` together with a `0` component accepts all
    pub system_id: u8,
    /// Component id to accept
    pub component_id: u8,
}

impl SourceFilter {
    /// Filter that accepts every frame
    pub const ANY: Self = Self {
        system_id: 0,
        component_id: 0,
    };

    /// Check if a frame from this source passes
    #[must_use]
    pub const fn accepts(&self, system_id: u8, component_id: u8) -> bool {
        (self.system_id == 0 && self.component_id == 0)
            || (self.system_id == system_id && self.component_id == component_id)
    }
}

#[derive(Debug)]
struct ReceiveState {
    buffer: [u8; RECEIVE_BUFFER_SIZE],
    index: usize,
    // declared payload length + overhead, valid once the length byte is in
    frame_len: usize,
    last_sequence: u8,
}

impl ReceiveState {
    const fn new() -> Self {
        Self {
            buffer: [0; RECEIVE_BUFFER_SIZE],
            index: 0,
            frame_len: 0,
            last_sequence: 0,
        }
    }

    fn reset(&mut self) {
        self.index = 0;
        self.frame_len = 0;
    }
}

/// Stream parser for one link
#[derive(Debug)]
pub struct StreamParser {
    registry: Arc<SchemaRegistry>,
    version: ProtocolVersion,
    filter: SourceFilter,
    metrics: Arc<Metrics>,
    state: ReceiveState,
}

impl StreamParser {
    /// Create a parser with fresh counters
    #[must_use]
    pub fn new(
        registry: Arc<SchemaRegistry>,
        version: ProtocolVersion,
        filter: SourceFilter,
    ) -> Self {
        Self::with_metrics(registry, version, filter, Arc::new(Metrics::new()))
    }

    /// Create a parser recording into shared counters
    #[must_use]
    pub fn with_metrics(
        registry: Arc<SchemaRegistry>,
        version: ProtocolVersion,
        filter: SourceFilter,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            registry,
            version,
            filter,
            metrics,
            state: ReceiveState::new(),
        }
    }

    /// Feed a chunk of bytes, emitting events for every frame it completes
    pub fn parse(&mut self, bytes: &[u8], sink: &mut impl EventSink) {
        let mut discarded = 0;
        for &byte in bytes {
            if !self.step(byte, sink) {
                discarded += 1;
            }
        }
        self.metrics.record_bytes(bytes.len(), discarded);
    }

    /// Feed a single byte
    pub fn parse_byte(&mut self, byte: u8, sink: &mut impl EventSink) {
        let kept = self.step(byte, sink);
        self.metrics.record_bytes(1, usize::from(!kept));
    }

    /// Current position within a frame
    #[must_use]
    pub const fn state(&self) -> ParseState {
        match self.state.index {
            0 => ParseState::AwaitingStart,
            1 => ParseState::ReadingLength,
            _ => ParseState::ReadingBody,
        }
    }

    /// Sequence number of the last frame that passed its checksum
    #[must_use]
    pub const fn last_sequence(&self) -> u8 {
        self.state.last_sequence
    }

    /// Drop any partial frame. Sequence tracking is kept.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Framing version
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Source filter applied to validated frames
    #[must_use]
    pub const fn filter(&self) -> SourceFilter {
        self.filter
    }

    /// Returns false when the byte was discarded outside a frame
    fn step(&mut self, byte: u8, sink: &mut impl EventSink) -> bool {
        match self.state() {
            ParseState::AwaitingStart => {
                if byte != self.version.start_marker() {
                    trace!(byte, "discarding byte outside frame");
                    return false;
                }
                self.state.buffer[0] = byte;
                self.state.index = 1;
            }
            ParseState::ReadingLength => {
                self.state.buffer[1] = byte;
                self.state.frame_len = usize::from(byte) + FRAME_OVERHEAD;
                self.state.index = 2;
            }
            ParseState::ReadingBody => {
                self.state.buffer[self.state.index] = byte;
                self.state.index += 1;
                if self.state.index == self.state.frame_len {
                    self.complete(sink);
                    self.state.reset();
                }
            }
        }
        true
    }

    fn complete(&mut self, sink: &mut impl EventSink) {
        let frame_len = self.state.frame_len;
        let payload_len = frame_len - FRAME_OVERHEAD;
        let bytes = &self.state.buffer[..frame_len];
        let message_id = bytes[5];

        let definition = self.registry.message(message_id);
        let table_seed = checksum::table_seed(message_id);
        let seed = match definition {
            Some(definition) => definition.seed(),
            None => table_seed.unwrap_or(0),
        };

        let checksum_offset = HEADER_SIZE + payload_len;
        let computed = frame_checksum(self.version, &bytes[1..checksum_offset], seed);
        let received = u16::from_le_bytes([bytes[checksum_offset], bytes[checksum_offset + 1]]);

        if computed != received {
            debug!(message_id, computed, received, "checksum mismatch, frame dropped");
            self.metrics.record_frame(FrameOutcome::ChecksumFailed);
            sink.emit(Event::ChecksumFail(ChecksumFailure {
                message_id,
                derived_seed: definition.map(|definition| definition.derived_seed()),
                table_seed,
                computed,
                received,
            }));
            return;
        }

        let sequence = bytes[2];
        let last = self.state.last_sequence;
        if last > 0 && sequence.wrapping_sub(last) != 1 {
            let gap = sequence.wrapping_sub(last).wrapping_sub(1);
            debug!(last, sequence, gap, "sequence gap");
            self.metrics.record_gap(gap);
            sink.emit(Event::SequenceGap { gap });
        }
        self.state.last_sequence = sequence;

        let frame = match Frame::from_bytes(self.version, bytes) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(error = %err, "validated frame rejected");
                return;
            }
        };

        if !self.filter.accepts(frame.system_id(), frame.component_id()) {
            trace!(
                system_id = frame.system_id(),
                component_id = frame.component_id(),
                message_id,
                "frame filtered"
            );
            self.metrics.record_frame(FrameOutcome::Filtered);
            return;
        }

        self.metrics.record_frame(FrameOutcome::Accepted);
        sink.emit(Event::Message(frame.clone()));

        let decoded = definition
            .ok_or(Error::UnknownMessage { id: message_id })
            .and_then(|definition| {
                decode_payload(definition, frame.payload())
                    .map(|fields| (definition.name().to_owned(), fields))
            });
        match decoded {
            Ok((name, fields)) => {
                trace!(message = %name, sequence, "frame decoded");
                sink.emit(Event::Decoded(DecodedMessage {
                    name,
                    frame,
                    fields,
                }));
            }
            Err(error) => {
                debug!(message_id, %error, "frame not decoded");
                self.metrics.record_frame(FrameOutcome::DecodeFailed);
                sink.emit(Event::DecodeFailed { frame, error });
            }
        }
    }
}
