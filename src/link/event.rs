//! Events emitted by the receive path and a typed dispatcher for them

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::protocol::{Error, Fields, Frame, MessageRef, Result, SchemaRegistry};

/// Diagnostics for a frame that failed its checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumFailure {
    /// Message id from the frame header
    pub message_id: u8,
    /// Seed derived from the registered definition, if any
    pub derived_seed: Option<u8>,
    /// Seed from the static table, if any
    pub table_seed: Option<u8>,
    /// Checksum computed over the received bytes
    pub computed: u16,
    /// Checksum carried by the frame
    pub received: u16,
}

/// A validated frame together with its decoded fields
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Message name from the registry
    pub name: String,
    /// Raw frame
    pub frame: Frame,
    /// Decoded field values
    pub fields: Fields,
}

/// Something the engine wants the application to know about
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Schema loaded; the engine is usable
    Ready,
    /// A frame passed its checksum and the id filter
    Message(Frame),
    /// A frame of a registered message type, decoded
    Decoded(DecodedMessage),
    /// A frame passed its checksum but could not be decoded
    DecodeFailed {
        /// Raw frame
        frame: Frame,
        /// Why decoding failed
        error: Error,
    },
    /// Sequence numbers skipped between two accepted frames
    SequenceGap {
        /// Number of frames missing
        gap: u8,
    },
    /// A frame failed its checksum and was discarded
    ChecksumFail(ChecksumFailure),
}

impl Event {
    /// Short name of the event kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Message(_) => "message",
            Self::Decoded(_) => "decoded",
            Self::DecodeFailed { .. } => "decodeFailed",
            Self::SequenceGap { .. } => "sequenceError",
            Self::ChecksumFail(_) => "checksumFail",
        }
    }
}

/// Receiver of engine events
pub trait EventSink {
    /// Handle one event
    fn emit(&mut self, event: Event);
}

impl<F: FnMut(Event)> EventSink for F {
    fn emit(&mut self, event: Event) {
        self(event);
    }
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

type MessageHandler<'a> = Box<dyn FnMut(&Frame, &Fields) + 'a>;

/// Routes events to typed callback slots.
///
/// Message handlers are keyed by message id and resolved against the
/// registry when registered, so a misspelt message name fails up front.
/// Each message type has at most one handler; registering again replaces it.
pub struct Dispatcher<'a> {
    registry: Arc<SchemaRegistry>,
    on_frame: Option<Box<dyn FnMut(&Frame) + 'a>>,
    on_sequence_gap: Option<Box<dyn FnMut(u8) + 'a>>,
    on_checksum_fail: Option<Box<dyn FnMut(&ChecksumFailure) + 'a>>,
    on_decode_failed: Option<Box<dyn FnMut(&Frame, &Error) + 'a>>,
    handlers: HashMap<u8, MessageHandler<'a>>,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher with no handlers
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            on_frame: None,
            on_sequence_gap: None,
            on_checksum_fail: None,
            on_decode_failed: None,
            handlers: HashMap::new(),
        }
    }

    /// Handle every validated frame
    pub fn on_frame(&mut self, handler: impl FnMut(&Frame) + 'a) -> &mut Self {
        self.on_frame = Some(Box::new(handler));
        self
    }

    /// Handle sequence gaps
    pub fn on_sequence_gap(&mut self, handler: impl FnMut(u8) + 'a) -> &mut Self {
        self.on_sequence_gap = Some(Box::new(handler));
        self
    }

    /// Handle checksum failures
    pub fn on_checksum_fail(&mut self, handler: impl FnMut(&ChecksumFailure) + 'a) -> &mut Self {
        self.on_checksum_fail = Some(Box::new(handler));
        self
    }

    /// Handle frames that validated but could not be decoded
    pub fn on_decode_failed(&mut self, handler: impl FnMut(&Frame, &Error) + 'a) -> &mut Self {
        self.on_decode_failed = Some(Box::new(handler));
        self
    }

    /// Handle one message type, by id or name
    ///
    /// # Errors
    ///
    /// Fails when the message is not in the registry.
    pub fn on_message<'m>(
        &mut self,
        message: impl Into<MessageRef<'m>>,
        handler: impl FnMut(&Frame, &Fields) + 'a,
    ) -> Result<&mut Self> {
        let id = self.registry.resolve(&message.into())?.id();
        self.handlers.insert(id, Box::new(handler));
        Ok(self)
    }

    /// Check if a message type has a handler
    #[must_use]
    pub fn handles(&self, message_id: u8) -> bool {
        self.handlers.contains_key(&message_id)
    }
}

impl EventSink for Dispatcher<'_> {
    fn emit(&mut self, event: Event) {
        match event {
            Event::Ready => {}
            Event::Message(frame) => {
                if let Some(handler) = self.on_frame.as_mut() {
                    handler(&frame);
                }
            }
            Event::Decoded(decoded) => {
                if let Some(handler) = self.handlers.get_mut(&decoded.frame.message_id()) {
                    handler(&decoded.frame, &decoded.fields);
                }
            }
            Event::DecodeFailed { frame, error } => {
                if let Some(handler) = self.on_decode_failed.as_mut() {
                    handler(&frame, &error);
                }
            }
            Event::SequenceGap { gap } => {
                if let Some(handler) = self.on_sequence_gap.as_mut() {
                    handler(gap);
                }
            }
            Event::ChecksumFail(failure) => {
                if let Some(handler) = self.on_checksum_fail.as_mut() {
                    handler(&failure);
                }
            }
        }
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<u8> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("handlers", &ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        FieldValue, FrameHeader, ProtocolVersion, RawField, RawMessage, SchemaDefinition,
    };

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(
            SchemaRegistry::load([SchemaDefinition {
                enums: vec![],
                messages: vec![
                    RawMessage::new(1, "PING", vec![RawField::new("n", "uint8_t")]),
                    RawMessage::new(2, "PONG", vec![RawField::new("n", "uint8_t")]),
                ],
            }])
            .unwrap(),
        )
    }

    fn frame(message_id: u8) -> Frame {
        Frame::assemble(
            ProtocolVersion::V1,
            FrameHeader {
                sequence: 1,
                system_id: 1,
                component_id: 1,
                message_id,
            },
            &[7],
            0,
        )
        .unwrap()
    }

    fn decoded(name: &str, message_id: u8) -> Event {
        Event::Decoded(DecodedMessage {
            name: name.into(),
            frame: frame(message_id),
            fields: Fields::from([("n".to_owned(), 7u8.into())]),
        })
    }

    #[test]
    fn test_routes_by_message_type() {
        let mut pings = Vec::new();
        let mut frames = 0;
        {
            let mut dispatcher = Dispatcher::new(registry());
            dispatcher
                .on_message("PING", |_, fields| pings.push(fields["n"].clone()))
                .unwrap()
                .on_frame(|_| frames += 1);

            dispatcher.emit(Event::Message(frame(1)));
            dispatcher.emit(decoded("PING", 1));
            dispatcher.emit(Event::Message(frame(2)));
            dispatcher.emit(decoded("PONG", 2));
        }

        assert_eq!(pings, vec![FieldValue::from(7u8)]);
        assert_eq!(frames, 2);
    }

    #[test]
    fn test_unknown_message_name_rejected() {
        let mut dispatcher = Dispatcher::new(registry());
        let result = dispatcher.on_message("ATTITUDE", |_, _| {});
        assert!(matches!(result, Err(Error::UnknownMessageName { .. })));
        assert!(!dispatcher.handles(30));
    }

    #[test]
    fn test_diagnostic_slots() {
        let mut gaps = Vec::new();
        let mut failures = Vec::new();
        {
            let mut dispatcher = Dispatcher::new(registry());
            dispatcher
                .on_sequence_gap(|gap| gaps.push(gap))
                .on_checksum_fail(|failure| failures.push(failure.message_id));

            dispatcher.emit(Event::SequenceGap { gap: 2 });
            dispatcher.emit(Event::ChecksumFail(ChecksumFailure {
                message_id: 1,
                derived_seed: Some(10),
                table_seed: Some(124),
                computed: 0x1234,
                received: 0x4321,
            }));
            dispatcher.emit(Event::Ready);
        }

        assert_eq!(gaps, vec![2]);
        assert_eq!(failures, vec![1]);
    }

    #[test]
    fn test_vec_and_closure_sinks() {
        let mut events = Vec::new();
        events.emit(Event::Ready);
        assert_eq!(events, vec![Event::Ready]);

        let mut kinds = Vec::new();
        let mut sink = |event: Event| kinds.push(event.kind());
        sink.emit(Event::SequenceGap { gap: 1 });
        assert_eq!(kinds, vec!["sequenceError"]);
    }
}
