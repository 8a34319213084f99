//! skylink - telemetry protocol engine for vehicle/ground-station links
//!
//! Frames, checksums and encodes/decodes the compact binary messages
//! exchanged over serial and radio links. Message layouts are built at
//! runtime from schema definitions, so new message sets need no code.
//!
//! # Quick Start
//!
//! ```rust
//! use skylink::{
//!     Engine, EngineConfig, Event, FieldValue, Fields, RawField, RawMessage, SchemaDefinition,
//! };
//!
//! let schema = SchemaDefinition {
//!     enums: vec![],
//!     messages: vec![RawMessage::new(
//!         0,
//!         "HEARTBEAT",
//!         vec![
//!             RawField::new("type", "uint8_t"),
//!             RawField::new("autopilot", "uint8_t"),
//!             RawField::new("base_mode", "uint8_t"),
//!             RawField::new("custom_mode", "uint32_t"),
//!             RawField::new("system_status", "uint8_t"),
//!             RawField::new("mavlink_version", "uint8_t_mavlink_version"),
//!         ],
//!     )],
//! };
//!
//! let config = EngineConfig { system_id: 255, component_id: 190, ..EngineConfig::default() };
//! let mut engine = Engine::new(config);
//! let mut events = Vec::new();
//! engine.load([schema], &mut events)?;
//! assert_eq!(events, vec![Event::Ready]);
//!
//! let fields = Fields::from([
//!     ("type".to_owned(), FieldValue::from(6u8)),
//!     ("autopilot".to_owned(), 8u8.into()),
//!     ("base_mode".to_owned(), 0u8.into()),
//!     ("custom_mode".to_owned(), 0u32.into()),
//!     ("system_status".to_owned(), 4u8.into()),
//!     ("mavlink_version".to_owned(), 3u8.into()),
//! ]);
//! let frame = engine.create_message("HEARTBEAT", &fields, 0)?;
//!
//! // Feed received bytes in any chunking
//! let mut events = Vec::new();
//! engine.parse(frame.as_bytes(), &mut events)?;
//! assert!(matches!(&events[1], Event::Decoded(msg) if msg.name == "HEARTBEAT"));
//! # Ok::<(), skylink::Error>(())
//! ```
//!
//! # Features
//!
//! - **Runtime schemas** - layouts and checksum seeds derived from definitions
//! - **Resynchronizing parser** - recovers from noise, reports gaps and bad checksums
//! - **Two framing versions** - seeded primary framing and legacy framing
//! - **`serde`** - deserialize schemas and configuration from JSON and friends
//! - **`debug-tools`** - telemetry log capture of sent and received frames

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod link;
pub mod protocol;

pub use link::{
    ChecksumFailure, DecodedMessage, Dispatcher, Engine, EngineConfig, Event, EventSink,
    SourceFilter, StreamParser,
};
pub use protocol::{
    Codec, Error, FieldType, FieldValue, Fields, Frame, MAX_PAYLOAD_SIZE, MessageDefinition,
    ProtocolVersion, RawField, RawMessage, Result, SchemaDefinition, SchemaRegistry,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
