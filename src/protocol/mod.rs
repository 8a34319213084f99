//! Protocol core: schema, layout, checksums, frames and the payload codec
//!
//! Nothing in this module performs I/O or dispatches events; see
//! [`crate::link`] for the receive state machine.

pub mod checksum;
mod codec;
mod error;
mod frame;
pub mod layout;
mod metrics;
mod schema;
mod types;
mod value;

pub use checksum::{compute_checksum, derive_seed, table_seed};
pub use codec::{Codec, decode_payload, encode_payload};
pub use error::{Error, Result};
pub use frame::{Frame, FrameHeader, frame_checksum};
pub use layout::{FieldDescriptor, Layout};
pub use metrics::{Metrics, MetricsSnapshot};
pub(crate) use metrics::FrameOutcome;
pub use schema::{
    EnumDefinition, EnumEntry, MessageDefinition, MessageRef, RawField, RawMessage,
    SchemaDefinition, SchemaRegistry,
};
pub use types::{FieldType, ProtocolVersion};
pub use value::{FieldValue, Fields};

/// Start marker of the primary framing version
pub const START_MARKER_V1: u8 = 0xFE;

/// Start marker of the legacy framing version
pub const START_MARKER_LEGACY: u8 = 0x55;

/// Header size in bytes (start, len, seq, sys, comp, msgid)
pub const HEADER_SIZE: usize = 6;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes a frame carries besides its payload
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Maximum payload size (one-byte length field)
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Maximum frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;
