//! Link layer: stream parsing, event delivery and the engine facade

#[cfg(feature = "debug-tools")]
mod capture;
mod engine;
mod event;
mod parser;

#[cfg(feature = "debug-tools")]
pub use capture::TlogRecorder;
pub use engine::{Engine, EngineConfig};
pub use event::{ChecksumFailure, DecodedMessage, Dispatcher, Event, EventSink};
pub use parser::{ParseState, RECEIVE_BUFFER_SIZE, SourceFilter, StreamParser};
