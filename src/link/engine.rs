//! Engine facade: schema lifecycle, receive path and transmit path

use std::sync::Arc;

#[cfg(feature = "debug-tools")]
use std::path::PathBuf;

use tracing::{debug, instrument, warn};

#[cfg(feature = "debug-tools")]
use super::capture::TlogRecorder;
use super::event::{Dispatcher, Event, EventSink};
use super::parser::{SourceFilter, StreamParser};
use crate::protocol::{
    Codec, Error, Fields, Frame, MessageRef, Metrics, MetricsSnapshot, ProtocolVersion, Result,
    SchemaDefinition, SchemaRegistry,
};

/// Engine configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Own system id, used when creating messages. With `component_id`,
    /// also the receive filter; `(0, 0)` accepts frames from anyone.
    pub system_id: u8,
    /// Own component id.
    pub component_id: u8,
    /// Framing version for both directions.
    pub version: ProtocolVersion,
    /// Optional telemetry log of frames sent (debug builds only).
    #[cfg(feature = "debug-tools")]
    pub capture_send_path: Option<PathBuf>,
    /// Optional telemetry log of frames accepted (debug builds only).
    #[cfg(feature = "debug-tools")]
    pub capture_recv_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_id: 0,
            component_id: 0,
            version: ProtocolVersion::V1,
            #[cfg(feature = "debug-tools")]
            capture_send_path: None,
            #[cfg(feature = "debug-tools")]
            capture_recv_path: None,
        }
    }
}

impl EngineConfig {
    fn filter(&self) -> SourceFilter {
        SourceFilter {
            system_id: self.system_id,
            component_id: self.component_id,
        }
    }
}

/// Everything that exists once a schema is loaded
#[derive(Debug)]
struct Link {
    registry: Arc<SchemaRegistry>,
    codec: Codec,
    parser: StreamParser,
    #[cfg(feature = "debug-tools")]
    capture_send: Option<TlogRecorder>,
    #[cfg(feature = "debug-tools")]
    capture_recv: Option<TlogRecorder>,
}

/// Protocol engine for one link.
///
/// Starts uninitialized; [`Engine::load`] builds the registry and moves it
/// to the loaded state exactly once. Until then every operation that needs
/// a schema fails with [`Error::NotLoaded`].
///
/// Receiving needs `&mut self` since the parser owns a partial frame.
/// Encoding only needs `&self`.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    metrics: Arc<Metrics>,
    link: Option<Link>,
}

impl Engine {
    /// Create an engine with no schema loaded.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(Metrics::new()),
            link: None,
        }
    }

    /// Create an engine and load definitions, discarding the ready event.
    pub fn with_definitions<I>(config: EngineConfig, definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = SchemaDefinition>,
    {
        let mut engine = Self::new(config);
        engine.load(definitions, &mut |_: Event| {})?;
        Ok(engine)
    }

    /// Load and merge definition sets, then emit [`Event::Ready`].
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyLoaded`] on a second call, or any schema error. A
    /// failed load leaves the engine uninitialized.
    #[instrument(level = "debug", skip(self, definitions, sink))]
    pub fn load<I>(&mut self, definitions: I, sink: &mut impl EventSink) -> Result<()>
    where
        I: IntoIterator<Item = SchemaDefinition>,
    {
        if self.link.is_some() {
            return Err(Error::AlreadyLoaded);
        }

        let registry = Arc::new(SchemaRegistry::load(definitions)?);
        let codec = Codec::with_metrics(
            Arc::clone(&registry),
            self.config.version,
            Arc::clone(&self.metrics),
        );
        let parser = StreamParser::with_metrics(
            Arc::clone(&registry),
            self.config.version,
            self.config.filter(),
            Arc::clone(&self.metrics),
        );
        #[cfg(feature = "debug-tools")]
        let capture_send = open_capture(self.config.capture_send_path.as_deref())?;
        #[cfg(feature = "debug-tools")]
        let capture_recv = open_capture(self.config.capture_recv_path.as_deref())?;

        debug!(
            messages = registry.len(),
            version = %self.config.version,
            "engine ready"
        );
        self.link = Some(Link {
            registry,
            codec,
            parser,
            #[cfg(feature = "debug-tools")]
            capture_send,
            #[cfg(feature = "debug-tools")]
            capture_recv,
        });
        sink.emit(Event::Ready);
        Ok(())
    }

    /// Check if a schema has been loaded
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.link.is_some()
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Loaded registry
    pub fn registry(&self) -> Result<&Arc<SchemaRegistry>> {
        Ok(&self.link()?.registry)
    }

    /// A dispatcher bound to the loaded registry
    pub fn dispatcher<'a>(&self) -> Result<Dispatcher<'a>> {
        Ok(Dispatcher::new(Arc::clone(&self.link()?.registry)))
    }

    /// Feed received bytes, emitting events for every frame they complete.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before [`Engine::load`]. Problems with the
    /// stream itself are reported as events, never as errors.
    #[instrument(level = "trace", skip_all, fields(len = bytes.len()))]
    pub fn parse(&mut self, bytes: &[u8], sink: &mut impl EventSink) -> Result<()> {
        let link = self.link.as_mut().ok_or(Error::NotLoaded)?;

        #[cfg(feature = "debug-tools")]
        {
            let recorder = link.capture_recv.as_ref();
            let mut tap = |event: Event| {
                if let (Some(recorder), Event::Message(frame)) = (recorder, &event) {
                    if let Err(err) = recorder.record(frame.as_bytes()) {
                        debug!(error = ?err, "failed to record inbound frame");
                    }
                }
                sink.emit(event);
            };
            link.parser.parse(bytes, &mut tap);
        }
        #[cfg(not(feature = "debug-tools"))]
        link.parser.parse(bytes, sink);

        Ok(())
    }

    /// Encode a message with explicit source ids.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before [`Engine::load`], otherwise any error of
    /// [`Codec::encode`].
    #[instrument(level = "trace", skip(self, message, fields))]
    pub fn encode<'m>(
        &self,
        message: impl Into<MessageRef<'m>>,
        fields: &Fields,
        system_id: u8,
        component_id: u8,
    ) -> Result<Frame> {
        let link = self.link()?;
        let frame = link.codec.encode(message, fields, system_id, component_id)?;
        #[cfg(feature = "debug-tools")]
        if let Some(recorder) = &link.capture_send {
            if let Err(err) = recorder.record(frame.as_bytes()) {
                debug!(error = ?err, "failed to record outbound frame");
            }
        }
        Ok(frame)
    }

    /// Encode a message as this engine.
    ///
    /// A `system_id` of `0` means the configured system id; the component
    /// id is always the configured one.
    #[instrument(level = "trace", skip(self, message, fields))]
    pub fn create_message<'m>(
        &self,
        message: impl Into<MessageRef<'m>>,
        fields: &Fields,
        system_id: u8,
    ) -> Result<Frame> {
        if self.config.system_id == 0 && self.config.component_id == 0 {
            warn!("creating a message with system and component id 0");
        }
        let system_id = if system_id == 0 {
            self.config.system_id
        } else {
            system_id
        };
        self.encode(message, fields, system_id, self.config.component_id)
    }

    /// Decode the payload of a frame against the loaded registry.
    pub fn decode(&self, frame: &Frame) -> Result<Fields> {
        self.link()?.codec.decode(frame)
    }

    /// Message id for a name, once loaded
    #[must_use]
    pub fn message_id(&self, name: &str) -> Option<u8> {
        self.link.as_ref()?.registry.message_id(name)
    }

    /// Message name for an id, once loaded
    #[must_use]
    pub fn message_name(&self, id: u8) -> Option<&str> {
        self.link.as_ref()?.registry.message_name(id)
    }

    /// Link counters
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn link(&self) -> Result<&Link> {
        self.link.as_ref().ok_or(Error::NotLoaded)
    }
}

#[cfg(feature = "debug-tools")]
fn open_capture(path: Option<&std::path::Path>) -> Result<Option<TlogRecorder>> {
    path.map(|path| {
        TlogRecorder::create(path).map_err(|err| Error::Capture(format!("{}: {err}", path.display())))
    })
    .transpose()
}
