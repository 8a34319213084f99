//! Message codec (encode/decode)
//!
//! Maps between named field values and payload bytes using the layout
//! computed for each message. Multi-byte values are little-endian.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{instrument, trace};

use super::metrics::Metrics;
use super::{
    Error, FieldDescriptor, FieldType, FieldValue, Fields, Frame, FrameHeader, MessageDefinition,
    MessageRef, ProtocolVersion, Result, SchemaRegistry,
};

/// Encode field values into a payload laid out for `message`.
///
/// Arrays may be shorter than their declared length; the remainder stays
/// zero. Every field must have a value.
///
/// # Errors
///
/// [`Error::MissingField`] for an absent value, [`Error::UnsupportedFieldType`]
/// for 64-bit integer fields, and [`Error::TypeMismatch`],
/// [`Error::ValueOutOfRange`] or [`Error::ArrayTooLong`] for values that do
/// not fit their field.
pub fn encode_payload(message: &MessageDefinition, fields: &Fields) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; message.payload_len()];

    for field in message.fields() {
        let value = fields.get(field.name()).ok_or_else(|| Error::MissingField {
            field: field.name().to_owned(),
        })?;
        if matches!(field.kind(), FieldType::Int64 | FieldType::Uint64) {
            return Err(unsupported(field));
        }
        let slot = &mut payload[field.offset()..field.offset() + field.width()];
        write_field(slot, field, value)?;
    }

    Ok(payload)
}

/// Decode a payload laid out for `message` into named field values.
///
/// `char` arrays come back as text cut at the first NUL; other arrays as
/// [`FieldValue::Array`]. Bytes beyond the message's payload length are
/// ignored.
///
/// # Errors
///
/// [`Error::BufferTooSmall`] for a short payload and
/// [`Error::UnsupportedFieldType`] for `int64_t` fields.
pub fn decode_payload(message: &MessageDefinition, payload: &[u8]) -> Result<Fields> {
    if payload.len() < message.payload_len() {
        return Err(Error::BufferTooSmall {
            needed: message.payload_len(),
            got: payload.len(),
        });
    }

    let mut values = Fields::with_capacity(message.fields().len());
    for field in message.fields() {
        if field.kind() == FieldType::Int64 {
            return Err(unsupported(field));
        }
        let slot = &payload[field.offset()..field.offset() + field.width()];
        values.insert(field.name().to_owned(), read_field(slot, field));
    }
    Ok(values)
}

fn write_field(slot: &mut [u8], field: &FieldDescriptor, value: &FieldValue) -> Result<()> {
    let kind = field.kind();
    let width = kind.width();

    match (field.is_array(), value) {
        (false, FieldValue::Array(_)) => Err(mismatch(field)),
        (false, _) => write_element(slot, field, value),
        (true, FieldValue::Text(text)) if kind == FieldType::Char => {
            let bytes = text.as_bytes();
            check_len(field, bytes.len())?;
            slot[..bytes.len()].copy_from_slice(bytes);
            Ok(())
        }
        (true, FieldValue::Array(items)) => {
            check_len(field, items.len())?;
            for (chunk, item) in slot.chunks_exact_mut(width).zip(items) {
                write_element(chunk, field, item)?;
            }
            Ok(())
        }
        (true, _) => Err(mismatch(field)),
    }
}

fn write_element(out: &mut [u8], field: &FieldDescriptor, value: &FieldValue) -> Result<()> {
    match field.kind() {
        FieldType::Int8 => out.copy_from_slice(&narrow::<i8>(field, value)?.to_le_bytes()),
        FieldType::Uint8 => out.copy_from_slice(&narrow::<u8>(field, value)?.to_le_bytes()),
        FieldType::Int16 => out.copy_from_slice(&narrow::<i16>(field, value)?.to_le_bytes()),
        FieldType::Uint16 => out.copy_from_slice(&narrow::<u16>(field, value)?.to_le_bytes()),
        FieldType::Int32 => out.copy_from_slice(&narrow::<i32>(field, value)?.to_le_bytes()),
        FieldType::Uint32 => out.copy_from_slice(&narrow::<u32>(field, value)?.to_le_bytes()),
        #[allow(clippy::cast_possible_truncation)]
        FieldType::Float32 => out.copy_from_slice(&(float(field, value)? as f32).to_le_bytes()),
        FieldType::Float64 => out.copy_from_slice(&float(field, value)?.to_le_bytes()),
        FieldType::Char => out[0] = char_code(field, value)?,
        FieldType::Int64 | FieldType::Uint64 => return Err(unsupported(field)),
    }
    Ok(())
}

fn read_field(slot: &[u8], field: &FieldDescriptor) -> FieldValue {
    let kind = field.kind();
    if !field.is_array() {
        return read_element(slot, kind);
    }
    if kind == FieldType::Char {
        let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        return FieldValue::Text(String::from_utf8_lossy(&slot[..end]).into_owned());
    }
    FieldValue::Array(
        slot.chunks_exact(kind.width())
            .map(|chunk| read_element(chunk, kind))
            .collect(),
    )
}

// `bytes` is exactly `kind.width()` long.
fn read_element(bytes: &[u8], kind: FieldType) -> FieldValue {
    match kind {
        FieldType::Int8 => FieldValue::Int(i64::from(bytes[0] as i8)),
        FieldType::Uint8 | FieldType::Char => FieldValue::UInt(u64::from(bytes[0])),
        FieldType::Int16 => FieldValue::Int(i64::from(i16::from_le_bytes(le(bytes)))),
        FieldType::Uint16 => FieldValue::UInt(u64::from(u16::from_le_bytes(le(bytes)))),
        FieldType::Int32 => FieldValue::Int(i64::from(i32::from_le_bytes(le(bytes)))),
        FieldType::Uint32 => FieldValue::UInt(u64::from(u32::from_le_bytes(le(bytes)))),
        FieldType::Uint64 => {
            // low word first
            let low = u32::from_le_bytes(le(&bytes[..4]));
            let high = u32::from_le_bytes(le(&bytes[4..]));
            FieldValue::UInt(u64::from(low) | (u64::from(high) << 32))
        }
        FieldType::Float32 => FieldValue::Float(f64::from(f32::from_le_bytes(le(bytes)))),
        FieldType::Float64 => FieldValue::Float(f64::from_le_bytes(le(bytes))),
        FieldType::Int64 => unreachable!("int64 fields are rejected before reading"),
    }
}

fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

fn narrow<T: TryFrom<i128>>(field: &FieldDescriptor, value: &FieldValue) -> Result<T> {
    let wide = match *value {
        FieldValue::Int(v) => i128::from(v),
        FieldValue::UInt(v) => i128::from(v),
        _ => return Err(mismatch(field)),
    };
    T::try_from(wide).map_err(|_| Error::ValueOutOfRange {
        field: field.name().to_owned(),
        kind: field.kind(),
    })
}

fn float(field: &FieldDescriptor, value: &FieldValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| mismatch(field))
}

fn char_code(field: &FieldDescriptor, value: &FieldValue) -> Result<u8> {
    match value {
        FieldValue::Text(text) => match text.chars().next() {
            None => Ok(0),
            Some(c) => u8::try_from(u32::from(c)).map_err(|_| Error::ValueOutOfRange {
                field: field.name().to_owned(),
                kind: FieldType::Char,
            }),
        },
        _ => narrow::<u8>(field, value),
    }
}

fn check_len(field: &FieldDescriptor, len: usize) -> Result<()> {
    if len > field.arity() {
        return Err(Error::ArrayTooLong {
            field: field.name().to_owned(),
            len,
            max: field.arity(),
        });
    }
    Ok(())
}

fn mismatch(field: &FieldDescriptor) -> Error {
    Error::TypeMismatch {
        field: field.name().to_owned(),
        kind: field.kind(),
    }
}

fn unsupported(field: &FieldDescriptor) -> Error {
    Error::UnsupportedFieldType {
        field: field.name().to_owned(),
        kind: field.kind(),
    }
}

/// Frame-level codec bound to a registry and a framing version.
///
/// Holds the outgoing sequence counter, so every frame encoded through one
/// codec gets the next sequence number (1, 2, ... 255, 0, 1, ...).
#[derive(Debug)]
pub struct Codec {
    registry: Arc<SchemaRegistry>,
    version: ProtocolVersion,
    sequence: AtomicU8,
    metrics: Arc<Metrics>,
}

impl Codec {
    /// Create a codec with fresh counters
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>, version: ProtocolVersion) -> Self {
        Self::with_metrics(registry, version, Arc::new(Metrics::new()))
    }

    /// Create a codec recording into shared counters
    #[must_use]
    pub fn with_metrics(
        registry: Arc<SchemaRegistry>,
        version: ProtocolVersion,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            registry,
            version,
            sequence: AtomicU8::new(0),
            metrics,
        }
    }

    /// Encode a message into a complete frame.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMessage`] / [`Error::UnknownMessageName`] when the
    /// message is not registered, plus any error of [`encode_payload`].
    #[instrument(level = "trace", skip(self, message, fields))]
    pub fn encode<'a>(
        &self,
        message: impl Into<MessageRef<'a>>,
        fields: &Fields,
        system_id: u8,
        component_id: u8,
    ) -> Result<Frame> {
        let definition = self.registry.resolve(&message.into())?;
        let payload = encode_payload(definition, fields)?;

        let sequence = self.next_sequence();
        let frame = Frame::assemble(
            self.version,
            FrameHeader {
                sequence,
                system_id,
                component_id,
                message_id: definition.id(),
            },
            &payload,
            definition.seed(),
        )?;
        trace!(
            message = definition.name(),
            sequence,
            len = payload.len(),
            "encoded frame"
        );
        self.metrics.record_encoded();
        Ok(frame)
    }

    /// Decode the payload of a frame.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMessage`] when the frame's id is not registered, plus
    /// any error of [`decode_payload`].
    pub fn decode(&self, frame: &Frame) -> Result<Fields> {
        let id = frame.message_id();
        let definition = self
            .registry
            .message(id)
            .ok_or(Error::UnknownMessage { id })?;
        decode_payload(definition, frame.payload())
    }

    /// Parse, verify and decode one complete frame from bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<(Frame, Fields)> {
        let frame = Frame::from_bytes(self.version, bytes)?;
        let id = frame.message_id();
        let definition = self
            .registry
            .message(id)
            .ok_or(Error::UnknownMessage { id })?;
        frame.verify(definition.seed())?;
        let fields = decode_payload(definition, frame.payload())?;
        Ok((frame, fields))
    }

    fn next_sequence(&self) -> u8 {
        // fetch_add wraps at 255 and returns the previous value
        self.sequence.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Registry this codec encodes against
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Framing version
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{RawField, RawMessage, SchemaDefinition};

    fn registry() -> Arc<SchemaRegistry> {
        let messages = vec![
            RawMessage::new(
                22,
                "PARAM_VALUE",
                vec![
                    RawField::new("param_id", "char[16]"),
                    RawField::new("param_value", "float"),
                    RawField::new("param_type", "uint8_t"),
                    RawField::new("param_count", "uint16_t"),
                    RawField::new("param_index", "uint16_t"),
                ],
            ),
            RawMessage::new(
                25,
                "GPS_STATUS",
                vec![
                    RawField::new("satellites_visible", "uint8_t"),
                    RawField::new("satellite_prn", "uint8_t[5]"),
                    RawField::new("satellite_snr", "uint8_t[5]"),
                ],
            ),
            RawMessage::new(
                200,
                "MIXED",
                vec![
                    RawField::new("i8", "int8_t"),
                    RawField::new("i16", "int16_t"),
                    RawField::new("i32", "int32_t"),
                    RawField::new("u32", "uint32_t"),
                    RawField::new("f64", "double"),
                    RawField::new("flag", "char"),
                    RawField::new("deltas", "int16_t[3]"),
                ],
            ),
            RawMessage::new(
                201,
                "WIDE",
                vec![
                    RawField::new("time_usec", "uint64_t"),
                    RawField::new("offset", "int64_t"),
                ],
            ),
            RawMessage::new(202, "STAMP", vec![RawField::new("time_usec", "uint64_t")]),
        ];
        Arc::new(
            SchemaRegistry::load([SchemaDefinition {
                enums: vec![],
                messages,
            }])
            .unwrap(),
        )
    }

    fn param_value() -> Fields {
        Fields::from([
            ("param_id".to_owned(), FieldValue::from("MY_PI")),
            ("param_value".to_owned(), FieldValue::from(12.5f32)),
            ("param_type".to_owned(), FieldValue::from(5u8)),
            ("param_count".to_owned(), FieldValue::from(100u16)),
            ("param_index".to_owned(), FieldValue::from(55u16)),
        ])
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let frame = codec.encode("PARAM_VALUE", &param_value(), 1, 1).unwrap();
        let decoded = codec.decode(&frame).unwrap();

        assert_eq!(decoded["param_id"], FieldValue::Text("MY_PI".into()));
        assert_eq!(
            decoded["param_value"],
            FieldValue::Float(f64::from(12.5f32))
        );
        assert_eq!(decoded["param_type"], FieldValue::UInt(5));
        assert_eq!(decoded["param_count"], FieldValue::UInt(100));
        assert_eq!(decoded["param_index"], FieldValue::UInt(55));
    }

    #[test]
    fn test_payload_layout_on_wire() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let frame = codec.encode(22u8, &param_value(), 1, 1).unwrap();
        let payload = frame.payload();

        // float, uint16 x2, then char[16], then uint8
        assert_eq!(payload.len(), 25);
        assert_eq!(&payload[0..4], &12.5f32.to_le_bytes());
        assert_eq!(&payload[4..6], &100u16.to_le_bytes());
        assert_eq!(&payload[6..8], &55u16.to_le_bytes());
        assert_eq!(&payload[8..13], b"MY_PI");
        assert!(payload[13..24].iter().all(|&b| b == 0));
        assert_eq!(payload[24], 5);
    }

    #[test]
    fn test_decoded_fields_follow_layout_order() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let frame = codec.encode("PARAM_VALUE", &param_value(), 1, 1).unwrap();
        let decoded = codec.decode(&frame).unwrap();
        let names: Vec<&str> = decoded.keys().map(String::as_str).collect();

        assert_eq!(
            names,
            vec!["param_value", "param_count", "param_index", "param_id", "param_type"]
        );
    }

    #[test]
    fn test_signed_and_array_values() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let fields = Fields::from([
            ("i8".to_owned(), FieldValue::from(-128i8)),
            ("i16".to_owned(), FieldValue::from(-2i16)),
            ("i32".to_owned(), FieldValue::from(i32::MIN)),
            ("u32".to_owned(), FieldValue::from(u32::MAX)),
            ("f64".to_owned(), FieldValue::from(-0.125f64)),
            ("flag".to_owned(), FieldValue::from("Z")),
            ("deltas".to_owned(), FieldValue::from([-1i16, 0, 1])),
        ]);

        let frame = codec.encode("MIXED", &fields, 3, 4).unwrap();
        let decoded = codec.decode(&frame).unwrap();

        assert_eq!(decoded["i8"], FieldValue::Int(-128));
        assert_eq!(decoded["i16"], FieldValue::Int(-2));
        assert_eq!(decoded["i32"], FieldValue::Int(i64::from(i32::MIN)));
        assert_eq!(decoded["u32"], FieldValue::UInt(u64::from(u32::MAX)));
        assert_eq!(decoded["f64"], FieldValue::Float(-0.125));
        assert_eq!(decoded["flag"], FieldValue::UInt(u64::from(b'Z')));
        assert_eq!(
            decoded["deltas"],
            FieldValue::Array(vec![
                FieldValue::Int(-1),
                FieldValue::Int(0),
                FieldValue::Int(1)
            ])
        );
        assert_eq!(frame.system_id(), 3);
        assert_eq!(frame.component_id(), 4);
    }

    #[test]
    fn test_short_array_zero_padded() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let fields = Fields::from([
            ("satellites_visible".to_owned(), FieldValue::from(2u8)),
            ("satellite_prn".to_owned(), FieldValue::from([7u8, 9])),
            ("satellite_snr".to_owned(), FieldValue::from([40u8, 41, 42, 43, 44])),
        ]);

        let frame = codec.encode("GPS_STATUS", &fields, 1, 1).unwrap();
        let decoded = codec.decode(&frame).unwrap();

        assert_eq!(decoded["satellite_prn"], FieldValue::from([7u8, 9, 0, 0, 0]));
    }

    #[test]
    fn test_missing_field() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let mut fields = param_value();
        fields.shift_remove("param_count");

        let result = codec.encode("PARAM_VALUE", &fields, 1, 1);
        assert_eq!(
            result,
            Err(Error::MissingField {
                field: "param_count".into()
            })
        );
    }

    #[test]
    fn test_unknown_message() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        assert!(matches!(
            codec.encode("ATTITUDE", &Fields::new(), 1, 1),
            Err(Error::UnknownMessageName { .. })
        ));
        assert_eq!(
            codec.encode(99u8, &Fields::new(), 1, 1),
            Err(Error::UnknownMessage { id: 99 })
        );
    }

    #[test]
    fn test_value_checks() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);

        let mut fields = param_value();
        fields.insert("param_type".into(), FieldValue::from(256u16));
        assert!(matches!(
            codec.encode("PARAM_VALUE", &fields, 1, 1),
            Err(Error::ValueOutOfRange { .. })
        ));

        let mut fields = param_value();
        fields.insert("param_id".into(), FieldValue::from("A_VERY_LONG_PARAMETER"));
        assert!(matches!(
            codec.encode("PARAM_VALUE", &fields, 1, 1),
            Err(Error::ArrayTooLong { len: 21, max: 16, .. })
        ));

        let mut fields = param_value();
        fields.insert("param_count".into(), FieldValue::from(1.5f64));
        assert!(matches!(
            codec.encode("PARAM_VALUE", &fields, 1, 1),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_64bit_integers_unsupported_on_encode() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let fields = Fields::from([("time_usec".to_owned(), FieldValue::from(1u64))]);

        assert!(matches!(
            codec.encode("STAMP", &fields, 1, 1),
            Err(Error::UnsupportedFieldType {
                kind: FieldType::Uint64,
                ..
            })
        ));
    }

    #[test]
    fn test_uint64_decode_combines_words() {
        // high word must not be dropped
        let registry = registry();
        let stamp = registry.message(202).unwrap();
        let payload = 0x0000_0002_0000_0001u64.to_le_bytes();

        let decoded = decode_payload(stamp, &payload).unwrap();
        assert_eq!(decoded["time_usec"], FieldValue::UInt(0x0000_0002_0000_0001));
    }

    #[test]
    fn test_int64_decode_unsupported() {
        let registry = registry();
        let wide = registry.message(201).unwrap();

        assert!(matches!(
            decode_payload(wide, &[0u8; 16]),
            Err(Error::UnsupportedFieldType {
                kind: FieldType::Int64,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_short_payload() {
        let registry = registry();
        let param = registry.message(22).unwrap();

        assert_eq!(
            decode_payload(param, &[0u8; 10]),
            Err(Error::BufferTooSmall {
                needed: 25,
                got: 10
            })
        );
    }

    #[test]
    fn test_char_array_decodes_to_text() {
        let registry = Arc::new(
            SchemaRegistry::load([SchemaDefinition {
                enums: vec![],
                messages: vec![RawMessage::new(
                    180,
                    "NAMED",
                    vec![RawField::new("name", "char[4]")],
                )],
            }])
            .unwrap(),
        );
        let named = registry.message(180).unwrap();

        let decoded = decode_payload(named, b"test").unwrap();
        assert_eq!(decoded["name"], FieldValue::Text("test".into()));
    }

    #[test]
    fn test_sequence_wraps() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let sequences: Vec<u8> = (0..257)
            .map(|_| {
                codec
                    .encode("PARAM_VALUE", &param_value(), 1, 1)
                    .unwrap()
                    .sequence()
            })
            .collect();

        assert_eq!(sequences[0], 1);
        assert_eq!(sequences[254], 255);
        assert_eq!(sequences[255], 0);
        assert_eq!(sequences[256], 1);
    }

    #[test]
    fn test_decode_bytes_verifies_checksum() {
        let codec = Codec::new(registry(), ProtocolVersion::V1);
        let frame = codec.encode("PARAM_VALUE", &param_value(), 1, 1).unwrap();

        let (parsed, fields) = codec.decode_bytes(frame.as_bytes()).unwrap();
        assert_eq!(parsed, frame);
        assert_eq!(fields["param_index"], FieldValue::UInt(55));

        let mut corrupted = frame.as_bytes().to_vec();
        corrupted[8] ^= 0x01;
        assert!(matches!(
            codec.decode_bytes(&corrupted),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: supported scalar and array kinds survive encode then decode
            #[test]
            fn prop_mixed_roundtrip(
                i8v in any::<i8>(),
                i16v in any::<i16>(),
                i32v in any::<i32>(),
                u32v in any::<u32>(),
                f64v in any::<f64>().prop_filter("finite", |v| v.is_finite()),
                flag in any::<u8>(),
                deltas in prop::collection::vec(any::<i16>(), 3),
            ) {
                let codec = Codec::new(registry(), ProtocolVersion::V1);
                let fields = Fields::from([
                    ("i8".to_owned(), FieldValue::from(i8v)),
                    ("i16".to_owned(), FieldValue::from(i16v)),
                    ("i32".to_owned(), FieldValue::from(i32v)),
                    ("u32".to_owned(), FieldValue::from(u32v)),
                    ("f64".to_owned(), FieldValue::from(f64v)),
                    ("flag".to_owned(), FieldValue::from(flag)),
                    ("deltas".to_owned(), FieldValue::from(deltas.clone())),
                ]);

                let frame = codec.encode("MIXED", &fields, 1, 1).unwrap();
                let decoded = codec.decode(&frame).unwrap();

                prop_assert_eq!(&decoded["i8"], &FieldValue::Int(i64::from(i8v)));
                prop_assert_eq!(&decoded["i16"], &FieldValue::Int(i64::from(i16v)));
                prop_assert_eq!(&decoded["i32"], &FieldValue::Int(i64::from(i32v)));
                prop_assert_eq!(&decoded["u32"], &FieldValue::UInt(u64::from(u32v)));
                prop_assert_eq!(&decoded["f64"], &FieldValue::Float(f64v));
                prop_assert_eq!(&decoded["flag"], &FieldValue::UInt(u64::from(flag)));
                prop_assert_eq!(&decoded["deltas"], &FieldValue::from(deltas));
            }

            /// Property: ASCII text without NULs survives a char array
            #[test]
            fn prop_text_roundtrip(name in "[A-Z_]{0,16}", value in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
                let codec = Codec::new(registry(), ProtocolVersion::V1);
                let mut fields = param_value();
                fields.insert("param_id".into(), FieldValue::from(name.as_str()));
                fields.insert("param_value".into(), FieldValue::from(value));

                let frame = codec.encode("PARAM_VALUE", &fields, 1, 1).unwrap();
                let decoded = codec.decode(&frame).unwrap();

                prop_assert_eq!(&decoded["param_id"], &FieldValue::Text(name));
                prop_assert_eq!(&decoded["param_value"], &FieldValue::Float(f64::from(value)));
            }
        }
    }
}
