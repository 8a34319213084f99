//! Field kinds and framing versions

use std::fmt;

/// Primitive kind of a message field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    Uint8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    Uint16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    Uint64,
    /// IEEE 754 single precision
    Float32,
    /// IEEE 754 double precision
    Float64,
    /// Single byte character
    Char,
}

impl FieldType {
    /// Resolve a base type name as written in a schema.
    ///
    /// `uint8_t_mavlink_version` collapses to [`FieldType::Uint8`] and the
    /// generic `array` marker to [`FieldType::Int8`].
    #[must_use]
    pub fn from_base_name(name: &str) -> Option<Self> {
        match name {
            "int8_t" | "array" => Some(Self::Int8),
            "uint8_t" | "uint8_t_mavlink_version" => Some(Self::Uint8),
            "int16_t" => Some(Self::Int16),
            "uint16_t" => Some(Self::Uint16),
            "int32_t" => Some(Self::Int32),
            "uint32_t" => Some(Self::Uint32),
            "int64_t" => Some(Self::Int64),
            "uint64_t" => Some(Self::Uint64),
            "float" => Some(Self::Float32),
            "double" => Some(Self::Float64),
            "char" => Some(Self::Char),
            _ => None,
        }
    }

    /// Canonical schema name, the one mixed into the checksum seed
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8_t",
            Self::Uint8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::Uint16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::Uint32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::Uint64 => "uint64_t",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Char => "char",
        }
    }

    /// Width of one element in bytes
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Char => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }

    /// Check if this kind is a signed integer
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Check if this kind is floating point
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Framing version spoken on a link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProtocolVersion {
    /// Primary framing: `0xFE` start marker, seeded checksum
    #[default]
    V1,
    /// Legacy framing: `0x55` start marker, unseeded checksum
    Legacy,
}

impl ProtocolVersion {
    /// Start-of-frame marker byte
    #[must_use]
    pub const fn start_marker(self) -> u8 {
        match self {
            Self::V1 => super::START_MARKER_V1,
            Self::Legacy => super::START_MARKER_LEGACY,
        }
    }

    /// Check if the checksum window ends with the message's seed byte
    #[must_use]
    pub const fn uses_seed(self) -> bool {
        matches!(self, Self::V1)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1.0"),
            Self::Legacy => write!(f, "v0.9"),
        }
    }
}
