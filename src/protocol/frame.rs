//! Wire frames
//!
//! ```text
//! +-------+-----+-----+-----+------+-------+-------------+-----------+
//! | start | len | seq | sys | comp | msgid | payload ... | crc (LE)  |
//! |   1   |  1  |  1  |  1  |  1   |   1   |     len     |     2     |
//! +-------+-----+-----+-----+------+-------+-------------+-----------+
//! ```
//!
//! The checksum covers `len` through the end of the payload. The primary
//! framing version then folds in the message's seed byte, which is never
//! transmitted.

use bytes::{BufMut, Bytes, BytesMut};

use super::checksum::X25;
use super::{
    CHECKSUM_SIZE, Error, FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD_SIZE, ProtocolVersion, Result,
};

/// Header fields of an outgoing frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sequence number
    pub sequence: u8,
    /// Source system id
    pub system_id: u8,
    /// Source component id
    pub component_id: u8,
    /// Message id
    pub message_id: u8,
}

/// A complete wire message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    version: ProtocolVersion,
    header: FrameHeader,
    payload: Bytes,
    checksum: u16,
    raw: Bytes,
}

impl Frame {
    /// Assemble a frame around a payload, computing its checksum
    pub fn assemble(
        version: ProtocolVersion,
        header: FrameHeader,
        payload: &[u8],
        seed: u8,
    ) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(payload.len() + FRAME_OVERHEAD);
        buf.put_u8(version.start_marker());
        // bounded by MAX_PAYLOAD_SIZE above
        buf.put_u8(payload.len() as u8);
        buf.put_u8(header.sequence);
        buf.put_u8(header.system_id);
        buf.put_u8(header.component_id);
        buf.put_u8(header.message_id);
        buf.put_slice(payload);
        let checksum = frame_checksum(version, &buf[1..], seed);
        buf.put_u16_le(checksum);

        let raw = buf.freeze();
        Ok(Self {
            version,
            header,
            payload: raw.slice(HEADER_SIZE..HEADER_SIZE + payload.len()),
            checksum,
            raw,
        })
    }

    /// Parse a complete frame from bytes.
    ///
    /// Checks the start marker and length only. The checksum needs the
    /// message's seed and is checked by [`Frame::verify`].
    pub fn from_bytes(version: ProtocolVersion, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(Error::BufferTooSmall {
                needed: FRAME_OVERHEAD,
                got: bytes.len(),
            });
        }
        if bytes[0] != version.start_marker() {
            return Err(Error::InvalidStartByte { found: bytes[0] });
        }

        let payload_len = usize::from(bytes[1]);
        let total = payload_len + FRAME_OVERHEAD;
        if bytes.len() < total {
            return Err(Error::BufferTooSmall {
                needed: total,
                got: bytes.len(),
            });
        }

        let raw = Bytes::copy_from_slice(&bytes[..total]);
        let checksum_offset = HEADER_SIZE + payload_len;
        let checksum = u16::from_le_bytes([raw[checksum_offset], raw[checksum_offset + 1]]);
        Ok(Self {
            version,
            header: FrameHeader {
                sequence: raw[2],
                system_id: raw[3],
                component_id: raw[4],
                message_id: raw[5],
            },
            payload: raw.slice(HEADER_SIZE..checksum_offset),
            checksum,
            raw,
        })
    }

    /// Check the carried checksum against the one computed with `seed`
    pub fn verify(&self, seed: u8) -> Result<()> {
        let expected = self.compute_checksum(seed);
        if expected == self.checksum {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                expected,
                found: self.checksum,
            })
        }
    }

    /// Checksum over this frame's window with the given seed
    #[must_use]
    pub fn compute_checksum(&self, seed: u8) -> u16 {
        let end = self.raw.len() - CHECKSUM_SIZE;
        frame_checksum(self.version, &self.raw[1..end], seed)
    }

    /// Framing version
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Header fields
    #[must_use]
    pub const fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Declared payload length
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.header.sequence
    }

    /// Source system id
    #[must_use]
    pub const fn system_id(&self) -> u8 {
        self.header.system_id
    }

    /// Source component id
    #[must_use]
    pub const fn component_id(&self) -> u8 {
        self.header.component_id
    }

    /// Message id
    #[must_use]
    pub const fn message_id(&self) -> u8 {
        self.header.message_id
    }

    /// Payload bytes
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Checksum carried by the frame
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The whole frame as sent on the wire
    #[must_use]
    pub fn as_bytes(&self) -> &Bytes {
        &self.raw
    }
}

/// Checksum over a frame window (`len` through end of payload)
#[must_use]
pub fn frame_checksum(version: ProtocolVersion, window: &[u8], seed: u8) -> u16 {
    let mut crc = X25::new();
    crc.accumulate_slice(window);
    if version.uses_seed() {
        crc.accumulate(seed);
    }
    crc.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Widely published heartbeat capture: custom_mode 0, quadrotor,
    // ArduPilot, base_mode 0x51, active, protocol version 3.
    const HEARTBEAT: [u8; 17] = [
        0xFE, 0x09, 0x4E, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x51, 0x04, 0x03,
        0x1C, 0x7F,
    ];

    fn heartbeat_header() -> FrameHeader {
        FrameHeader {
            sequence: 0x4E,
            system_id: 1,
            component_id: 1,
            message_id: 0,
        }
    }

    #[test]
    fn test_assemble_matches_known_capture() {
        let frame = Frame::assemble(
            ProtocolVersion::V1,
            heartbeat_header(),
            &HEARTBEAT[6..15],
            50,
        )
        .unwrap();

        assert_eq!(frame.as_bytes().as_ref(), &HEARTBEAT);
        assert_eq!(frame.checksum(), 0x7F1C);
    }

    #[test]
    fn test_from_bytes() {
        let frame = Frame::from_bytes(ProtocolVersion::V1, &HEARTBEAT).unwrap();

        assert_eq!(frame.payload_len(), 9);
        assert_eq!(frame.sequence(), 0x4E);
        assert_eq!(frame.system_id(), 1);
        assert_eq!(frame.component_id(), 1);
        assert_eq!(frame.message_id(), 0);
        assert_eq!(frame.payload().as_ref(), &HEARTBEAT[6..15]);
        assert!(frame.verify(50).is_ok());
        assert!(matches!(
            frame.verify(51),
            Err(Error::ChecksumMismatch { found: 0x7F1C, .. })
        ));
    }

    #[test]
    fn test_from_bytes_rejects_wrong_marker() {
        let result = Frame::from_bytes(ProtocolVersion::Legacy, &HEARTBEAT);
        assert_eq!(result, Err(Error::InvalidStartByte { found: 0xFE }));
    }

    #[test]
    fn test_from_bytes_truncated() {
        let result = Frame::from_bytes(ProtocolVersion::V1, &HEARTBEAT[..12]);
        assert_eq!(
            result,
            Err(Error::BufferTooSmall {
                needed: 17,
                got: 12
            })
        );
    }

    #[test]
    fn test_legacy_ignores_seed() {
        let frame = Frame::assemble(
            ProtocolVersion::Legacy,
            heartbeat_header(),
            &HEARTBEAT[6..15],
            50,
        )
        .unwrap();

        assert_eq!(frame.as_bytes()[0], 0x55);
        assert!(frame.verify(0).is_ok());
        assert!(frame.verify(200).is_ok());
    }

    #[test]
    fn test_payload_too_large() {
        let result = Frame::assemble(ProtocolVersion::V1, heartbeat_header(), &[0u8; 256], 0);
        assert!(matches!(result, Err(Error::PayloadTooLarge { .. })));
    }
}
