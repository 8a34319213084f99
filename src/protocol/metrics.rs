use std::sync::atomic::{AtomicU64, Ordering};

/// Per-link protocol counters, shared between a codec and its parser.
#[derive(Debug, Default)]
pub struct Metrics {
    frames_encoded: AtomicU64,
    frames_accepted: AtomicU64,
    frames_filtered: AtomicU64,
    checksum_failures: AtomicU64,
    decode_failures: AtomicU64,
    sequence_gaps: AtomicU64,
    frames_lost: AtomicU64,
    bytes_received: AtomicU64,
    bytes_discarded: AtomicU64,
}

/// Outcome of one received frame, for counting.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FrameOutcome {
    Accepted,
    Filtered,
    ChecksumFailed,
    DecodeFailed,
}

impl Metrics {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_encoded(&self) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_frame(&self, outcome: FrameOutcome) {
        let counter = match outcome {
            FrameOutcome::Accepted => &self.frames_accepted,
            FrameOutcome::Filtered => &self.frames_filtered,
            FrameOutcome::ChecksumFailed => &self.checksum_failures,
            FrameOutcome::DecodeFailed => &self.decode_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_gap(&self, missing: u8) {
        self.sequence_gaps.fetch_add(1, Ordering::Relaxed);
        self.frames_lost
            .fetch_add(u64::from(missing), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_bytes(&self, received: usize, discarded: usize) {
        self.bytes_received
            .fetch_add(received as u64, Ordering::Relaxed);
        self.bytes_discarded
            .fetch_add(discarded as u64, Ordering::Relaxed);
    }

    /// Read all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_accepted: self.frames_accepted.load(Ordering::Relaxed),
            frames_filtered: self.frames_filtered.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            sequence_gaps: self.sequence_gaps.load(Ordering::Relaxed),
            frames_lost: self.frames_lost.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of link counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Frames produced by the codec.
    pub frames_encoded: u64,
    /// Received frames that passed the checksum and the id filter.
    pub frames_accepted: u64,
    /// Received frames with a good checksum from another system/component.
    pub frames_filtered: u64,
    /// Received frames rejected by the checksum.
    pub checksum_failures: u64,
    /// Accepted frames whose payload could not be decoded.
    pub decode_failures: u64,
    /// Sequence gap events.
    pub sequence_gaps: u64,
    /// Sum of gap sizes.
    pub frames_lost: u64,
    /// Bytes fed to the parser.
    pub bytes_received: u64,
    /// Bytes dropped while hunting for a start marker.
    pub bytes_discarded: u64,
}

impl MetricsSnapshot {
    /// Fraction of received frames that failed the checksum.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn checksum_failure_rate(&self) -> Option<f64> {
        let total = self.frames_accepted + self.frames_filtered + self.checksum_failures;
        if total == 0 {
            return None;
        }
        Some(self.checksum_failures as f64 / total as f64)
    }
}
