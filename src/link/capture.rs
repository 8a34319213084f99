use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Thread-safe telemetry log writer.
///
/// Each record is an 8-byte big-endian microsecond UNIX timestamp followed
/// by one raw frame.
#[derive(Clone)]
pub struct TlogRecorder {
    inner: Arc<Mutex<TlogWriter>>,
}

impl TlogRecorder {
    /// Create a recorder that writes to the provided path, truncating any existing file.
    pub fn create(path: &Path) -> io::Result<Self> {
        let writer = TlogWriter::new(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(writer)),
        })
    }

    /// Record a frame with the current system timestamp.
    pub fn record(&self, frame: &[u8]) -> io::Result<()> {
        self.record_at(SystemTime::now(), frame)
    }

    /// Record a frame with an explicit timestamp.
    pub fn record_at(&self, timestamp: SystemTime, frame: &[u8]) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("tlog recorder poisoned"))?;
        guard.write_record(timestamp, frame)
    }
}

impl std::fmt::Debug for TlogRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlogRecorder").finish_non_exhaustive()
    }
}

struct TlogWriter {
    file: BufWriter<File>,
}

impl TlogWriter {
    fn new(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    fn write_record(&mut self, timestamp: SystemTime, frame: &[u8]) -> io::Result<()> {
        self.file.write_all(&micros(timestamp).to_be_bytes())?;
        self.file.write_all(frame)?;
        self.file.flush()
    }
}

fn micros(timestamp: SystemTime) -> u64 {
    let duration = timestamp.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
