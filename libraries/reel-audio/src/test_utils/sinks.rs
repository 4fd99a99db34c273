//! Instrumented sinks for tests

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::sink::ByteSink;

/// Byte sink collecting everything written to it
///
/// Clones share the same buffer, so a test can keep a handle while the
/// pipeline owns and eventually closes the sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the bytes written so far
    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().unwrap().clone()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSink for MemorySink {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Byte sink that starts failing after a number of successful writes
///
/// Used to verify that stages stay consistent when the downstream sink
/// reports I/O errors mid-stream.
#[derive(Debug)]
pub struct FailingSink {
    remaining: usize,
    accepted: usize,
}

impl FailingSink {
    /// Accept `successful_writes` calls, then fail every write
    pub fn new(successful_writes: usize) -> Self {
        Self {
            remaining: successful_writes,
            accepted: 0,
        }
    }

    /// Number of write calls that succeeded
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl ByteSink for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        if self.remaining == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink failed").into());
        }
        self.remaining -= 1;
        self.accepted += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
