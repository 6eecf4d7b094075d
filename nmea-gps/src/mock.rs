//! In-memory byte source and clock for tests

use core::cell::Cell;

use heapless::{Deque, Vec};
use nmea_traits::{ByteSource, Clock, SourceError};

pub const MOCK_BUFFER_SIZE: usize = 2048;

/// Byte source backed by in-memory buffers.
///
/// Received bytes are injected with [`MockSource::inject`], written bytes are
/// collected and available from [`MockSource::sent`]. A canned reply can be
/// queued so it only shows up after the next write, like a device answering
/// a command.
#[derive(Debug, Default)]
pub struct MockSource {
    rx: Deque<u8, MOCK_BUFFER_SIZE>,
    tx: Vec<u8, MOCK_BUFFER_SIZE>,
    reply: Vec<u8, 256>,
    chunk: Option<usize>,
    fail_reads: bool,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return at most `chunk` bytes per read
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk);
        self
    }

    pub fn inject(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.rx.push_back(b).is_err() {
                log::warn!("mock receive buffer full");
                return;
            }
        }
    }

    /// Queue bytes to be received after the next write
    pub fn reply_on_write(&mut self, bytes: &[u8]) {
        self.reply.clear();
        let _ = self.reply.extend_from_slice(bytes);
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    pub fn clear_sent(&mut self) {
        self.tx.clear();
    }
}

impl ByteSource for MockSource {
    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        if self.fail_reads {
            return Err(SourceError::ReadFailed);
        }
        let mut count = core::cmp::min(buf.len(), self.rx.len());
        if let Some(chunk) = self.chunk {
            count = core::cmp::min(count, chunk);
        }
        for slot in buf.iter_mut().take(count) {
            // count is bounded by rx.len()
            *slot = self.rx.pop_front().unwrap_or_default();
        }
        Ok(count)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SourceError> {
        self.tx
            .extend_from_slice(bytes)
            .map_err(|_| SourceError::WriteFailed)?;
        if !self.reply.is_empty() {
            let reply = core::mem::take(&mut self.reply);
            self.inject(&reply);
        }
        Ok(())
    }

    fn discard_input(&mut self) {
        self.rx.clear();
    }
}

/// Clock that only moves when told to, plus a fixed step on every reading
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
    step: u64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Cell::new(start),
            step: 0,
        }
    }

    /// Advance by `step` ms every time the clock is read
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_reads() {
        let mut source = MockSource::new().with_chunk(4);
        source.inject(b"Test Data");
        assert_eq!(source.available(), 9);

        let mut buf = [0u8; 16];
        assert_eq!(source.read(&mut buf), Ok(4));
        assert_eq!(&buf[..4], b"Test");
        assert_eq!(source.available(), 5);
    }

    #[test]
    fn test_reply_after_write() {
        let mut source = MockSource::new();
        source.reply_on_write(b"OK");
        assert_eq!(source.pending(), 0);

        source.write(b"GO").unwrap();
        assert_eq!(source.sent(), b"GO");
        assert_eq!(source.pending(), 2);

        source.discard_input();
        assert_eq!(source.pending(), 0);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100).with_step(10);
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.now_ms(), 110);
        clock.advance(1000);
        assert_eq!(clock.now_ms(), 1120);
    }
}
