use heapless::Vec;
use nmea_traits::ByteSource;

use crate::consts::{CR, DEFAULT_BUFFER_SIZE, LF, START};

/// One raw line, from `$` up to (not including) the line terminator
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<const N: usize = DEFAULT_BUFFER_SIZE> {
    pub bytes: Vec<u8, N>,
    /// When the first byte of the sentence was read (ms)
    pub received: u64,
}

impl<const N: usize> Frame<N> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Splits the incoming byte stream into sentences.
///
/// Bytes are read into a fixed buffer. Everything before the first unread
/// line feed belongs to the sentence being returned, everything after it is
/// moved to the front of the buffer and scanned on the next poll.
pub struct FrameExtractor<const N: usize = DEFAULT_BUFFER_SIZE> {
    buf: [u8; N],
    // first unused byte
    next: usize,
    // first byte not looked at yet
    scanned: usize,
    // last `$` seen in the current sentence
    begin: usize,
    started: u64,
    read_at: u64,
    debug: bool,
}

impl<const N: usize> Default for FrameExtractor<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameExtractor<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            next: 0,
            scanned: 0,
            begin: 0,
            started: 0,
            read_at: 0,
            debug: false,
        }
    }

    /// Log dropped bytes
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes held for the sentence in progress
    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    pub fn buffered(&self) -> &[u8] {
        &self.buf[..self.next]
    }

    /// When the first byte of the sentence in progress was read
    pub fn started(&self) -> u64 {
        self.started
    }

    pub fn clear(&mut self) {
        self.next = 0;
        self.scanned = 0;
        self.begin = 0;
    }

    /// Pull whatever the source has ready and return the next complete line, if any.
    ///
    /// Never blocks. A line already sitting in the buffer is returned without reading.
    pub fn poll<S: ByteSource>(&mut self, source: &mut S, now: u64) -> Option<Frame<N>> {
        if let Some(frame) = self.scan() {
            return Some(frame);
        }

        let available = source.available();
        if available == 0 {
            return None;
        }

        let end = core::cmp::min(self.next.saturating_add(available), N);
        let count = match source.read(&mut self.buf[self.next..end]) {
            Ok(count) => core::cmp::min(count, end - self.next),
            Err(e) => {
                log::warn!("GPS read failed: {}", e);
                return None;
            }
        };
        if count == 0 {
            return None;
        }
        self.next += count;
        // all bytes of one read share a timestamp
        self.read_at = now;

        let frame = self.scan();
        if frame.is_none() {
            self.settle();
        }
        frame
    }

    fn scan(&mut self) -> Option<Frame<N>> {
        while self.scanned < self.next {
            let index = self.scanned;
            self.scanned += 1;
            match self.buf[index] {
                START => {
                    self.begin = index;
                    self.started = self.read_at;
                }
                LF => return Some(self.take(index)),
                _ => (),
            }
        }
        None
    }

    /// Cut the line ending at `lf` out of the buffer
    fn take(&mut self, lf: usize) -> Frame<N> {
        let mut end = lf;
        if end > self.begin && self.buf[end - 1] == CR {
            end -= 1;
        }

        let mut bytes = Vec::new();
        // cannot fail, the line is a slice of an N byte buffer
        let _ = bytes.extend_from_slice(&self.buf[self.begin..end]);
        let frame = Frame {
            bytes,
            received: self.started,
        };

        self.buf.copy_within(lf + 1..self.next, 0);
        self.next -= lf + 1;
        self.scanned = 0;
        self.begin = 0;
        // the rest came in with the same read
        self.started = self.read_at;

        frame
    }

    /// No line end in the buffer: drop noise in front of the sentence and recover from overflow
    fn settle(&mut self) {
        if self.begin > 0 {
            if self.debug {
                log::debug!("- {}", printable(&self.buf[..self.begin]));
            }
            self.buf.copy_within(self.begin..self.next, 0);
            self.next -= self.begin;
            self.scanned = self.next;
            self.begin = 0;
        }

        if self.next == N {
            log::debug!("no line end in {} bytes, dropping partial sentence", N);
            self.clear();
        }
    }
}

pub(crate) fn printable(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("<binary>")
}
