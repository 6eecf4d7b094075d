use core::fmt;

/// Failure reported by a byte source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    ReadFailed,
    WriteFailed,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::ReadFailed => write!(f, "read from byte source failed"),
            SourceError::WriteFailed => write!(f, "write to byte source failed"),
        }
    }
}

/// A serial link to the receiver
pub trait ByteSource {
    /// Number of bytes that can be read right now without blocking
    fn available(&mut self) -> usize;

    /// Read up to `buf.len()` of the available bytes.
    /// Returns:
    /// * the number of bytes actually read, which may be less than requested or than `available()`
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), SourceError>;

    /// Drop everything received but not read yet
    fn discard_input(&mut self);
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        (**self).read(buf)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SourceError> {
        (**self).write(bytes)
    }

    fn discard_input(&mut self) {
        (**self).discard_input()
    }
}

/// Monotonic time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
