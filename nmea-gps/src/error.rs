use core::fmt;

use nmea_traits::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsError {
    /// The byte source refused a write
    Source(SourceError),
    /// Empty command, reserved characters in the payload, or too long to frame
    InvalidCommand,
    /// No acknowledgment before the deadline
    Timeout,
    /// The caller raised the cancellation flag while waiting
    Cancelled,
    /// The fix did not fit the message buffer
    Encoding,
}

impl From<SourceError> for GpsError {
    fn from(e: SourceError) -> Self {
        GpsError::Source(e)
    }
}

impl fmt::Display for GpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsError::Source(e) => write!(f, "byte source error: {}", e),
            GpsError::InvalidCommand => write!(f, "invalid command payload"),
            GpsError::Timeout => write!(f, "timed out waiting for acknowledgment"),
            GpsError::Cancelled => write!(f, "cancelled while waiting for acknowledgment"),
            GpsError::Encoding => write!(f, "failed to encode fix"),
        }
    }
}
