use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;

use crate::consts::{
    ACK_TAG, CHECKSUM_MARK, CR, DEFAULT_ACK_TIMEOUT_MS, LF, MAX_COMMAND_SIZE, START,
};
use crate::error::GpsError;
use crate::field;
use crate::sentence::{checksum, Sentence};

// anything shorter would not pass sentence validation
const MIN_PAYLOAD_LEN: usize = 3;

/// Frame a payload as `$<payload>*<CS>\r\n`
pub fn frame_command(payload: &[u8]) -> Result<Vec<u8, MAX_COMMAND_SIZE>, GpsError> {
    if payload.len() < MIN_PAYLOAD_LEN
        || payload
            .iter()
            .any(|&b| matches!(b, START | CHECKSUM_MARK | CR | LF))
    {
        return Err(GpsError::InvalidCommand);
    }

    let mut command = Vec::new();
    command.push(START).map_err(|_| GpsError::InvalidCommand)?;
    command
        .extend_from_slice(payload)
        .map_err(|_| GpsError::InvalidCommand)?;
    command.push(CHECKSUM_MARK).map_err(|_| GpsError::InvalidCommand)?;
    command
        .extend_from_slice(&field::to_hex(checksum(payload)))
        .map_err(|_| GpsError::InvalidCommand)?;
    command
        .extend_from_slice(&[CR, LF])
        .map_err(|_| GpsError::InvalidCommand)?;
    Ok(command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResult {
    Invalid,
    Unsupported,
    Failed,
    Succeeded,
    Unknown,
}

impl AckResult {
    pub fn from_flag(flag: Option<u8>) -> Self {
        match flag {
            Some(0) => AckResult::Invalid,
            Some(1) => AckResult::Unsupported,
            Some(2) => AckResult::Failed,
            Some(3) => AckResult::Succeeded,
            _ => AckResult::Unknown,
        }
    }
}

/// `PMTK001,<command>,<flag>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// 0 if the receiver did not say
    pub command: u16,
    pub result: AckResult,
}

impl Ack {
    pub fn from_sentence(sentence: &Sentence<'_>) -> Option<Self> {
        if !sentence.is(ACK_TAG) {
            return None;
        }
        let number = |index| {
            sentence
                .field(index)
                .and_then(|f| core::str::from_utf8(f).ok())
        };
        Some(Ack {
            command: field::parse(number(1)).unwrap_or(0),
            result: AckResult::from_flag(field::parse(number(2))),
        })
    }

    pub fn is_success(&self) -> bool {
        self.result == AckResult::Succeeded
    }
}

/// How long to wait for an acknowledgment, and how to give up early
#[derive(Debug, Clone, Copy)]
pub struct AckWait<'c> {
    pub timeout_ms: u64,
    pub cancel: Option<&'c AtomicBool>,
}

impl Default for AckWait<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_ACK_TIMEOUT_MS)
    }
}

impl<'c> AckWait<'c> {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            cancel: None,
        }
    }

    /// Stop waiting as soon as `flag` is set
    pub fn with_cancel(mut self, flag: &'c AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_command() {
        let command = frame_command(b"PMTK220,1000").unwrap();
        assert_eq!(&command[..], b"$PMTK220,1000*1F\r\n");

        let command = frame_command(b"PMTK101").unwrap();
        assert_eq!(&command[..], b"$PMTK101*32\r\n");
    }

    #[test]
    fn test_frame_command_rejects() {
        assert_eq!(frame_command(b""), Err(GpsError::InvalidCommand));
        assert_eq!(frame_command(b"X"), Err(GpsError::InvalidCommand));
        assert_eq!(frame_command(b"XY"), Err(GpsError::InvalidCommand));
        assert!(frame_command(b"XYZ").is_ok());
        assert_eq!(frame_command(b"PMTK220*1000"), Err(GpsError::InvalidCommand));
        assert_eq!(frame_command(b"$PMTK220"), Err(GpsError::InvalidCommand));
        assert_eq!(frame_command(b"PMTK220\r\n"), Err(GpsError::InvalidCommand));
        assert_eq!(
            frame_command(&[b'A'; MAX_COMMAND_SIZE]),
            Err(GpsError::InvalidCommand)
        );
    }

    #[test]
    fn test_ack() {
        let sentence = Sentence::validate(b"$PMTK001,220,3*30").unwrap();
        let ack = Ack::from_sentence(&sentence).unwrap();
        assert_eq!(ack.command, 220);
        assert!(ack.is_success());

        let sentence = Sentence::validate(b"$PMTK001,314,2*37").unwrap();
        let ack = Ack::from_sentence(&sentence).unwrap();
        assert_eq!(ack.result, AckResult::Failed);

        let sentence = Sentence::validate(b"$PMTK220,1000*1F").unwrap();
        assert_eq!(Ack::from_sentence(&sentence), None);
    }

    #[test]
    fn test_ack_result_flags() {
        assert_eq!(AckResult::from_flag(Some(0)), AckResult::Invalid);
        assert_eq!(AckResult::from_flag(Some(1)), AckResult::Unsupported);
        assert_eq!(AckResult::from_flag(Some(7)), AckResult::Unknown);
        assert_eq!(AckResult::from_flag(None), AckResult::Unknown);
    }

    #[test]
    fn test_cancel_flag() {
        let flag = AtomicBool::new(false);
        let wait = AckWait::new(100).with_cancel(&flag);
        assert!(!wait.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(wait.is_cancelled());
        assert!(!AckWait::default().is_cancelled());
    }
}
