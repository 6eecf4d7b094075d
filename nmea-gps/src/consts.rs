pub const DEFAULT_BUFFER_SIZE: usize = 100;

// longest field we keep: "4807.03800", "123519.000", ...
pub const FIELD_SIZE: usize = 16;
pub const MAX_FIELDS: usize = 32;

pub const MAX_COMMAND_SIZE: usize = 128;
pub const MAX_MESSAGE_SIZE: usize = 512;

pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 3_000;

pub const START: u8 = b'$';
pub const CHECKSUM_MARK: u8 = b'*';
pub const FIELD_SEPARATOR: u8 = b',';
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

pub const GGA_TAG: &str = "GPGGA";
pub const RMC_TAG: &str = "GPRMC";
pub const ACK_TAG: &str = "PMTK001";
