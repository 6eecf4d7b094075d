#![no_std]

//! Incremental NMEA 0183 parser for serial GPS receivers.
//!
//! Bytes flow from a [`nmea_traits::ByteSource`] through the [`frame`]
//! extractor and the [`sentence`] validator into a [`fix::FixState`] that
//! merges GGA and RMC sentences into one fix. [`Gps`] ties these together
//! and also sends PMTK commands, optionally waiting for the acknowledgment.

pub mod command;
mod consts;
mod error;
pub mod field;
pub mod fix;
pub mod frame;
mod gps;
pub mod pmtk;
pub mod sentence;
pub mod timezone;

#[cfg(feature = "embassy")]
mod clock;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use command::{Ack, AckResult, AckWait};
pub use consts::*;
pub use error::GpsError;
pub use fix::{Fix, FixState};
pub use frame::{Frame, FrameExtractor};
pub use gps::{Config, Gps};
pub use sentence::Sentence;
pub use timezone::{LocalTime, TimezoneRule};

#[cfg(feature = "embassy")]
pub use clock::EmbassyClock;

pub use nmea_traits::{ByteSource, Clock, SourceError};
