use heapless::Vec;
use serde::Serialize;

use crate::consts::{DEFAULT_BUFFER_SIZE, GGA_TAG, MAX_MESSAGE_SIZE, RMC_TAG};
use crate::error::GpsError;
use crate::field::{self, Text};
use crate::sentence::Sentence;
use crate::timezone::{self, LocalTime, TimezoneRule};

/// Fix fields as last received, merged from GGA (position, time, quality)
/// and RMC (date, speed, heading).
///
/// Values are kept as text and only converted when asked for. The GGA time
/// is kept verbatim, up to the `N` bytes of a whole sentence, since RMC has
/// to match it exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixState<const N: usize = DEFAULT_BUFFER_SIZE> {
    // None until a GGA arrived, Some(empty) for an empty time field
    time: Option<Vec<u8, N>>,
    quality: Option<Text>,
    latitude: Option<Text>,
    north_south: Option<Text>,
    longitude: Option<Text>,
    east_west: Option<Text>,
    date: Option<Text>,
    speed: Option<Text>,
    heading: Option<Text>,
    complete: bool,
    received: u64,
}

/// Decoded copy of a [`FixState`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Fix {
    pub received: u64,
    pub quality: u8,
    /// DDMMYY
    pub date: u32,
    /// HHMMSS.sss, UTC
    pub time: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// knots
    pub speed: Option<f64>,
    /// degrees true
    pub heading: Option<f64>,
}

impl Fix {
    pub fn to_json(&self) -> Result<heapless::Vec<u8, MAX_MESSAGE_SIZE>, GpsError> {
        serde_json_core::to_vec(self).map_err(|_| GpsError::Encoding)
    }
}

impl FixState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<const N: usize> FixState<N> {
    /// Merge a validated sentence into the fix.
    /// Returns:
    /// * Some(()) if the sentence was a GGA or RMC and the state was updated, None otherwise
    pub fn apply(&mut self, sentence: &Sentence<'_>, received: u64) -> Option<()> {
        let text = |index| sentence.field(index).and_then(field::text);

        if sentence.is(GGA_TAG) {
            self.complete = false;
            self.time = sentence.field(1).and_then(|f| Vec::from_slice(f).ok());
            self.latitude = text(2);
            self.north_south = text(3);
            self.longitude = text(4);
            self.east_west = text(5);
            self.quality = text(6);
            self.received = received;
            Some(())
        } else if sentence.is(RMC_TAG) {
            self.speed = text(7);
            self.heading = text(8);
            self.date = text(9);
            // both halves must describe the same instant, compared as text
            self.complete = match (sentence.field(1), &self.time) {
                (Some(rmc_time), Some(gga_time)) => rmc_time == gga_time.as_slice(),
                _ => false,
            };
            Some(())
        } else {
            None
        }
    }

    /// Read and clear the completeness flag
    pub fn take_complete(&mut self) -> bool {
        core::mem::take(&mut self.complete)
    }

    /// Consume a complete fix.
    /// Returns:
    /// * Some(fix) once per matching GGA/RMC pair, None until the next pair completes
    pub fn take_fix(&mut self) -> Option<Fix> {
        if self.take_complete() {
            Some(self.snapshot())
        } else {
            None
        }
    }

    /// Peek at the completeness flag without clearing it
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn snapshot(&self) -> Fix {
        Fix {
            received: self.received,
            quality: self.fix(),
            date: self.date(),
            time: self.time(),
            latitude: self.latitude(),
            longitude: self.longitude(),
            speed: self.speed(),
            heading: self.heading(),
        }
    }

    /// Fix quality (0 = invalid, 1 = GPS, 2 = DGPS, ...); 0 if unknown
    pub fn fix(&self) -> u8 {
        field::parse(self.quality.as_deref()).unwrap_or(0)
    }

    pub fn has_fix(&self) -> bool {
        self.fix() != 0
    }

    /// DDMMYY, 0 if unknown
    pub fn date(&self) -> u32 {
        field::parse(self.date.as_deref()).unwrap_or(0)
    }

    /// HHMMSS.sss, 0.0 if unknown
    pub fn time(&self) -> f64 {
        field::parse_float(self.time_text()).unwrap_or(0.0)
    }

    pub fn speed(&self) -> Option<f64> {
        field::parse_float(self.speed.as_deref())
    }

    pub fn heading(&self) -> Option<f64> {
        field::parse_float(self.heading.as_deref())
    }

    pub fn latitude(&self) -> Option<f64> {
        field::coordinate(self.latitude.as_deref(), self.north_south.as_deref())
    }

    pub fn longitude(&self) -> Option<f64> {
        field::coordinate(self.longitude.as_deref(), self.east_west.as_deref())
    }

    fn time_text(&self) -> Option<&str> {
        self.time
            .as_ref()
            .and_then(|t| core::str::from_utf8(t).ok())
    }

    /// Arrival time of the last GGA (ms)
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Local calendar time of the fix, corrected by the first matching timezone rule
    pub fn datetime<'a>(&self, rules: &[TimezoneRule<'a>]) -> Option<LocalTime<'a>> {
        let date: u32 = field::parse(self.date.as_deref())?;
        let time = field::parse_float(self.time_text())?;
        // whole seconds only
        let utc = timezone::utc_datetime(date, libm::floor(time) as u32)?;
        timezone::localize(utc, rules)
    }
}
