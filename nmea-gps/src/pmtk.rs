//! Payloads for common PMTK receiver commands. Pass them to `Gps::send_command`.

use core::fmt::Write;

use crate::consts::MAX_COMMAND_SIZE;

pub type Payload = heapless::String<MAX_COMMAND_SIZE>;

/// Sentence output, in fixes per sentence (0 = off, 1 = every fix, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputRates {
    pub gll: u8,
    pub rmc: u8,
    pub vtg: u8,
    pub gga: u8,
    pub gsa: u8,
    pub gsv: u8,
}

impl OutputRates {
    /// Just what the fix accumulator needs
    pub const RMC_GGA: OutputRates = OutputRates {
        gll: 0,
        rmc: 1,
        vtg: 0,
        gga: 1,
        gsa: 0,
        gsv: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restart {
    Hot,
    Warm,
    Cold,
    FullCold,
}

/// PMTK220: fix interval
pub fn set_update_rate(interval_ms: u16) -> Payload {
    let mut payload = Payload::new();
    let _ = write!(payload, "PMTK220,{}", interval_ms);
    payload
}

/// PMTK251: serial baud rate, 0 restores the default
pub fn set_baud_rate(baud: u32) -> Payload {
    let mut payload = Payload::new();
    let _ = write!(payload, "PMTK251,{}", baud);
    payload
}

/// PMTK314: which sentences to output and how often
pub fn set_output(rates: OutputRates) -> Payload {
    let mut payload = Payload::new();
    let _ = write!(
        payload,
        "PMTK314,{},{},{},{},{},{}",
        rates.gll, rates.rmc, rates.vtg, rates.gga, rates.gsa, rates.gsv
    );
    // the remaining 13 sentence slots are not used
    for _ in 0..13 {
        let _ = payload.push_str(",0");
    }
    payload
}

/// PMTK314,-1: back to the receiver's default output
pub fn reset_output() -> Payload {
    let mut payload = Payload::new();
    let _ = payload.push_str("PMTK314,-1");
    payload
}

/// PMTK101 to PMTK104
pub fn restart(kind: Restart) -> Payload {
    let code = match kind {
        Restart::Hot => 101,
        Restart::Warm => 102,
        Restart::Cold => 103,
        Restart::FullCold => 104,
    };
    let mut payload = Payload::new();
    let _ = write!(payload, "PMTK{}", code);
    payload
}
