//! Total conversions from raw NMEA field text.
//!
//! Nothing in here panics or returns an error: malformed input is simply absent.

use core::str::FromStr;

use crate::consts::FIELD_SIZE;

/// Field text as received, kept verbatim so fields can be compared textually
pub type Text = heapless::String<FIELD_SIZE>;

/// Copy a field out of a sentence. Empty, non-ASCII or oversized fields are absent.
pub fn text(field: &[u8]) -> Option<Text> {
    if field.is_empty() || !field.is_ascii() {
        return None;
    }
    let s = core::str::from_utf8(field).ok()?;
    let mut text = Text::new();
    text.push_str(s).ok()?;
    Some(text)
}

pub fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        // receivers send uppercase, but some hand typed test data does not
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

pub fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

/// Two uppercase hex digits
pub fn to_hex(byte: u8) -> [u8; 2] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    [DIGITS[(byte >> 4) as usize], DIGITS[(byte & 0x0f) as usize]]
}

pub fn parse<T: FromStr>(text: Option<&str>) -> Option<T> {
    text?.parse::<T>().ok()
}

pub fn parse_float(text: Option<&str>) -> Option<f64> {
    parse::<f64>(text).filter(|v| v.is_finite())
}

/// Convert `DDDMM.MMMM` plus a hemisphere letter into signed decimal degrees
pub fn coordinate(value: Option<&str>, hemisphere: Option<&str>) -> Option<f64> {
    let value = value?;
    // need at least the minutes digits to mean anything
    if value.len() < 3 {
        return None;
    }
    let raw = libm::fabs(parse_float(Some(value))?);
    let degrees = libm::floor(raw / 100.0);
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        Some("S") | Some("W") => Some(-decimal),
        _ => Some(decimal),
    }
}
