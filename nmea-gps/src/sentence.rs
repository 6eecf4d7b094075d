use heapless::Vec;

use crate::consts::{CHECKSUM_MARK, FIELD_SEPARATOR, MAX_FIELDS, START};
use crate::field;

// "$X*00" plus at least two payload bytes
const MIN_SENTENCE_LEN: usize = 7;

/// XOR of all bytes, the NMEA 0183 checksum
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, b| acc ^ b)
}

/// A sentence that passed framing and checksum validation, split into fields.
/// Field 0 is the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence<'a> {
    fields: Vec<&'a [u8], MAX_FIELDS>,
}

impl<'a> Sentence<'a> {
    /// Check framing and checksum of `$<payload>*<CS>` (line terminator already removed).
    /// Returns:
    /// * Some(sentence) if the sentence is well formed
    /// * None otherwise; nothing about the input is kept
    pub fn validate(raw: &'a [u8]) -> Option<Self> {
        if Self::is_valid(raw) {
            Some(Self::split(raw))
        } else {
            None
        }
    }

    /// Framing and checksum check only, without splitting into fields
    pub fn is_valid(raw: &[u8]) -> bool {
        if raw.len() < MIN_SENTENCE_LEN || raw[0] != START {
            return false;
        }
        let mark = raw.len() - 3;
        if raw[mark] != CHECKSUM_MARK {
            return false;
        }
        match field::hex_byte(raw[mark + 1], raw[mark + 2]) {
            Some(expected) => checksum(&raw[1..mark]) ^ expected == 0,
            None => false,
        }
    }

    /// Split a sentence that already passed [`Sentence::is_valid`]
    pub(crate) fn split(raw: &'a [u8]) -> Self {
        let payload = &raw[1..raw.len() - 3];
        let mut fields = Vec::new();
        for f in payload.split(|&b| b == FIELD_SEPARATOR) {
            if fields.push(f).is_err() {
                log::debug!("sentence has more than {} fields, ignoring the rest", MAX_FIELDS);
                break;
            }
        }
        Self { fields }
    }

    pub fn tag(&self) -> &'a [u8] {
        self.fields.first().copied().unwrap_or_default()
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag() == tag.as_bytes()
    }

    pub fn field(&self, index: usize) -> Option<&'a [u8]> {
        self.fields.get(index).copied()
    }

    pub fn fields(&self) -> &[&'a [u8]] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::frame_command;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

    #[test]
    fn test_valid_sentence() {
        let sentence = Sentence::validate(GGA).expect("valid GGA");
        assert!(sentence.is("GPGGA"));
        assert_eq!(sentence.len(), 15);
        assert_eq!(sentence.field(1), Some(&b"123519"[..]));
        assert_eq!(sentence.field(6), Some(&b"1"[..]));
        assert_eq!(sentence.field(13), Some(&b""[..]));
        assert_eq!(sentence.field(15), None);
    }

    #[test]
    fn test_rejections() {
        // too short
        assert!(Sentence::validate(b"$A*41").is_none());
        // no start marker
        assert!(Sentence::validate(&GGA[1..]).is_none());
        // no checksum marker
        assert!(Sentence::validate(b"$GPGGA,123519,4807.038").is_none());
        // checksum is not hex
        assert!(Sentence::validate(b"$GPGSV,3,1*ZZ").is_none());
        // wrong checksum
        let mut bad: Vec<u8, 80> = Vec::from_slice(GGA).unwrap();
        let last = bad.len() - 1;
        bad[last] = b'8';
        assert!(Sentence::validate(&bad).is_none());
    }

    #[test]
    fn test_lowercase_checksum() {
        assert!(Sentence::validate(b"$PMTK220,1000*1f").is_some());
    }

    #[test]
    fn test_checksum_round_trip() {
        let payloads: [&[u8]; 5] = [
            b"GPGSV,3,1,11,03,03,111,00",
            b"PMTK220,1000",
            b"GPRMC,,V,,,,,,,,,,N",
            b"XYZ",
            b"\x01\x7f~ ,,;",
        ];
        for payload in payloads {
            let framed = frame_command(payload).unwrap();
            // CRLF is removed by the frame extractor
            let raw = &framed[..framed.len() - 2];
            let sentence = Sentence::validate(raw).expect("framed payload validates");
            assert_eq!(sentence.fields()[0], payload.split(|&b| b == b',').next().unwrap());

            // flipping any single payload bit must break it
            for i in 1..=payload.len() {
                for bit in 0..8 {
                    let mut flipped: Vec<u8, 64> = Vec::from_slice(raw).unwrap();
                    flipped[i] ^= 1 << bit;
                    assert!(
                        Sentence::validate(&flipped).is_none(),
                        "bit {} of byte {} flipped",
                        bit,
                        i
                    );
                }
            }
        }
    }

    #[test]
    fn test_short_payloads_cannot_be_framed() {
        // "$X*58" would be too short to validate
        assert_eq!(frame_command(b"X"), Err(crate::error::GpsError::InvalidCommand));
        assert!(!Sentence::is_valid(b"$X*58"));
    }

    #[test]
    fn test_is_valid() {
        assert!(Sentence::is_valid(GGA));
        assert!(!Sentence::is_valid(&GGA[1..]));
        assert!(!Sentence::is_valid(b"$GPGSV,3,1*ZZ"));
        let sentence = Sentence::split(GGA);
        assert_eq!(Some(sentence), Sentence::validate(GGA));
    }

    #[test]
    fn test_too_many_fields() {
        let framed = frame_command(b"GPXXX,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,").unwrap();
        let sentence = Sentence::validate(&framed[..framed.len() - 2]).unwrap();
        assert_eq!(sentence.len(), MAX_FIELDS);
        assert!(sentence.is("GPXXX"));
    }
}
