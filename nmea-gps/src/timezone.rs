use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Offset that applies from `switch_at` on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneRule<'a> {
    /// UTC, seconds since the epoch
    pub switch_at: i64,
    /// seconds east of UTC
    pub offset: i32,
    pub label: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime<'a> {
    pub datetime: NaiveDateTime,
    /// seconds added to UTC
    pub offset: i32,
    /// label of the rule that was applied, None if no rule matched
    pub label: Option<&'a str>,
}

/// Build a UTC calendar time from NMEA `DDMMYY` and whole-second `HHMMSS`.
/// Two digit years are taken to be 20YY.
pub fn utc_datetime(date: u32, time: u32) -> Option<NaiveDateTime> {
    let day = date / 10_000;
    let month = (date / 100) % 100;
    let year = 2000 + (date % 100) as i32;

    let hour = time / 10_000;
    let minute = (time / 100) % 100;
    let second = time % 100;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Apply the offset of the first rule whose switch time lies strictly before `utc`.
///
/// Rules are checked in the order given and the scan stops at the first
/// match, so a table meant to pick the most recent rule must be sorted
/// newest first.
pub fn localize<'a>(utc: NaiveDateTime, rules: &[TimezoneRule<'a>]) -> Option<LocalTime<'a>> {
    let timestamp = utc.and_utc().timestamp();

    match rules.iter().find(|rule| rule.switch_at < timestamp) {
        Some(rule) => Some(LocalTime {
            datetime: utc.checked_add_signed(Duration::seconds(i64::from(rule.offset)))?,
            offset: rule.offset,
            label: Some(rule.label),
        }),
        None => Some(LocalTime {
            datetime: utc,
            offset: 0,
            label: None,
        }),
    }
}
