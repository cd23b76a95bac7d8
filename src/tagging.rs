//! Derives the hour, lateness tag and weekday of an arrival.
//!
//! All derivation happens in a [`LocalZone`]: either the host's local zone or
//! a fixed offset from configuration. The same zone is used for parsing naive
//! timestamps coming from the UI, so a time typed into the form is tagged with
//! exactly the hour the user typed.

use crate::models::{ArrivalTags, DayOfWeek, TimeTag};
use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn local_datetime(&self, timestamp: DateTime<Utc>) -> NaiveDateTime {
        match self {
            LocalZone::System => timestamp.with_timezone(&Local).naive_local(),
            LocalZone::Fixed(offset) => timestamp.with_timezone(offset).naive_local(),
        }
    }

    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(timestamp).date()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// Resolves a wall-clock time in this zone. Ambiguous times (DST fold)
    /// resolve to the earlier instant; times in a DST gap do not resolve.
    pub fn to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            LocalZone::System => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            LocalZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Start of the local calendar day as a UTC instant.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.to_utc(date.and_hms_opt(0, 0, 0)?)
    }
}

pub fn time_tag_for_hour(hour: u32) -> TimeTag {
    match hour {
        20..=21 => TimeTag::Fast,
        22..=23 => TimeTag::Late,
        _ => TimeTag::VeryLate,
    }
}

pub fn tag_timestamp(timestamp: DateTime<Utc>, zone: LocalZone) -> ArrivalTags {
    let local = zone.local_datetime(timestamp);
    let hour = local.hour();
    ArrivalTags {
        arrival_time: hour,
        time_tag: time_tag_for_hour(hour),
        day_of_week: DayOfWeek::from(local.weekday()),
    }
}

/// Parses a timestamp supplied by a client. Accepts RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM[:SS]` read as wall-clock time in `zone`.
pub fn parse_timestamp(input: &str, zone: LocalZone) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| zone.to_utc(naive))
}

/// Like [`parse_timestamp`], but also accepts a bare `YYYY-MM-DD` as local
/// midnight. Used for list range filters.
pub fn parse_range_bound(input: &str, zone: LocalZone) -> Option<DateTime<Utc>> {
    parse_timestamp(input, zone).or_else(|| {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|date| zone.start_of_day(date))
    })
}

/// Parses `Z`, `UTC` or `±HH[:MM]`.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn ist() -> LocalZone {
        LocalZone::Fixed(parse_utc_offset("+05:30").unwrap())
    }

    #[test]
    fn tag_boundaries_cover_every_hour() {
        for hour in 0..24 {
            let expected = if (20..22).contains(&hour) {
                TimeTag::Fast
            } else if (22..24).contains(&hour) {
                TimeTag::Late
            } else {
                TimeTag::VeryLate
            };
            assert_eq!(time_tag_for_hour(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn wednesday_evening_is_fast() {
        let ts = parse_timestamp("2025-01-15T21:30:00Z", utc()).unwrap();
        let tags = tag_timestamp(ts, utc());
        assert_eq!(tags.arrival_time, 21);
        assert_eq!(tags.time_tag, TimeTag::Fast);
        assert_eq!(tags.day_of_week, DayOfWeek::Wednesday);
    }

    #[test]
    fn tags_follow_the_configured_zone() {
        // 16:00 UTC is 21:30 in IST.
        let ts = parse_timestamp("2025-01-15T16:00:00Z", ist()).unwrap();
        let tags = tag_timestamp(ts, ist());
        assert_eq!(tags.arrival_time, 21);
        assert_eq!(tags.time_tag, TimeTag::Fast);

        // 20:00 UTC Tuesday is 01:30 Wednesday in IST.
        let ts = parse_timestamp("2025-01-14T20:00:00Z", ist()).unwrap();
        let tags = tag_timestamp(ts, ist());
        assert_eq!(tags.arrival_time, 1);
        assert_eq!(tags.time_tag, TimeTag::VeryLate);
        assert_eq!(tags.day_of_week, DayOfWeek::Wednesday);
    }

    #[test]
    fn naive_input_is_read_as_local_time() {
        let ts = parse_timestamp("2025-01-15T23:10", ist()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-15T17:40:00+00:00");
        let tags = tag_timestamp(ts, ist());
        assert_eq!(tags.arrival_time, 23);
        assert_eq!(tags.time_tag, TimeTag::Late);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("not a date", utc()).is_none());
        assert!(parse_timestamp("2025-13-40T10:00:00Z", utc()).is_none());
        assert!(parse_timestamp("", utc()).is_none());
    }

    #[test]
    fn range_bound_accepts_bare_dates() {
        let bound = parse_range_bound("2025-01-15", ist()).unwrap();
        assert_eq!(bound.to_rfc3339(), "2025-01-14T18:30:00+00:00");
        assert!(parse_range_bound("2025/01/15", ist()).is_none());
    }

    #[test]
    fn offset_parsing() {
        assert_eq!(parse_utc_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_utc_offset("+05:30"), FixedOffset::east_opt(19_800));
        assert_eq!(parse_utc_offset("-08"), FixedOffset::west_opt(28_800));
        assert_eq!(parse_utc_offset("+24:00"), None);
        assert_eq!(parse_utc_offset("05:30"), None);
        assert_eq!(parse_utc_offset("+-5"), None);
    }
}
