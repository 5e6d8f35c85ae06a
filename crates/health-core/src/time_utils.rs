use std::sync::OnceLock;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;

use crate::error::{HealthError, Result};

/// Timezone used when the user does not supply one.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Zone abbreviations that may trail a wall-clock timestamp, with their fixed
/// UTC offsets in hours.
const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
    ("AKST", -9),
    ("AKDT", -8),
    ("HST", -10),
];

/// Patterns that carry an explicit numeric UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M %z",
];

/// Wall-clock patterns without any zone information.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%b %d, %Y %H:%M",
    "%a %b %d %H:%M:%S %Y",
];

/// Date-only patterns; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// The result of reading a timestamp string, before any timezone policy is
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTimestamp {
    /// Unix epoch seconds; an instant with no wall-clock reading of its own.
    Epoch(DateTime<Utc>),
    /// A wall-clock reading with an explicit numeric offset or `Z`.
    Absolute(DateTime<FixedOffset>),
    /// A wall-clock reading followed by a known zone abbreviation.
    Abbreviated {
        naive: NaiveDateTime,
        abbreviation: String,
        offset: FixedOffset,
    },
    /// A bare wall-clock reading.
    Naive(NaiveDateTime),
}

/// Parse a timestamp in any of the supported representations.
///
/// Accepts RFC 3339 / ISO 8601 with or without offset, RFC 2822, a handful of
/// human-readable forms (`10/01/2023 6:30 PM`, `October 1, 2023 18:30`),
/// date-only strings, Unix epoch seconds, and any wall-clock form followed by
/// a zone abbreviation such as `PDT` or `UTC`. The abbreviation may follow a
/// space or sit directly against the last digit (`21:30:00PDT`).
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(dt) = parse_epoch(s) {
        return Some(ParsedTimestamp::Epoch(dt));
    }
    if let Some(dt) = parse_with_offset(s) {
        return Some(ParsedTimestamp::Absolute(dt));
    }

    if let Some(caps) = abbreviation_regex().captures(s) {
        let abbreviation = caps["abbr"].to_ascii_uppercase();
        if let Some(offset) = abbreviation_offset(&abbreviation) {
            if let Some(naive) = parse_naive(&caps["body"]) {
                return Some(ParsedTimestamp::Abbreviated {
                    naive,
                    abbreviation,
                    offset,
                });
            }
        }
    }

    if let Some(naive) = parse_naive(s) {
        return Some(ParsedTimestamp::Naive(naive));
    }

    debug!("could not parse timestamp \"{}\"", raw);
    None
}

fn abbreviation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<body>.*(?:\d|\S\s))\s*(?P<abbr>[A-Za-z]{1,4})$").expect("regex is valid"))
}

fn epoch_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{9,11}(\.\d+)?$").expect("regex is valid"))
}

fn abbreviation_offset(abbreviation: &str) -> Option<FixedOffset> {
    ZONE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == abbreviation)
        .and_then(|(_, hours)| FixedOffset::east_opt(hours * 3600))
}

/// Unix epoch seconds, integer or fractional.
fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if !epoch_regex().is_match(s) {
        return None;
    }
    let f: f64 = s.parse().ok()?;
    let secs = f.trunc() as i64;
    let nanos = (f.fract() * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(secs, nanos)
}

fn parse_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    // Replace trailing 'Z' with '+00:00' so the strftime patterns can see it.
    let normalised = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(stripped) if stripped.ends_with(|c: char| c.is_ascii_digit()) => {
            format!("{}+00:00", stripped)
        }
        _ => s.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalised, fmt).ok())
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(naive);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Resolves parsed timestamps against one configured IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneHandler {
    tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// An unrecognised name is a configuration error; there is no fallback.
    pub fn new(tz_name: &str) -> Result<Self> {
        tz_name
            .trim()
            .parse::<Tz>()
            .map(Self::from_tz)
            .map_err(|_| HealthError::InvalidTimezone(tz_name.to_string()))
    }

    pub fn from_tz(tz: Tz) -> Self {
        Self { tz }
    }

    /// Expose the configured timezone.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Parse a timestamp whose source contract is UTC.
    ///
    /// Explicit offsets and known abbreviations are honoured; a bare
    /// wall-clock reading is taken as UTC, never as local time.
    pub fn parse_utc(&self, raw: &str) -> Option<DateTime<Utc>> {
        match parse_timestamp(raw)? {
            ParsedTimestamp::Epoch(dt) => Some(dt),
            ParsedTimestamp::Absolute(dt) => Some(dt.with_timezone(&Utc)),
            ParsedTimestamp::Abbreviated { naive, offset, .. } => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            ParsedTimestamp::Naive(naive) => Some(Utc.from_utc_datetime(&naive)),
        }
    }

    /// Parse a timestamp whose source contract is local wall-clock time.
    ///
    /// The literal wall-clock reading is kept and the configured zone is
    /// attached using that date's rules; any trailing abbreviation, `Z` or
    /// numeric offset is discarded. Unix epoch seconds carry no wall clock,
    /// so they are projected into the configured zone instead.
    pub fn parse_local(&self, raw: &str) -> Option<DateTime<Tz>> {
        match parse_timestamp(raw)? {
            ParsedTimestamp::Epoch(dt) => Some(self.to_local(dt)),
            ParsedTimestamp::Absolute(dt) => self.localize(&dt.naive_local()),
            ParsedTimestamp::Abbreviated { naive, .. } | ParsedTimestamp::Naive(naive) => {
                self.localize(&naive)
            }
        }
    }

    /// Attach the configured zone to a wall-clock reading.
    ///
    /// A reading repeated by a fall-back transition resolves to its first
    /// occurrence. A reading skipped by a spring-forward transition is
    /// interpreted with the offset in effect just before the gap, so it lands
    /// on the equivalent instant after the clocks change.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.tz.from_local_datetime(naive) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => {
                debug!("ambiguous local time {} in {}, using earliest", naive, self.tz);
                Some(earliest)
            }
            LocalResult::None => {
                let before = self
                    .tz
                    .from_local_datetime(&(*naive - Duration::hours(3)))
                    .earliest()?;
                let offset = before.offset().fix();
                let utc = *naive - Duration::seconds(i64::from(offset.local_minus_utc()));
                debug!("non-existent local time {} in {}, shifting forward", naive, self.tz);
                Some(Utc.from_utc_datetime(&utc).with_timezone(&self.tz))
            }
        }
    }

    /// Project a UTC instant into the configured zone.
    pub fn to_local(&self, dt: DateTime<Utc>) -> DateTime<Tz> {
        dt.with_timezone(&self.tz)
    }
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self::from_tz(Tz::America__Los_Angeles)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn la() -> TimezoneHandler {
        TimezoneHandler::new("America/Los_Angeles").unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // ── TimezoneHandler::new ─────────────────────────────────────────────────

    #[test]
    fn test_new_accepts_iana_names() {
        for name in ["America/New_York", "Europe/London", "UTC", "Asia/Tokyo"] {
            assert!(TimezoneHandler::new(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_new_rejects_unknown_names() {
        for name in ["Mars/Olympus", "", "not-a-timezone"] {
            assert!(TimezoneHandler::new(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_new_invalid_timezone_is_an_error() {
        let err = TimezoneHandler::new("Invalid/Timezone").unwrap_err();
        assert!(matches!(err, HealthError::InvalidTimezone(ref name) if name == "Invalid/Timezone"));
    }

    #[test]
    fn test_default_is_los_angeles() {
        assert_eq!(TimezoneHandler::default().tz(), Tz::America__Los_Angeles);
        assert_eq!(la(), TimezoneHandler::default());
        assert_eq!(DEFAULT_TIMEZONE, "America/Los_Angeles");
    }

    // ── parse_timestamp ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_timestamp_empty_and_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2023-13-45 25:00:00").is_none());
    }

    #[test]
    fn test_parse_timestamp_z_suffix_is_absolute() {
        let parsed = parse_timestamp("2023-10-01T06:30:00Z").unwrap();
        let ParsedTimestamp::Absolute(dt) = parsed else {
            panic!("expected absolute, got {:?}", parsed);
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 6);
    }

    #[test]
    fn test_parse_timestamp_space_separated_offset() {
        let parsed = parse_timestamp("2023-10-01 06:30:00+02:00").unwrap();
        assert!(matches!(parsed, ParsedTimestamp::Absolute(_)));
    }

    #[test]
    fn test_parse_timestamp_abbreviation() {
        match parse_timestamp("2023-10-02 21:30:00 PDT").unwrap() {
            ParsedTimestamp::Abbreviated {
                naive: n,
                abbreviation,
                offset,
            } => {
                assert_eq!(n, naive(2023, 10, 2, 21, 30));
                assert_eq!(abbreviation, "PDT");
                assert_eq!(offset.local_minus_utc(), -7 * 3600);
            }
            other => panic!("expected abbreviated, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_timestamp_abbreviation_without_space() {
        match parse_timestamp("2023-10-02 21:30:00PDT").unwrap() {
            ParsedTimestamp::Abbreviated {
                naive: n,
                abbreviation,
                ..
            } => {
                assert_eq!(n, naive(2023, 10, 2, 21, 30));
                assert_eq!(abbreviation, "PDT");
            }
            other => panic!("expected abbreviated, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_timestamp_human_readable_with_abbreviation() {
        match parse_timestamp("Oct 1, 2023 6:30 PM PDT").unwrap() {
            ParsedTimestamp::Abbreviated {
                naive: n,
                abbreviation,
                ..
            } => {
                assert_eq!(n, naive(2023, 10, 1, 18, 30));
                assert_eq!(abbreviation, "PDT");
            }
            other => panic!("expected abbreviated, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_timestamp_unknown_trailing_letters_are_not_an_abbreviation() {
        assert!(parse_timestamp("2023-10-02 21:30:00 XYZ").is_none());
    }

    #[test]
    fn test_parse_timestamp_twelve_hour_clock_is_not_an_abbreviation() {
        let parsed = parse_timestamp("10/01/2023 6:30 PM").unwrap();
        assert_eq!(parsed, ParsedTimestamp::Naive(naive(2023, 10, 1, 18, 30)));
    }

    #[test]
    fn test_parse_timestamp_human_readable_forms() {
        assert_eq!(
            parse_timestamp("October 1, 2023 18:30").unwrap(),
            ParsedTimestamp::Naive(naive(2023, 10, 1, 18, 30))
        );
        assert_eq!(
            parse_timestamp("2023-10-01 15:00").unwrap(),
            ParsedTimestamp::Naive(naive(2023, 10, 1, 15, 0))
        );
        assert_eq!(
            parse_timestamp("2023-10-01").unwrap(),
            ParsedTimestamp::Naive(naive(2023, 10, 1, 0, 0))
        );
        assert_eq!(
            parse_timestamp("Oct 1, 2023 18:30").unwrap(),
            ParsedTimestamp::Naive(naive(2023, 10, 1, 18, 30))
        );
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let ParsedTimestamp::Absolute(dt) = parse_timestamp("2023-10-01T06:30:00.123Z").unwrap() else {
            panic!("expected absolute");
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (6, 30, 0));
        assert_eq!(dt.nanosecond(), 123_000_000);

        let ParsedTimestamp::Naive(n) = parse_timestamp("2023-10-01T06:30:00.5").unwrap() else {
            panic!("expected naive");
        };
        assert_eq!(n, naive(2023, 10, 1, 6, 30) + Duration::milliseconds(500));
    }

    #[test]
    fn test_parse_timestamp_rfc2822() {
        let parsed = parse_timestamp("Sun, 01 Oct 2023 06:30:00 +0000").unwrap();
        assert!(matches!(parsed, ParsedTimestamp::Absolute(_)));
    }

    #[test]
    fn test_parse_timestamp_epoch_seconds() {
        let ParsedTimestamp::Epoch(dt) = parse_timestamp("1696141800").unwrap() else {
            panic!("expected epoch");
        };
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap());
    }

    // ── parse_utc ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_utc_returns_utc_instant() {
        let dt = la().parse_utc("2023-10-01T06:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-10-01T06:30:00+00:00");
    }

    #[test]
    fn test_parse_utc_converts_offsets() {
        let dt = la().parse_utc("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_utc_bare_time_is_utc_not_local() {
        let dt = la().parse_utc("2023-10-01 06:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_utc_honours_abbreviation() {
        let dt = la().parse_utc("2023-10-01 06:30:00 PDT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 10, 1, 13, 30, 0).unwrap());
    }

    // ── parse_local ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_local_with_abbreviation_keeps_wall_clock() {
        let dt = la().parse_local("2023-10-02 21:30:00 PDT").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 10, 2));
        assert_eq!((dt.hour(), dt.minute()), (21, 30));
        assert_eq!(dt.timezone(), Tz::America__Los_Angeles);
    }

    #[test]
    fn test_parse_local_mismatched_abbreviation_is_discarded() {
        // PST in October is wrong for Los Angeles; the configured zone wins.
        let dt = la().parse_local("2023-10-02 21:30:00 PST").unwrap();
        assert_eq!(dt.hour(), 21);
        assert_eq!(dt.offset().fix().local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn test_parse_local_without_abbreviation() {
        let dt = la().parse_local("2023-10-02 22:00:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (22, 0));
        assert_eq!(dt.timezone(), Tz::America__Los_Angeles);
    }

    #[test]
    fn test_parse_local_applies_winter_offset() {
        let dt = la().parse_local("2023-12-01 08:00:00").unwrap();
        assert_eq!(dt.with_timezone(&Utc).hour(), 16);
    }

    #[test]
    fn test_parse_local_discards_explicit_offset() {
        let dt = la().parse_local("2023-10-02T12:00:00Z").unwrap();
        assert_eq!((dt.day(), dt.hour()), (2, 12));
        assert_eq!(dt.timezone(), Tz::America__Los_Angeles);

        let dt = la().parse_local("2023-10-02T12:00:00+02:00").unwrap();
        assert_eq!((dt.day(), dt.hour()), (2, 12));
        assert_eq!(dt.with_timezone(&Utc).hour(), 19);
    }

    #[test]
    fn test_parse_local_projects_epoch_seconds() {
        let dt = la().parse_local("1696141800").unwrap();
        assert_eq!(dt.with_timezone(&Utc), Utc.with_ymd_and_hms(2023, 10, 1, 6, 30, 0).unwrap());
        assert_eq!((dt.day(), dt.hour()), (30, 23));
    }

    // ── localize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_localize_fall_back_uses_first_occurrence() {
        // 01:30 happens twice on 2023-11-05 in Los Angeles.
        let dt = la().localize(&naive(2023, 11, 5, 1, 30)).unwrap();
        assert_eq!(dt.offset().fix().local_minus_utc(), -7 * 3600);
        assert_eq!(dt.with_timezone(&Utc), Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_localize_spring_forward_gap_shifts_forward() {
        // 02:30 does not exist on 2023-03-12 in Los Angeles.
        let dt = la().localize(&naive(2023, 3, 12, 2, 30)).unwrap();
        assert_eq!(dt.with_timezone(&Utc), Utc.with_ymd_and_hms(2023, 3, 12, 10, 30, 0).unwrap());
        assert_eq!((dt.hour(), dt.minute()), (3, 30));
    }

    // ── to_local ─────────────────────────────────────────────────────────────

    #[test]
    fn test_to_local_uses_historical_rules() {
        let handler = la();
        let summer = handler.to_local(Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap());
        let winter = handler.to_local(Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(summer.hour(), 5);
        assert_eq!(winter.hour(), 4);
    }
}
