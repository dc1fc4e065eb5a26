use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::feed::Match;

/// All feed times are local to this fixed reference offset (UTC+7).
pub const FEED_UTC_OFFSET: &str = "+07:00";

/// Assumed match length when the duration field is missing or garbage.
pub const DEFAULT_DURATION_HOURS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Live,
    Upcoming,
    Past,
}

impl MatchStatus {
    /// Sort weight: live ranks above upcoming. Past never reaches a sort
    /// because normalization drops it first.
    pub fn priority(self) -> u8 {
        match self {
            MatchStatus::Live => 1,
            MatchStatus::Upcoming => 2,
            MatchStatus::Past => 3,
        }
    }

    pub fn is_live(self) -> bool {
        self == MatchStatus::Live
    }
}

/// A raw feed field that may carry the manual "live" sentinel instead of a
/// date, time or duration value. Parsed once here so call sites never do
/// their own string comparisons against the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideField<'a> {
    Live,
    Value(&'a str),
}

impl<'a> OverrideField<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.trim().eq_ignore_ascii_case("live") {
            OverrideField::Live
        } else {
            OverrideField::Value(raw)
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, OverrideField::Live)
    }
}

/// Combine a feed date/time pair with the fixed offset. Returns None for
/// anything that is not a clean `YYYY-MM-DD` + `HH:MM` pair, including the
/// override sentinel and empty strings.
fn parse_instant(date: &str, time: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&format!("{date}T{time}:00{FEED_UTC_OFFSET}")).ok()
}

/// Kickoff instant used for classification and sorting: the authoritative
/// match_date/match_time pair, falling back to kickoff_date/kickoff_time.
pub fn kickoff_instant(m: &Match) -> Option<DateTime<FixedOffset>> {
    parse_instant(&m.match_date, &m.match_time)
        .or_else(|| parse_instant(&m.kickoff_date, &m.kickoff_time))
}

/// Countdown target: the authoritative pair only, no fallback. A match
/// whose match_date/match_time cannot be parsed gets no countdown and the
/// player shows a static "time not available" state instead.
pub fn countdown_target(m: &Match) -> Option<DateTime<Utc>> {
    parse_instant(&m.match_date, &m.match_time).map(|t| t.with_timezone(&Utc))
}

/// Duration in hours, defaulting when absent, unparsable or non-positive.
pub fn duration_hours(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(hours) if hours > 0.0 => hours,
        _ => DEFAULT_DURATION_HOURS,
    }
}

/// Classify a match against the given wall-clock instant.
///
/// The manual override has highest precedence: the "live" sentinel in any
/// of the five eligible fields forces Live before any date arithmetic.
/// A match with no parsable kickoff instant is Upcoming, never Past.
pub fn classify_at(m: &Match, now: DateTime<Utc>) -> MatchStatus {
    let override_eligible = [
        &m.kickoff_date,
        &m.match_date,
        &m.kickoff_time,
        &m.match_time,
        &m.duration,
    ];
    if override_eligible
        .iter()
        .any(|f| OverrideField::parse(f).is_live())
    {
        return MatchStatus::Live;
    }

    let kickoff = match kickoff_instant(m) {
        Some(instant) => instant.with_timezone(&Utc),
        None => return MatchStatus::Upcoming,
    };

    let millis = (duration_hours(&m.duration) * 3_600_000.0) as i64;
    let end = kickoff + Duration::milliseconds(millis);

    if now < kickoff {
        MatchStatus::Upcoming
    } else if now <= end {
        MatchStatus::Live
    } else {
        MatchStatus::Past
    }
}

/// Convenience wrapper reading the wall clock once.
pub fn classify(m: &Match) -> MatchStatus {
    classify_at(m, Utc::now())
}
