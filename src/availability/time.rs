//! Time-of-day arithmetic on minutes since midnight

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::AvailabilityError;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

static HH_MM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid HH:MM pattern"));

/// A wall-clock time of day with minute precision (00:00 to 23:59)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Build from minutes since midnight; `None` outside `0..1440`
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        if (0..MINUTES_PER_DAY).contains(&minutes) {
            Some(Self(minutes as u16))
        } else {
            None
        }
    }

    /// Parse a strict `HH:MM` string
    pub fn parse(value: &str) -> Result<Self, AvailabilityError> {
        let caps = HH_MM
            .captures(value)
            .ok_or_else(|| AvailabilityError::InvalidTimeFormat(value.to_string()))?;
        let hour: u32 = caps[1].parse().map_err(|_| AvailabilityError::InvalidTimeFormat(value.to_string()))?;
        let minute: u32 = caps[2].parse().map_err(|_| AvailabilityError::InvalidTimeFormat(value.to_string()))?;
        Self::from_hm(hour, minute).ok_or_else(|| AvailabilityError::InvalidTimeFormat(value.to_string()))
    }

    pub fn minutes(self) -> i64 {
        i64::from(self.0)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    /// Add minutes, staying within the same day
    pub fn add_minutes(self, minutes: i64) -> Option<Self> {
        Self::from_minutes(self.minutes() + minutes)
    }

    pub fn to_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::MIN + chrono::Duration::minutes(self.minutes())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Half-open interval `[start, end)` in minutes relative to a local midnight.
///
/// Bounds are signed and unbounded by the day length so that padded
/// bookings may reach into the previous or next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn from_times(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self::new(start.minutes(), end.minutes())
    }

    /// Interval starting at `start` lasting `duration` minutes
    pub fn starting_at(start: i64, duration: i64) -> Self {
        Self::new(start, start + duration)
    }

    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        has_overlap(*self, *other)
    }

    /// True when `other` lies entirely within this interval
    pub fn contains(&self, other: &Interval) -> bool {
        !other.is_empty() && self.start <= other.start && other.end <= self.end
    }

    pub fn padded(&self, before: i64, after: i64) -> Interval {
        Interval::new(self.start - before, self.end + after)
    }

    /// Remove `cut` from this interval, leaving zero, one or two pieces
    pub fn subtract(&self, cut: &Interval) -> Vec<Interval> {
        if !self.overlaps(cut) {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        }
        let mut pieces = Vec::with_capacity(2);
        if self.start < cut.start {
            pieces.push(Interval::new(self.start, cut.start));
        }
        if cut.end < self.end {
            pieces.push(Interval::new(cut.end, self.end));
        }
        pieces
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", format_minutes(self.start), format_minutes(self.end))
    }
}

/// Half-open overlap test; zero-length intervals never overlap anything
pub fn has_overlap(a: Interval, b: Interval) -> bool {
    !a.is_empty() && !b.is_empty() && a.start < b.end && b.start < a.end
}

/// Render minutes relative to midnight, marking values outside the day with a day offset
pub fn format_minutes(minutes: i64) -> String {
    let days = minutes.div_euclid(MINUTES_PER_DAY);
    let within = minutes.rem_euclid(MINUTES_PER_DAY);
    let clock = format!("{:02}:{:02}", within / 60, within % 60);
    match days {
        0 => clock,
        d if d > 0 => format!("{}+{}d", clock, d),
        d => format!("{}{}d", clock, d),
    }
}
