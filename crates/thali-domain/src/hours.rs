//! Weekly opening hours structures

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Day of the week, serialized lowercase to match the output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// All days, Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Get the day as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Parse a day from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monday" => Some(Weekday::Monday),
            "tuesday" => Some(Weekday::Tuesday),
            "wednesday" => Some(Weekday::Wednesday),
            "thursday" => Some(Weekday::Thursday),
            "friday" => Some(Weekday::Friday),
            "saturday" => Some(Weekday::Saturday),
            "sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time of day, serialized as "HH:MM" (24-hour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    /// Hour in [0, 23]
    pub hour: u8,
    /// Minute in [0, 59]
    pub minute: u8,
}

impl TimeOfDay {
    /// Create a time of day, rejecting out-of-range components
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Parse "HH:MM" (or "H:MM") 24-hour format
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.split_once(':')?;
        if !(1..=2).contains(&h.len()) || m.len() != 2 {
            return None;
        }
        let hour: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        Self::new(hour, minute)
    }

    /// Minutes since midnight
    pub fn minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {}", s)))
    }
}

/// One open/close segment within a day
///
/// Segments may wrap past midnight (open 22:00, close 02:00). A segment is
/// valid when its duration is positive and at most 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HoursSegment {
    /// Opening time
    pub open: TimeOfDay,
    /// Closing time (may be on the next day)
    pub close: TimeOfDay,
}

impl HoursSegment {
    /// Duration in minutes, treating a close before open as next-day
    pub fn duration_minutes(&self) -> u16 {
        let open = self.open.minutes();
        let mut close = self.close.minutes();
        if close < open {
            close += 24 * 60;
        }
        close - open
    }

    /// Whether the segment spans a positive, at most 24-hour window
    pub fn is_valid(&self) -> bool {
        let d = self.duration_minutes();
        d > 0 && d <= 24 * 60
    }
}

/// Weekly opening hours: day -> list of open/close segments
///
/// A day that is absent or has an empty list is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHours {
    days: BTreeMap<Weekday, Vec<HoursSegment>>,
}

impl WeeklyHours {
    /// Create an empty (all-closed) week
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments for a day (empty slice when closed)
    pub fn day(&self, day: Weekday) -> &[HoursSegment] {
        self.days.get(&day).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Replace the segments for a day
    pub fn set_day(&mut self, day: Weekday, segments: Vec<HoursSegment>) {
        self.days.insert(day, segments);
    }

    /// Whether every day is closed
    pub fn is_empty(&self) -> bool {
        self.days.values().all(|v| v.is_empty())
    }

    /// Iterate over (day, segments) pairs that have at least one segment
    pub fn open_days(&self) -> impl Iterator<Item = (Weekday, &[HoursSegment])> {
        self.days
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(d, v)| (*d, v.as_slice()))
    }
}
