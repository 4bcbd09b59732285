use chrono::Weekday;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use tracing::warn;

use super::days::{abbreviation, day_index, parse_day, WEEK};
use super::encode::encode;
use crate::error::{Error, HoursResult};
use crate::utils::time::parse_time;

/// A time of day with minute precision, written as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Default opening time, 09:00
    pub const DEFAULT_OPEN: ClockTime = ClockTime { minutes: 9 * 60 };
    /// Default closing time, 17:00
    pub const DEFAULT_CLOSE: ClockTime = ClockTime { minutes: 17 * 60 };

    /// Build a time from hours and minutes, if both are in range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minutes % 60)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
            .and_then(|(hour, minute)| Self::from_hm(hour, minute))
            .ok_or_else(|| Error::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// One day's pickup hours
///
/// The times of a closed day are kept but carry no meaning, so two closed
/// days compare equal whatever their times.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DaySchedule {
    pub open: ClockTime,
    pub close: ClockTime,
    pub closed: bool,
}

impl DaySchedule {
    /// Open between the given times
    pub const fn open(open: ClockTime, close: ClockTime) -> Self {
        Self {
            open,
            close,
            closed: false,
        }
    }

    /// Closed all day, with the default times retained
    pub const fn closed() -> Self {
        Self {
            open: ClockTime::DEFAULT_OPEN,
            close: ClockTime::DEFAULT_CLOSE,
            closed: true,
        }
    }

    /// Key under which days with identical hours are grouped when encoding
    pub fn group_key(&self) -> String {
        if self.closed {
            super::CLOSED_LABEL.to_string()
        } else {
            format!("{}{}{}", self.open, super::days::EN_DASH, self.close)
        }
    }
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self::open(ClockTime::DEFAULT_OPEN, ClockTime::DEFAULT_CLOSE)
    }
}

impl PartialEq for DaySchedule {
    fn eq(&self, other: &Self) -> bool {
        match (self.closed, other.closed) {
            (true, true) => true,
            (false, false) => self.open == other.open && self.close == other.close,
            _ => false,
        }
    }
}

impl Eq for DaySchedule {}

/// Pickup hours for a whole week, Monday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [DaySchedule; 7],
}

impl WeekSchedule {
    /// Build a schedule from a function of the weekday
    pub fn from_fn(f: impl FnMut(Weekday) -> DaySchedule) -> Self {
        Self { days: WEEK.map(f) }
    }

    /// Days and their hours in Mon→Sun order
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> + '_ {
        WEEK.iter().copied().zip(self.days.iter())
    }

    /// Replace one day's hours
    pub fn set_day(&mut self, day: Weekday, hours: DaySchedule) {
        self[day] = hours;
    }

    /// Change the opening time of one day
    pub fn set_open(&mut self, day: Weekday, open: ClockTime) {
        self[day].open = open;
    }

    /// Change the closing time of one day
    pub fn set_close(&mut self, day: Weekday, close: ClockTime) {
        self[day].close = close;
    }

    /// Mark one day as closed or open again
    pub fn set_closed(&mut self, day: Weekday, closed: bool) {
        self[day].closed = closed;
    }

    /// Copy one day's hours onto every day of the week
    pub fn apply_to_all(&mut self, source: Weekday) {
        let hours = self[source];
        self.days = [hours; 7];
    }

    /// Check that every open day closes after it opens
    pub fn validate(&self) -> HoursResult<()> {
        for (day, hours) in self.iter() {
            if !hours.closed && hours.close <= hours.open {
                return Err(Error::InvalidHours {
                    day,
                    open: hours.open,
                    close: hours.close,
                });
            }
        }
        Ok(())
    }
}

impl Index<Weekday> for WeekSchedule {
    type Output = DaySchedule;

    fn index(&self, day: Weekday) -> &Self::Output {
        &self.days[day_index(day)]
    }
}

impl IndexMut<Weekday> for WeekSchedule {
    fn index_mut(&mut self, day: Weekday) -> &mut Self::Output {
        &mut self.days[day_index(day)]
    }
}

impl fmt::Display for WeekSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self, &[] as &[&str]))
    }
}

// Serialized as a map keyed by day abbreviation, the same shape the
// structured record uses.
impl Serialize for WeekSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, hours) in self.iter() {
            map.serialize_entry(abbreviation(day), hours)?;
        }
        map.end()
    }
}

/// A week of pickup hours together with its holiday labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PickupHours {
    #[serde(rename = "hours")]
    pub schedule: WeekSchedule,
    pub holidays: Vec<String>,
}

impl PickupHours {
    pub fn new(schedule: WeekSchedule, holidays: Vec<String>) -> Self {
        Self { schedule, holidays }
    }
}

impl fmt::Display for PickupHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.schedule, &self.holidays))
    }
}

/// One day in the structured record; every field is optional
///
/// A field of the wrong type is treated as missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct DayRecord {
    /// Opening time, HH:MM (default 09:00)
    #[serde(default, deserialize_with = "lenient")]
    pub open: Option<String>,
    /// Closing time, HH:MM (default 17:00)
    #[serde(default, deserialize_with = "lenient")]
    pub close: Option<String>,
    /// Whether the day is closed (default false)
    #[serde(default, deserialize_with = "lenient")]
    pub closed: Option<bool>,
}

/// Structured form of the pickup hours, as previously saved
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct HoursRecord {
    /// Hours keyed by day name (`Mon` or `Monday`); unlisted days get the defaults
    #[serde(deserialize_with = "lenient_days")]
    pub hours: BTreeMap<String, DayRecord>,
    /// Holiday labels; blank entries are dropped
    #[serde(default, deserialize_with = "lenient_labels")]
    pub holidays: Vec<String>,
}

/// Deserialize an optional field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Ignoring malformed field {} in pickup hours: {}", value, e);
            Ok(None)
        }
    }
}

/// Deserialize the day map, a day that is not an object taking full defaults
fn lenient_days<'de, D>(deserializer: D) -> Result<BTreeMap<String, DayRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let record = match DayRecord::deserialize(&value) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Using default hours for {}: {}", name, e);
                    DayRecord::default()
                }
            };
            (name, record)
        })
        .collect())
}

/// Deserialize holiday labels, keeping only the strings
fn lenient_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(label) => Some(label),
                Value::Null => None,
                other => {
                    warn!("Ignoring holiday label that is not text: {}", other);
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!("Ignoring holidays that are not a list: {}", other);
            Vec::new()
        }
    };
    Ok(labels)
}

/// Parse an optional time field, falling back to the default on absence or error
fn record_time(day: &str, field: &str, value: Option<&str>, default: ClockTime) -> ClockTime {
    match value.map(str::parse::<ClockTime>) {
        Some(Ok(time)) => time,
        Some(Err(e)) => {
            warn!("Using default {} time for {}: {}", field, day, e);
            default
        }
        None => default,
    }
}

/// Hours of one named day, each missing or unreadable field taking its default
fn day_from_record(name: &str, record: &DayRecord) -> DaySchedule {
    DaySchedule {
        open: record_time(name, "open", record.open.as_deref(), ClockTime::DEFAULT_OPEN),
        close: record_time(name, "close", record.close.as_deref(), ClockTime::DEFAULT_CLOSE),
        closed: record.closed.unwrap_or(false),
    }
}

impl From<HoursRecord> for PickupHours {
    fn from(record: HoursRecord) -> Self {
        let mut schedule = WeekSchedule::default();
        for (name, day_record) in &record.hours {
            match parse_day(name) {
                Some(day) => schedule[day] = day_from_record(name, day_record),
                None => warn!("Ignoring unknown day in pickup hours: {}", name),
            }
        }

        let holidays = record
            .holidays
            .into_iter()
            .filter(|label| !label.trim().is_empty())
            .collect();

        Self { schedule, holidays }
    }
}

impl From<&PickupHours> for HoursRecord {
    fn from(hours: &PickupHours) -> Self {
        let days = hours
            .schedule
            .iter()
            .map(|(day, schedule)| {
                (
                    abbreviation(day).to_string(),
                    DayRecord {
                        open: Some(schedule.open.to_string()),
                        close: Some(schedule.close.to_string()),
                        closed: Some(schedule.closed),
                    },
                )
            })
            .collect();

        Self {
            hours: days,
            holidays: hours.holidays.clone(),
        }
    }
}
