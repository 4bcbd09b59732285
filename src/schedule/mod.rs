//! Weekly pickup hours and their compact display form.
//!
//! A [`WeekSchedule`] is encoded into a string such as
//! `Mon–Fri 09:00–17:00, Sat–Sun Closed, Holidays: Jan 1` and decoded back
//! from that string or from a structured [`HoursRecord`].

pub mod days;
mod decode;
mod encode;
pub mod models;

pub use days::{compress_days, expand_range};
pub use decode::{decode, decode_hours, ScheduleInput};
pub use encode::encode;
pub use models::{ClockTime, DayRecord, DaySchedule, HoursRecord, PickupHours, WeekSchedule};

/// Hours label of a closed group of days
pub const CLOSED_LABEL: &str = "Closed";

/// Prefix of the trailing holidays clause
pub const HOLIDAYS_LABEL: &str = "Holidays:";
