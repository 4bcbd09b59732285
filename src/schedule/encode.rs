use chrono::Weekday;
use tracing::debug;

use super::days::compress_days;
use super::models::WeekSchedule;
use super::HOLIDAYS_LABEL;

/// Encode a week of pickup hours and its holidays into the display string
///
/// Days sharing the same hours are grouped, in the order their hours first
/// appear from Monday on, e.g. `Mon–Fri 09:00–17:00, Sat–Sun Closed`.
/// Blank holiday labels are dropped; the rest follow in a final
/// `Holidays: ...` clause.
pub fn encode<S: AsRef<str>>(schedule: &WeekSchedule, holidays: &[S]) -> String {
    let mut groups: Vec<(String, Vec<Weekday>)> = Vec::new();
    for (day, hours) in schedule.iter() {
        let key = hours.group_key();
        match groups.iter_mut().find(|(group_key, _)| *group_key == key) {
            Some((_, days)) => days.push(day),
            None => groups.push((key, vec![day])),
        }
    }

    let mut clauses: Vec<String> = groups
        .into_iter()
        .map(|(key, days)| format!("{} {}", compress_days(days), key))
        .collect();

    let holidays: Vec<&str> = holidays
        .iter()
        .map(AsRef::as_ref)
        .filter(|label| !label.trim().is_empty())
        .collect();
    if !holidays.is_empty() {
        clauses.push(format!("{} {}", HOLIDAYS_LABEL, holidays.join(", ")));
    }

    debug!("Encoded pickup hours into {} clauses", clauses.len());
    clauses.join(", ")
}
