use chrono::Weekday;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::days::{expand_range, is_range_dash};
use super::models::{ClockTime, DaySchedule, HoursRecord, PickupHours, WeekSchedule};
use super::CLOSED_LABEL;

/// Input accepted by the decoder: the display string or a structured record
#[derive(Debug, Clone, Copy)]
pub enum ScheduleInput<'a> {
    Text(&'a str),
    Record(&'a Value),
}

impl<'a> From<&'a str> for ScheduleInput<'a> {
    fn from(text: &'a str) -> Self {
        ScheduleInput::Text(text)
    }
}

impl<'a> From<&'a String> for ScheduleInput<'a> {
    fn from(text: &'a String) -> Self {
        ScheduleInput::Text(text)
    }
}

impl<'a> From<&'a Value> for ScheduleInput<'a> {
    fn from(value: &'a Value) -> Self {
        ScheduleInput::Record(value)
    }
}

/// Decode pickup hours into a full week, never failing
///
/// Unrecognized input leaves the affected days at 09:00–17:00. In the display
/// string, days listed without hours (`Mon, Wed 10:00–12:00`) take the hours
/// of the clause that follows them.
pub fn decode<'a>(input: impl Into<ScheduleInput<'a>>) -> WeekSchedule {
    decode_hours(input).schedule
}

/// Decode pickup hours together with any holidays a structured record carries
///
/// Holidays are not restored from the display string.
pub fn decode_hours<'a>(input: impl Into<ScheduleInput<'a>>) -> PickupHours {
    let input = input.into();

    if let Some(record) = structured_record(input) {
        info!("Decoding pickup hours from structured record");
        return PickupHours::from(record);
    }

    let text = match input {
        ScheduleInput::Text(text) => text,
        ScheduleInput::Record(Value::String(text)) => text.as_str(),
        ScheduleInput::Record(other) => {
            warn!("Unrecognized pickup hours record, using defaults: {}", other);
            return PickupHours::default();
        }
    };

    info!("Decoding pickup hours from display string");
    PickupHours::new(decode_display(text), Vec::new())
}

/// Whether a value has the shape of a structured record
fn is_structured(value: &Value) -> bool {
    value.get("hours").is_some_and(Value::is_object)
}

/// The structured record carried by the input, if it has one
///
/// A JSON string is read the same way as text, so it may hold either form.
fn structured_record(input: ScheduleInput<'_>) -> Option<HoursRecord> {
    let text = match input {
        ScheduleInput::Record(Value::String(text)) => text.as_str(),
        ScheduleInput::Record(value) => return record_from_value(value),
        ScheduleInput::Text(text) => text,
    };

    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let parsed = serde_json::from_str::<Value>(trimmed).ok()?;
    record_from_value(&parsed)
}

/// Deserialize a value that has the shape of a structured record
fn record_from_value(value: &Value) -> Option<HoursRecord> {
    if !is_structured(value) {
        return None;
    }

    match HoursRecord::deserialize(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Malformed structured pickup hours, reading as text: {}", e);
            None
        }
    }
}

/// Decode the comma-separated display string
fn decode_display(text: &str) -> WeekSchedule {
    let mut schedule = WeekSchedule::default();

    // Days listed without hours take the hours of the next clause, so that
    // non-contiguous groups such as `Mon, Wed 10:00–12:00` survive the split
    let mut pending: Vec<Weekday> = Vec::new();

    for segment in text.split(',').map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        if segment.to_lowercase().contains("holiday") {
            debug!("Skipping holiday clause: {}", segment);
            pending.clear();
            continue;
        }

        match parse_clause(segment) {
            Some(Clause::Days(days)) => pending.extend(days),
            Some(Clause::Closed(days)) => {
                for day in pending.drain(..).chain(days) {
                    schedule[day] = DaySchedule::closed();
                }
            }
            Some(Clause::Open { days, open, close }) => {
                for day in pending.drain(..).chain(days) {
                    schedule[day] = DaySchedule::open(open, close);
                }
            }
            None => {
                debug!("Ignoring unrecognized clause: {}", segment);
                pending.clear();
            }
        }
    }

    if !pending.is_empty() {
        debug!("Ignoring {} trailing days without hours", pending.len());
    }
    schedule
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Time(ClockTime),
    Dash,
    Other,
}

/// A token and its byte span within the clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Split a clause into words, times and dashes
fn tokenize(segment: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = segment.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let mut end = start + c.len_utf8();
        let kind = if is_range_dash(c) {
            TokenKind::Dash
        } else if c.is_ascii_digit() {
            while let Some(&(i, next)) = chars.peek() {
                if !(next.is_ascii_digit() || next == ':') {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            match segment[start..end].parse::<ClockTime>() {
                Ok(time) => TokenKind::Time(time),
                Err(_) => TokenKind::Other,
            }
        } else if c.is_alphabetic() {
            while let Some(&(i, next)) = chars.peek() {
                if !next.is_alphabetic() {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            TokenKind::Word
        } else {
            TokenKind::Other
        };

        tokens.push(Token { kind, start, end });
    }

    tokens
}

/// One recognized clause of the display string
#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    /// `<days>` with no hours of its own
    Days(Vec<Weekday>),
    /// `<days> Closed`
    Closed(Vec<Weekday>),
    /// `<days> <open>–<close>`
    Open {
        days: Vec<Weekday>,
        open: ClockTime,
        close: ClockTime,
    },
}

/// Days named by a run of tokens, empty when they do not form a day range
fn day_range(segment: &str, tokens: &[Token]) -> Vec<Weekday> {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => expand_range(&segment[first.start..last.end]),
        _ => Vec::new(),
    }
}

fn parse_clause(segment: &str) -> Option<Clause> {
    let tokens = tokenize(segment);
    let is_closed_word = |token: &Token| {
        token.kind == TokenKind::Word && &segment[token.start..token.end] == CLOSED_LABEL
    };

    // `<days> Closed`, the word allowed on either side of the days
    let clause = if tokens.last().is_some_and(is_closed_word) {
        Clause::Closed(day_range(segment, &tokens[..tokens.len() - 1]))
    } else if tokens.first().is_some_and(is_closed_word) {
        Clause::Closed(day_range(segment, &tokens[1..]))
    } else {
        match tokens.as_slice() {
            [days @ .., open, dash, close] if !days.is_empty() && dash.kind == TokenKind::Dash => {
                match (open.kind, close.kind) {
                    (TokenKind::Time(open), TokenKind::Time(close)) => Clause::Open {
                        days: day_range(segment, days),
                        open,
                        close,
                    },
                    _ => Clause::Days(day_range(segment, &tokens)),
                }
            }
            _ => Clause::Days(day_range(segment, &tokens)),
        }
    };

    let days = match &clause {
        Clause::Days(days) | Clause::Closed(days) | Clause::Open { days, .. } => days,
    };
    if days.is_empty() {
        None
    } else {
        Some(clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday::*;
    use serde_json::json;

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_tokenize() {
        let segment = "Mon–Fri 9:00 - 17:30";
        let kinds: Vec<TokenKind> = tokenize(segment).into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Dash,
                TokenKind::Word,
                TokenKind::Time(time("09:00")),
                TokenKind::Dash,
                TokenKind::Time(time("17:30")),
            ]
        );

        let kinds: Vec<TokenKind> = tokenize("Mon 25:00").into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Word, TokenKind::Other]);
    }

    #[test]
    fn test_parse_clause() {
        assert_eq!(
            parse_clause("Mon–Wed 08:00–12:00"),
            Some(Clause::Open {
                days: vec![Mon, Tue, Wed],
                open: time("08:00"),
                close: time("12:00"),
            })
        );
        assert_eq!(
            parse_clause("Saturday-Sunday Closed"),
            Some(Clause::Closed(vec![Sat, Sun]))
        );
        assert_eq!(parse_clause("Closed Sun"), Some(Clause::Closed(vec![Sun])));
        assert_eq!(parse_clause("Thu"), Some(Clause::Days(vec![Thu])));

        assert_eq!(parse_clause("Closed"), None);
        assert_eq!(parse_clause("Mon closed"), None);
        assert_eq!(parse_clause("Mon 09:00"), None);
        assert_eq!(parse_clause("Funday 09:00–17:00"), None);
        assert_eq!(parse_clause("Mon Closed Wed"), None);
        assert_eq!(parse_clause("Dec 25"), None);
    }

    #[test]
    fn test_decode_display_string() {
        let week = decode("Mon–Fri 09:00–17:00, Sat–Sun Closed");
        for day in [Mon, Tue, Wed, Thu, Fri] {
            assert_eq!(week[day], DaySchedule::default());
        }
        assert!(week[Sat].closed);
        assert!(week[Sun].closed);
    }

    #[test]
    fn test_decode_hyphen_and_full_names() {
        let week = decode("Monday-Tuesday 08:30-16:00, Wed 10:00 – 14:00");
        assert_eq!(week[Mon], DaySchedule::open(time("08:30"), time("16:00")));
        assert_eq!(week[Tue], DaySchedule::open(time("08:30"), time("16:00")));
        assert_eq!(week[Wed], DaySchedule::open(time("10:00"), time("14:00")));
        assert_eq!(week[Thu], DaySchedule::default());
    }

    #[test]
    fn test_decode_closed_resets_times() {
        let week = decode("Sun Closed");
        assert!(week[Sun].closed);
        assert_eq!(week[Sun].open, ClockTime::DEFAULT_OPEN);
        assert_eq!(week[Sun].close, ClockTime::DEFAULT_CLOSE);
    }

    #[test]
    fn test_decode_skips_holidays() {
        let hours = decode_hours("Mon–Sun 10:00–16:00, Holidays: Jan 1, Dec 25");
        assert!(hours.holidays.is_empty());
        for (_, day) in hours.schedule.iter() {
            assert_eq!(*day, DaySchedule::open(time("10:00"), time("16:00")));
        }
    }

    #[test]
    fn test_decode_garbage_is_default() {
        assert_eq!(decode("garbage text"), WeekSchedule::default());
        assert_eq!(decode(""), WeekSchedule::default());
        assert_eq!(decode(",,,"), WeekSchedule::default());
        assert_eq!(decode("{not json"), WeekSchedule::default());
    }

    #[test]
    fn test_decode_ignores_bad_segments_only() {
        let week = decode("Mon 9-5, Tue 11:00–13:00, Wed–Mon Closed");
        assert_eq!(week[Mon], DaySchedule::default());
        assert_eq!(week[Tue], DaySchedule::open(time("11:00"), time("13:00")));
        assert_eq!(week[Wed], DaySchedule::default());
    }

    #[test]
    fn test_decode_non_contiguous_groups() {
        let week = decode("Mon, Wed, Fri 10:00–18:00, Tue, Thu Closed");
        for day in [Mon, Wed, Fri] {
            assert_eq!(week[day], DaySchedule::open(time("10:00"), time("18:00")));
        }
        assert!(week[Tue].closed);
        assert!(week[Thu].closed);
        assert_eq!(week[Sat], DaySchedule::default());
    }

    #[test]
    fn test_pending_days_dropped_by_garbage() {
        let week = decode("Mon, nonsense, Tue Closed");
        assert_eq!(week[Mon], DaySchedule::default());
        assert!(week[Tue].closed);
    }

    #[test]
    fn test_decode_structured_value() {
        let value = json!({
            "hours": {
                "Mon": { "open": "07:00", "close": "15:00", "closed": false },
                "Sun": { "closed": true }
            },
            "holidays": ["Jan 1"]
        });
        let hours = decode_hours(&value);
        assert_eq!(hours.schedule[Mon], DaySchedule::open(time("07:00"), time("15:00")));
        assert!(hours.schedule[Sun].closed);
        assert_eq!(hours.schedule[Tue], DaySchedule::default());
        assert_eq!(hours.holidays, vec!["Jan 1".to_string()]);
    }

    #[test]
    fn test_decode_structured_text() {
        let text = r#"{"hours": {"Friday": {"close": "20:00"}}}"#;
        let week = decode(text);
        assert_eq!(week[Fri], DaySchedule::open(time("09:00"), time("20:00")));
    }

    #[test]
    fn test_decode_holiday_clause_any_case() {
        let week = decode("mon–wed 08:00–09:00, HOLIDAYS: x, sun Closed");
        assert_eq!(week[Tue], DaySchedule::open(time("08:00"), time("09:00")));
        assert!(week[Sun].closed);
        assert_eq!(week[Thu], DaySchedule::default());
    }

    #[test]
    fn test_decode_record_keeps_valid_days() {
        // A null day takes the defaults without losing the others
        let value = json!({ "hours": { "Mon": { "open": "07:00" }, "Tue": null } });
        let week = decode(&value);
        assert_eq!(week[Mon], DaySchedule::open(time("07:00"), time("17:00")));
        assert_eq!(week[Tue], DaySchedule::default());

        // A holiday that is not text is dropped on its own
        let value = json!({ "hours": { "Mon": { "open": "07:00" } }, "holidays": [1, "Jan 1"] });
        let hours = decode_hours(&value);
        assert_eq!(hours.schedule[Mon], DaySchedule::open(time("07:00"), time("17:00")));
        assert_eq!(hours.holidays, vec!["Jan 1".to_string()]);
    }

    #[test]
    fn test_decode_record_field_of_wrong_type() {
        let value = json!({ "hours": { "Mon": { "closed": "yes" }, "Sat": { "closed": true } } });
        let week = decode(&value);
        assert_eq!(week[Mon], DaySchedule::default());
        assert!(week[Sat].closed);
    }

    #[test]
    fn test_decode_json_string_values() {
        // A record without `hours` is not structured
        let value = json!({ "holidays": ["Jan 1"] });
        assert_eq!(decode(&value), WeekSchedule::default());

        // A JSON string holding the display form
        let value = json!("Sat–Sun Closed");
        let week = decode(&value);
        assert!(week[Sat].closed && week[Sun].closed);

        // A JSON string holding a serialized record
        let value = json!(r#"{"hours": {"Mon": {"open": "07:00", "close": "11:00"}}}"#);
        let week = decode(&value);
        assert_eq!(week[Mon], DaySchedule::open(time("07:00"), time("11:00")));
    }

    #[test]
    fn test_decode_bare_days_take_following_hours() {
        let week = decode("Mon, Tue 10:00–12:00");
        assert_eq!(week[Mon], DaySchedule::open(time("10:00"), time("12:00")));
        assert_eq!(week[Tue], DaySchedule::open(time("10:00"), time("12:00")));
    }
}
