use chrono::Weekday;

/// The week in serialization order, starting on Monday
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Separator between the first and last day of a rendered run
pub const EN_DASH: char = '–';

/// Position of a day in the Monday-first week
pub fn day_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// Short English name of a day
pub fn abbreviation(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Look up a day by its short or full English name
pub fn parse_day(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Whether a character separates the two ends of a day or time range
pub fn is_range_dash(c: char) -> bool {
    c == EN_DASH || c == '-'
}

/// Render a set of days as the shortest run notation, e.g. `Mon–Wed, Fri`
pub fn compress_days<I>(days: I) -> String
where
    I: IntoIterator<Item = Weekday>,
{
    let mut indices: Vec<usize> = days.into_iter().map(day_index).collect();
    indices.sort_unstable();
    indices.dedup();

    // Maximal runs of consecutive indices as (first, last)
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for index in indices {
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == index => *last = index,
            _ => runs.push((index, index)),
        }
    }

    runs.into_iter()
        .map(|(first, last)| {
            if first == last {
                abbreviation(WEEK[first]).to_string()
            } else {
                format!(
                    "{}{}{}",
                    abbreviation(WEEK[first]),
                    EN_DASH,
                    abbreviation(WEEK[last])
                )
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expand a day-range expression such as `Mon–Wed` or `Monday-Wednesday`
///
/// Unknown day names and reversed ranges expand to nothing.
pub fn expand_range(expr: &str) -> Vec<Weekday> {
    match expr.split_once(is_range_dash) {
        Some((start, end)) => match (parse_day(start), parse_day(end)) {
            (Some(start), Some(end)) if day_index(start) <= day_index(end) => {
                WEEK[day_index(start)..=day_index(end)].to_vec()
            }
            _ => Vec::new(),
        },
        None => parse_day(expr).into_iter().collect(),
    }
}
