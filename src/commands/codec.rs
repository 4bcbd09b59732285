use crate::error::HoursResult;
use crate::schedule::{decode_hours, HoursRecord, PickupHours};
use schemars::schema_for;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Encode an hours record read from a `.json` or `.toml` file
pub fn encode_file(path: &Path, default_holidays: &[String]) -> HoursResult<String> {
    info!("Encoding pickup hours from {}", path.display());
    let content = fs::read_to_string(path)?;

    let record: HoursRecord = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    encode_record(record, default_holidays)
}

/// Encode an hours record, rejecting days that close before they open
///
/// The configured holidays are used when the record has none of its own.
pub fn encode_record(record: HoursRecord, default_holidays: &[String]) -> HoursResult<String> {
    let mut hours = PickupHours::from(record);
    hours.schedule.validate()?;

    if hours.holidays.is_empty() && !default_holidays.is_empty() {
        debug!("Using {} configured holidays", default_holidays.len());
        hours.holidays = default_holidays.to_vec();
    }

    Ok(hours.to_string())
}

/// Decode a display string or JSON record into a JSON hours record
pub fn decode_text(text: &str, pretty: bool) -> HoursResult<String> {
    let hours = decode_hours(text);
    let output = if pretty {
        serde_json::to_string_pretty(&hours)?
    } else {
        serde_json::to_string(&hours)?
    };
    Ok(output)
}

/// Decode and re-encode into the canonical display string
pub fn normalize_text(text: &str) -> String {
    decode_hours(text).to_string()
}

/// JSON schema of the structured hours record
pub fn record_schema() -> HoursResult<String> {
    let schema = schema_for!(HoursRecord);
    Ok(serde_json::to_string_pretty(&schema)?)
}
