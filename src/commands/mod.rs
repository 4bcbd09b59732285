mod codec;

pub use codec::{decode_text, encode_file, encode_record, normalize_text, record_schema};

use crate::config::Config;
use crate::error::{usage_error, HoursResult};
use std::path::PathBuf;

/// Usage text printed on argument errors
pub const USAGE: &str = "\
Usage: pickup_hours <command>

Commands:
  encode <file>      Encode a .json or .toml hours record into the display string
  decode <text>      Decode a display string or JSON record into a JSON record
  normalize <text>   Decode and re-encode into the canonical display string
  schema             Print the JSON schema of the hours record";

/// A parsed command-line invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Encode(PathBuf),
    Decode(String),
    Normalize(String),
    Schema,
}

impl Command {
    /// Parse the arguments following the program name
    pub fn parse<I>(args: I) -> HoursResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| usage_error("missing command"))?;

        // Text arguments may be passed unquoted, so join the rest back up
        let rest: Vec<String> = args.collect();
        let text = || {
            if rest.is_empty() {
                Err(usage_error(&format!("{} needs an argument", name)))
            } else {
                Ok(rest.join(" "))
            }
        };

        match name.as_str() {
            "encode" => match rest.as_slice() {
                [path] => Ok(Command::Encode(PathBuf::from(path))),
                _ => Err(usage_error("encode takes exactly one file")),
            },
            "decode" => Ok(Command::Decode(text()?)),
            "normalize" => Ok(Command::Normalize(text()?)),
            "schema" if rest.is_empty() => Ok(Command::Schema),
            "schema" => Err(usage_error("schema takes no arguments")),
            other => Err(usage_error(&format!("unknown command: {}", other))),
        }
    }

    /// Run the command, returning what should be printed
    pub fn run(&self, config: &Config) -> HoursResult<String> {
        match self {
            Command::Encode(path) => encode_file(path, &config.holidays),
            Command::Decode(text) => decode_text(text, config.pretty),
            Command::Normalize(text) => Ok(normalize_text(text)),
            Command::Schema => record_schema(),
        }
    }
}
