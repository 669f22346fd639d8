//! Parser for the flat, human readable trace form.
//!
//! Line layout: `(<time>) (<nesting>) <file>(<line>):  <code>`

use super::event::{correct_nesting, TraceEvent};
use crate::utils::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

fn line_matcher() -> &'static Regex {
    static MATCHER: OnceLock<Regex> = OnceLock::new();
    MATCHER.get_or_init(|| {
        Regex::new(r"^\(([^)]*)\) \(([^)]*)\) ([^(]*)\(([^)]*)\):  (.*)$")
            .expect("trace line pattern is valid")
    })
}

/// Parse one flat trace line
///
/// **Public** - called through `normalize_line`
pub fn parse_line(line: &str, read_nesting: bool) -> Result<TraceEvent, ParseError> {
    let caps = line_matcher().captures(line).ok_or(ParseError::Unmatched)?;

    let timestamp = caps[1]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| ParseError::InvalidField {
            field: "time",
            value: caps[1].to_string(),
        })?;

    let line_number = caps[4]
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidField {
            field: "line",
            value: caps[4].to_string(),
        })?;

    let code = caps[5].to_string();

    let declared_nesting = if read_nesting {
        let raw = caps[2]
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidField {
                field: "nesting",
                value: caps[2].to_string(),
            })?;
        Some(correct_nesting(call_keyword(&code), raw)?)
    } else {
        None
    };

    Ok(TraceEvent {
        timestamp,
        declared_nesting,
        file: caps[3].to_string(),
        line: line_number,
        code,
    })
}

/// Command name of a rendered call, e.g. `elseif` for `elseif(WIN32)`
fn call_keyword(code: &str) -> &str {
    code.split('(').next().unwrap_or(code).trim()
}
