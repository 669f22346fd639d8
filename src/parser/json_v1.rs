//! Parser for `--trace-format=json-v1` records.
//!
//! CMake writes one JSON object per line. The first line is a version
//! header, every other line describes one traced command.

use super::event::{correct_nesting, render_call, TraceEvent};
use crate::utils::error::ParseError;
use serde::Deserialize;
use serde_json::Value;

/// Raw json-v1 record
///
/// Numeric fields stay as `Value` because producers disagree on whether
/// they are numbers or strings.
#[derive(Debug, Deserialize)]
struct TraceRecord {
    #[serde(default)]
    version: Option<VersionInfo>,

    #[serde(default)]
    time: Option<Value>,

    #[serde(default)]
    frame: Option<Value>,

    #[serde(default)]
    cmd: Option<String>,

    #[serde(default)]
    args: Vec<String>,

    #[serde(default)]
    file: Option<String>,

    #[serde(default)]
    line: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    major: u64,
    #[serde(default)]
    minor: u64,
}

/// Parse one json-v1 line
///
/// **Public** - called through `normalize_line`
pub fn parse_record(line: &str, read_nesting: bool) -> Result<TraceEvent, ParseError> {
    let record: TraceRecord = serde_json::from_str(line)?;

    if let Some(version) = record.version {
        return Err(ParseError::VersionHeader {
            major: version.major,
            minor: version.minor,
        });
    }

    let timestamp = parse_float("time", record.time.as_ref().ok_or(ParseError::MissingField("time"))?)?;
    let command = record.cmd.ok_or(ParseError::MissingField("cmd"))?;
    let file = record.file.ok_or(ParseError::MissingField("file"))?;
    let raw_line = parse_integer("line", record.line.as_ref().ok_or(ParseError::MissingField("line"))?)?;
    let line_number = u32::try_from(raw_line).map_err(|_| ParseError::InvalidField {
        field: "line",
        value: raw_line.to_string(),
    })?;

    let declared_nesting = if read_nesting {
        let frame = record.frame.as_ref().ok_or(ParseError::MissingField("frame"))?;
        Some(correct_nesting(&command, parse_integer("frame", frame)?)?)
    } else {
        None
    };

    Ok(TraceEvent {
        timestamp,
        declared_nesting,
        file,
        line: line_number,
        code: render_call(&command, &record.args),
    })
}

/// Accept a JSON number or a numeric string
///
/// **Private** - internal utility
fn parse_float(field: &'static str, value: &Value) -> Result<f64, ParseError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidField {
            field,
            value: value.to_string(),
        }),
    }
}

/// Accept a JSON integer or an integer string
///
/// **Private** - internal utility
fn parse_integer(field: &'static str, value: &Value) -> Result<i64, ParseError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"args":["FOO","bar"],"cmd":"set","file":"/src/CMakeLists.txt","frame":2,"line":14,"time":1590000000.25}"#;

    #[test]
    fn test_parse_record_fields() {
        let event = parse_record(RECORD, true).unwrap();

        assert_eq!(event.timestamp, 1590000000.25);
        assert_eq!(event.declared_nesting, Some(2));
        assert_eq!(event.file, "/src/CMakeLists.txt");
        assert_eq!(event.line, 14);
        assert_eq!(event.code, "set(\"FOO\" \"bar\")");
    }

    #[test]
    fn test_parse_record_string_numbers() {
        let line = r#"{"args":[],"cmd":"endif","file":"a.cmake","frame":"1","line":"3","time":"2.5"}"#;
        let event = parse_record(line, true).unwrap();

        assert_eq!(event.timestamp, 2.5);
        assert_eq!(event.declared_nesting, Some(1));
        assert_eq!(event.line, 3);
        assert_eq!(event.code, "endif()");
    }

    #[test]
    fn test_parse_record_else_is_bumped() {
        let line = r#"{"args":[],"cmd":"else","file":"a.cmake","frame":1,"line":3,"time":0}"#;
        let event = parse_record(line, true).unwrap();
        assert_eq!(event.declared_nesting, Some(2));
    }

    #[test]
    fn test_parse_record_ignoring_nesting_skips_frame() {
        let line = r#"{"args":[],"cmd":"message","file":"a.cmake","line":3,"time":0}"#;
        let event = parse_record(line, false).unwrap();
        assert_eq!(event.declared_nesting, None);

        assert!(matches!(
            parse_record(line, true),
            Err(ParseError::MissingField("frame"))
        ));
    }

    #[test]
    fn test_parse_record_version_header() {
        let err = parse_record(r#"{"version":{"major":1,"minor":2}}"#, true).unwrap_err();
        assert!(matches!(err, ParseError::VersionHeader { major: 1, minor: 2 }));
    }

    #[test]
    fn test_parse_record_rejects_bad_time() {
        let line = r#"{"args":[],"cmd":"set","file":"a.cmake","frame":1,"line":3,"time":"soon"}"#;
        assert!(matches!(
            parse_record(line, true),
            Err(ParseError::InvalidField { field: "time", .. })
        ));
    }

    #[test]
    fn test_parse_record_rejects_plain_text() {
        assert!(matches!(
            parse_record("-- Configuring done", true),
            Err(ParseError::JsonError(_))
        ));
    }
}
