//! Line-by-line reader turning a trace log into an event stream.
//!
//! Rejected lines are echoed to a diagnostic writer with the `Ignored: `
//! prefix and never interrupt the stream; only I/O failures do.

use super::event::{normalize_line, TraceEvent, TraceFormat};
use crate::utils::config::IGNORED_PREFIX;
use crate::utils::error::ParseError;
use log::{debug, trace};
use std::io::{self, BufRead, Write};

/// Iterator over the events of a trace log
///
/// **Public** - used by the collect step of the stat command
pub struct TraceReader<R, W> {
    input: R,
    diagnostics: W,
    format: TraceFormat,
    read_nesting: bool,
    buffer: Vec<u8>,
    ignored: usize,
}

impl<R: BufRead, W: Write> TraceReader<R, W> {
    /// Create a reader
    ///
    /// # Arguments
    /// * `input` - Trace log source
    /// * `diagnostics` - Sink for rejected lines (stderr in the CLI)
    /// * `format` - Line grammar
    /// * `read_nesting` - Whether declared nesting is read from each line
    pub fn new(input: R, diagnostics: W, format: TraceFormat, read_nesting: bool) -> Self {
        Self {
            input,
            diagnostics,
            format,
            read_nesting,
            buffer: Vec::new(),
            ignored: 0,
        }
    }

    /// Number of lines rejected so far
    pub fn ignored_lines(&self) -> usize {
        self.ignored
    }

    fn report_ignored(&mut self, raw: &str, err: &ParseError) -> io::Result<()> {
        self.ignored += 1;
        trace!("Rejected trace line: {}", err);
        write!(self.diagnostics, "{}{}", IGNORED_PREFIX, raw)?;
        if !raw.ends_with('\n') {
            writeln!(self.diagnostics)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Iterator for TraceReader<R, W> {
    type Item = io::Result<TraceEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.input.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }

            let raw = String::from_utf8_lossy(&self.buffer).into_owned();
            let line = raw.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            match normalize_line(line, self.format, self.read_nesting) {
                Ok(event) => return Some(Ok(event)),
                Err(ParseError::VersionHeader { major, minor }) => {
                    debug!("Trace format version {}.{}", major, minor);
                }
                Err(err) => {
                    if let Err(e) = self.report_ignored(&raw, &err) {
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_skips_and_reports_noise() {
        let log = "\
{\"version\":{\"major\":1,\"minor\":2}}
-- Configuring done
{\"args\":[],\"cmd\":\"project\",\"file\":\"CMakeLists.txt\",\"frame\":1,\"line\":1,\"time\":1.0}

{\"args\":[],\"cmd\":\"add_library\",\"file\":\"CMakeLists.txt\",\"frame\":1,\"line\":2,\"time\":2.0}
";
        let mut diagnostics = Vec::new();
        let mut reader = TraceReader::new(Cursor::new(log), &mut diagnostics, TraceFormat::JsonV1, true);

        let events: Vec<TraceEvent> = reader.by_ref().collect::<io::Result<_>>().unwrap();
        assert_eq!(reader.ignored_lines(), 1);
        drop(reader);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].code, "project()");
        assert_eq!(events[1].line, 2);
        assert_eq!(
            String::from_utf8(diagnostics).unwrap(),
            "Ignored: -- Configuring done\n"
        );
    }

    #[test]
    fn test_reader_last_line_without_newline() {
        let log = "(1.0) (1) a.cmake(1):  set(A 1)\n(2.0) (1) a.cmake(2):  set(B 2)";
        let mut diagnostics = Vec::new();
        let reader = TraceReader::new(Cursor::new(log), &mut diagnostics, TraceFormat::Human, true);

        let events: Vec<TraceEvent> = reader.collect::<io::Result<_>>().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].code, "set(B 2)");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_reader_ignored_line_without_newline_gets_one() {
        let mut diagnostics = Vec::new();
        let reader = TraceReader::new(Cursor::new("garbage"), &mut diagnostics, TraceFormat::Human, true);

        assert_eq!(reader.count(), 0);
        assert_eq!(String::from_utf8(diagnostics).unwrap(), "Ignored: garbage\n");
    }
}
