//! Formatting of the location part of a report line.
//!
//! `[<depth>]<file>(<line>):  <code>`, optionally with the file squeezed
//! into a fixed-width, dot-padded column.

use crate::parser::schema::StoredTrace;
use crate::utils::config::MIN_ELIDED_FILE_WIDTH;

/// Format the trace info for one node
///
/// # Arguments
/// * `trace` - Node to describe
/// * `depth` - Nesting shown in brackets (1 = top level)
/// * `width` - Fixed width of the depth/file/line part, if any
pub fn format_trace_info(trace: &StoredTrace, depth: usize, width: Option<usize>) -> String {
    let nesting = depth.to_string();
    let file = match width {
        Some(width) => {
            let line_digits = trace.line.to_string().len();
            let file_width = width
                .saturating_sub(line_digits + nesting.len())
                .max(MIN_ELIDED_FILE_WIDTH);
            fit_file(&trace.file, file_width)
        }
        None => trace.file.clone(),
    };

    format!("[{}]{}({}):  {}", nesting, file, trace.line, trace.code)
}

/// Squeeze `file` into exactly `file_width` characters
///
/// Long paths keep their head and tail around `...`; short ones are
/// padded with dots.
pub fn fit_file(file: &str, file_width: usize) -> String {
    let chars: Vec<char> = file.chars().collect();

    let mut fitted: String = if chars.len() > file_width {
        let half = file_width / 2;
        let head: String = chars[..half - 1].iter().collect();
        let tail: String = chars[chars.len() + 2 - half..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        file.to_string()
    };

    let padding = file_width.saturating_sub(fitted.chars().count());
    fitted.extend(std::iter::repeat('.').take(padding));
    fitted
}
