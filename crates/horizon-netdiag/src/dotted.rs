//! Fixed-column "dotted field" extraction.
//!
//! Adapter listings such as `ipconfig /all` print one field per line, the
//! label padded with `. ` up to a colon and the value starting at a fixed
//! column:
//!
//! ```text
//!    DNS Servers . . . . . . . . . . . : 8.8.8.8
//!                                        8.8.4.4
//! ```
//!
//! Lines whose leading columns are blank continue the previous value.

use crate::logging::targets;

/// Column at which `ipconfig` starts printing values.
pub const DEFAULT_VALUE_COLUMN: usize = 39;

/// Extract the values of `label` using [`DEFAULT_VALUE_COLUMN`].
///
/// Returns `vec![""]` when the label does not occur, never an empty list.
pub fn extract_dotted<S: AsRef<str>>(lines: &[S], label: &str) -> Vec<String> {
    extract_dotted_at(lines, label, DEFAULT_VALUE_COLUMN)
}

/// Extract the values of `label`, with values starting at `column`.
///
/// The first line whose trimmed text starts with `label` supplies the first
/// value; every following line whose first `column` characters are blank
/// adds another. Scanning stops at the first line that is neither.
pub fn extract_dotted_at<S: AsRef<str>>(lines: &[S], label: &str, column: usize) -> Vec<String> {
    let mut values = Vec::new();
    let mut found = false;

    for line in lines {
        let line = line.as_ref().trim_end_matches('\r');
        if !found {
            if let Some(value) = label_value(line, label, column) {
                values.push(value);
                found = true;
            }
        } else if let Some(value) = continuation_value(line, column) {
            if !value.is_empty() {
                values.push(value);
            }
        } else {
            break;
        }
    }

    if !found {
        return vec![String::new()];
    }
    values
}

fn label_value(line: &str, label: &str, column: usize) -> Option<String> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix(label)?;
    if !rest.is_empty() && !rest.starts_with([' ', '.', ':']) {
        // A longer label that merely shares the prefix.
        return None;
    }

    if column >= 2 && line.get(column - 2..column) == Some(": ") {
        return line.get(column..).map(|v| v.trim().to_string());
    }

    let after_padding = rest.trim_start_matches([' ', '.']);
    let value = after_padding.strip_prefix(':')?.trim().to_string();
    tracing::warn!(
        target: targets::DISCOVERY,
        label,
        column,
        "dotted field value is not at the expected column, using label-relative parse"
    );
    Some(value)
}

fn continuation_value(line: &str, column: usize) -> Option<String> {
    let (lead, value) = (line.get(..column)?, line.get(column..)?);
    if value.is_empty() || !lead.trim().is_empty() {
        return None;
    }
    Some(value.trim().to_string())
}
