use std::path::Path;
use std::str::Utf8Error;

use similar::TextDiff;

// SGR codes matching GNU diff's default palette (rs=0:hd=1:ad=32:de=31:ln=36).
pub const ANSI_RESET: &str = "\x1b[0m";
pub const ANSI_RED: &str = "\x1b[31m";
pub const ANSI_GREEN: &str = "\x1b[32m";
pub const ANSI_BOLD: &str = "\x1b[1m";
pub const ANSI_CYAN: &str = "\x1b[36m";

const CONTEXT_LINES: usize = 3;

/// Unified diff (`diff -u` style) of expected against actual, labelled with the
/// file names of both paths.
///
/// Never fails: if the diff cannot be produced the message says so instead.
pub fn format_unified_diff(
    expected_path: &Path,
    actual_path: &Path,
    expected: &[u8],
    actual: &[u8],
    colorize: bool,
) -> String {
    let from_label = base_label(expected_path, "expected");
    let to_label = base_label(actual_path, "actual");

    let out = match unified_diff(&from_label, &to_label, expected, actual) {
        Ok(out) => out,
        Err(e) => return format!("files differ (unified diff failed: {e})"),
    };

    if colorize {
        colorize_unified_diff(&out)
    } else {
        out
    }
}

fn base_label(path: &Path, fallback: &str) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => fallback.to_string(),
    }
}

fn unified_diff(from_label: &str, to_label: &str, expected: &[u8], actual: &[u8]) -> Result<String, Utf8Error> {
    let expected = std::str::from_utf8(expected)?;
    let actual = std::str::from_utf8(actual)?;
    let diff = TextDiff::from_lines(expected, actual);
    let out = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .header(from_label, to_label)
        .to_string();
    Ok(out)
}

/// Wrap each line of a unified diff in the SGR code for its role. Line content is untouched.
pub fn colorize_unified_diff(diff: &str) -> String {
    diff.split('\n')
        .map(|line| {
            if line.starts_with("--- ") || line.starts_with("+++ ") {
                format!("{ANSI_BOLD}{line}{ANSI_RESET}")
            } else if line.starts_with("@@") {
                format!("{ANSI_CYAN}{line}{ANSI_RESET}")
            } else if line.starts_with('-') {
                format!("{ANSI_RED}{line}{ANSI_RESET}")
            } else if line.starts_with('+') {
                format!("{ANSI_GREEN}{line}{ANSI_RESET}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
