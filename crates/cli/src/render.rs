use std::fmt::Write as _;

use rules::{EnvKey, Value, format_value};
use walk::ScanEntry;

/// Renders one scan result as `relative/path<TAB>key=value ...`.
///
/// Every setting except `ignore` is listed, sorted by key. String values
/// that are empty or contain whitespace, quotes or backslashes are written
/// quoted with escapes so each result stays on one line. Paths use `/`
/// separators on every platform.
///
/// # Examples
///
/// ```
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// std::fs::write(temp.path().join(".header"), "width = 80\nguards\n")?;
/// std::fs::write(temp.path().join("util.h"), "")?;
///
/// let entry = walk::ScanBuilder::new(temp.path())
///     .excludes(filters::PatternSet::parse([".*"])?)
///     .build()?
///     .next()
///     .expect("one file")?;
/// let line = cli::format_entry(&entry);
/// assert!(line.starts_with("util.h\t"));
/// assert!(line.contains(" guardname=UTIL_H "));
/// assert!(line.contains(" guards=true "));
/// assert!(line.ends_with(" width=80"));
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
#[must_use]
pub fn format_entry(entry: &ScanEntry) -> String {
    let mut line = display_path(entry);
    line.push('\t');
    let mut first = true;
    for (key, value) in entry.env().iter() {
        if key == EnvKey::Ignore {
            continue;
        }
        if !first {
            line.push(' ');
        }
        first = false;
        let _ = write!(line, "{key}={}", quote(&format_value(key, &value), &value));
    }
    line
}

fn display_path(entry: &ScanEntry) -> String {
    let parts: Vec<_> = entry
        .relative_path()
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}

fn quote(text: &str, value: &Value) -> String {
    let needs_quotes = matches!(value, Value::Str(_))
        && (text.is_empty()
            || text
                .chars()
                .any(|c| c.is_whitespace() || c == '"' || c == '\\'));
    if needs_quotes {
        format!("\"{}\"", text.escape_default())
    } else {
        text.to_owned()
    }
}
