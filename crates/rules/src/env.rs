//! Typed configuration keys and values.

use std::fmt;
use std::str::FromStr;

use crate::EnvError;

/// A recognised configuration key.
///
/// Variants are declared in alphabetical order of their names, so ordered
/// maps keyed by `EnvKey` dump in the same order as the names sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvKey {
    /// Name of the project configuration header (`config_header`).
    ConfigHeader,
    /// Copyright block text (`copyright_notice`).
    CopyrightNotice,
    /// Wrap header contents in `extern "C"` (`extern_c`).
    ExternC,
    /// Rewrite copyright years (`fix_copyright`).
    FixCopyright,
    /// Include-guard macro name, derived from the path (`guardname`).
    GuardName,
    /// Emit include guards (`guards`).
    Guards,
    /// Skip the file or directory (`ignore`).
    Ignore,
    /// Tab width (`tabsize`).
    TabSize,
    /// Maximum line width, `0` for unlimited (`width`).
    Width,
}

/// Type of the values a key accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// `true` or `false`; a bare key means `true`.
    Bool,
    /// Decimal integer within `min..=max`.
    Int {
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// Any text.
    Str,
}

/// A typed configuration value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(u32),
    /// String value.
    Str(String),
}

impl Value {
    /// The boolean, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<u32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The text, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// Same text as [`format_value`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl EnvKey {
    /// Every key, sorted by name.
    pub const ALL: [Self; 9] = [
        Self::ConfigHeader,
        Self::CopyrightNotice,
        Self::ExternC,
        Self::FixCopyright,
        Self::GuardName,
        Self::Guards,
        Self::Ignore,
        Self::TabSize,
        Self::Width,
    ];

    /// Name used in rule files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConfigHeader => "config_header",
            Self::CopyrightNotice => "copyright_notice",
            Self::ExternC => "extern_c",
            Self::FixCopyright => "fix_copyright",
            Self::GuardName => "guardname",
            Self::Guards => "guards",
            Self::Ignore => "ignore",
            Self::TabSize => "tabsize",
            Self::Width => "width",
        }
    }

    /// Looks a key up by name. `guard_prefix` is accepted for `guardname`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "guard_prefix" {
            return Some(Self::GuardName);
        }
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Type of the values this key accepts.
    #[must_use]
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::ExternC | Self::FixCopyright | Self::Guards | Self::Ignore => ValueType::Bool,
            Self::TabSize => ValueType::Int { min: 1, max: 8 },
            Self::Width => ValueType::Int {
                min: 0,
                max: u32::MAX,
            },
            Self::ConfigHeader | Self::CopyrightNotice | Self::GuardName => ValueType::Str,
        }
    }

    /// Value in effect when no rule sets the key.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::ExternC | Self::Guards | Self::Ignore => Value::Bool(false),
            Self::FixCopyright => Value::Bool(true),
            Self::TabSize => Value::Int(4),
            Self::Width => Value::Int(0),
            Self::ConfigHeader | Self::CopyrightNotice | Self::GuardName => {
                Value::Str(String::new())
            }
        }
    }

    /// Checks that `value` has this key's type and range.
    pub fn check(self, value: &Value) -> Result<(), EnvError> {
        let invalid = |reason: String| EnvError::InvalidValue { key: self, reason };
        match (self.value_type(), value) {
            (ValueType::Bool, Value::Bool(_)) | (ValueType::Str, Value::Str(_)) => Ok(()),
            (ValueType::Int { min, max }, Value::Int(v)) => {
                if *v < min {
                    Err(invalid(format!("value cannot be less than {min}")))
                } else if *v > max {
                    Err(invalid(format!("value cannot be more than {max}")))
                } else {
                    Ok(())
                }
            }
            (ValueType::Bool, _) => Err(invalid("expected true or false".to_owned())),
            (ValueType::Int { .. }, _) => Err(invalid("expected an integer".to_owned())),
            (ValueType::Str, _) => Err(invalid("expected a string".to_owned())),
        }
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnvKey {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EnvError::UnknownKey { key: s.to_owned() })
    }
}

/// Parses the raw text of an assignment to `key`.
///
/// `None` stands for a bare key, which means `true` for boolean keys and is
/// an error for every other key.
pub fn parse_value(key: EnvKey, raw: Option<&str>) -> Result<Value, EnvError> {
    let Some(raw) = raw else {
        return match key.value_type() {
            ValueType::Bool => Ok(Value::Bool(true)),
            _ => Err(EnvError::MissingValue { key }),
        };
    };

    let invalid = |reason: String| EnvError::InvalidValue { key, reason };
    match key.value_type() {
        ValueType::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("expected true or false".to_owned())),
        },
        ValueType::Int { min, max } => {
            let parsed: i64 = raw
                .parse()
                .map_err(|_| invalid(format!("expected an integer, got '{raw}'")))?;
            if parsed < i64::from(min) {
                return Err(invalid(format!("value cannot be less than {min}")));
            }
            if parsed > i64::from(max) {
                return Err(invalid(format!("value cannot be more than {max}")));
            }
            u32::try_from(parsed)
                .map(Value::Int)
                .map_err(|_| invalid(format!("value cannot be more than {max}")))
        }
        ValueType::Str => Ok(Value::Str(raw.to_owned())),
    }
}

/// Looks up `name` and parses `raw` for it.
pub fn parse_assignment(name: &str, raw: Option<&str>) -> Result<(EnvKey, Value), EnvError> {
    let key: EnvKey = name.parse()?;
    parse_value(key, raw).map(|value| (key, value))
}

/// Text that [`parse_value`] turns back into `value`.
#[must_use]
pub fn format_value(_key: EnvKey, value: &Value) -> String {
    value.to_string()
}

/// Renders `key` and `value` as one rule-file assignment.
///
/// `true` booleans become a bare key and empty strings `key =`. Strings with
/// whitespace, or that would read back as something else, become a heredoc
/// whose terminator does not occur in the text.
#[must_use]
pub fn dump_assignment(key: EnvKey, value: &Value) -> String {
    match value {
        Value::Bool(true) => key.name().to_owned(),
        Value::Str(text) if text.is_empty() => format!("{key} ="),
        Value::Str(text) if needs_heredoc(text) => {
            let mut terminator = String::from("EOF");
            let mut suffix = 0_u32;
            while text.lines().any(|line| line.trim_end() == terminator) {
                suffix += 1;
                terminator = format!("EOF{suffix}");
            }
            let newline = if text.ends_with('\n') { "" } else { "\n" };
            format!("{key} = <<{terminator}\n{text}{newline}{terminator}")
        }
        _ => format!("{key} = {}", format_value(key, value)),
    }
}

/// Strings that would not survive a single-line `key = value`.
fn needs_heredoc(text: &str) -> bool {
    text.chars().any(char::is_whitespace) || text.starts_with("<<") || text == "}"
}

/// Turns a path component into a macro-safe identifier fragment.
///
/// Runs of characters other than ASCII letters and digits become a single
/// `_`, letters are uppercased, and leading or trailing `_` is dropped.
///
/// ```
/// assert_eq!(rules::to_macro("my-file.h"), "MY_FILE_H");
/// assert_eq!(rules::to_macro("__init__.py"), "INIT_PY");
/// ```
#[must_use]
pub fn to_macro(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out.trim_matches('_').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for key in EnvKey::ALL {
            assert_eq!(EnvKey::from_name(key.name()), Some(key));
            assert_eq!(key.name().parse::<EnvKey>().unwrap(), key);
        }
        assert_eq!(EnvKey::from_name("guard_prefix"), Some(EnvKey::GuardName));
        assert_eq!(
            "colour".parse::<EnvKey>().unwrap_err().to_string(),
            "unknown variable: 'colour'"
        );
    }

    #[test]
    fn all_is_sorted_by_name() {
        let names: Vec<&str> = EnvKey::ALL.iter().map(|key| key.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn defaults_type_check() {
        for key in EnvKey::ALL {
            key.check(&key.default_value()).unwrap();
        }
    }

    #[test]
    fn bare_keys() {
        assert_eq!(parse_value(EnvKey::Guards, None).unwrap(), Value::Bool(true));
        let err = parse_value(EnvKey::Width, None).unwrap_err();
        assert_eq!(err.to_string(), "missing value for width");
        assert!(parse_value(EnvKey::GuardName, None).is_err());
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_value(EnvKey::Ignore, Some("false")).unwrap(), Value::Bool(false));
        let err = parse_value(EnvKey::Ignore, Some("yes")).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for ignore: expected true or false");
        assert!(parse_value(EnvKey::Ignore, Some("")).is_err());
    }

    #[test]
    fn integer_bounds() {
        assert_eq!(parse_value(EnvKey::TabSize, Some("8")).unwrap(), Value::Int(8));
        assert_eq!(
            parse_value(EnvKey::TabSize, Some("0")).unwrap_err().to_string(),
            "invalid value for tabsize: value cannot be less than 1"
        );
        assert_eq!(
            parse_value(EnvKey::TabSize, Some("9")).unwrap_err().to_string(),
            "invalid value for tabsize: value cannot be more than 8"
        );
        assert!(parse_value(EnvKey::Width, Some("-1")).is_err());
        assert!(parse_value(EnvKey::Width, Some("80x")).is_err());
        assert!(parse_value(EnvKey::Width, Some("99999999999")).is_err());
        assert_eq!(parse_value(EnvKey::Width, Some("0")).unwrap(), Value::Int(0));
    }

    #[test]
    fn check_rejects_wrong_types() {
        assert!(EnvKey::Guards.check(&Value::Int(1)).is_err());
        assert!(EnvKey::TabSize.check(&Value::Int(12)).is_err());
        assert!(EnvKey::Width.check(&Value::Str("80".into())).is_err());
    }

    #[test]
    fn format_round_trips() {
        let samples = [
            (EnvKey::Ignore, "true"),
            (EnvKey::ExternC, "false"),
            (EnvKey::TabSize, "3"),
            (EnvKey::Width, "120"),
            (EnvKey::ConfigHeader, "config.h"),
            (EnvKey::CopyrightNotice, "Copyright {year} Someone\nAll rights.\n"),
        ];
        for (key, text) in samples {
            let value = parse_value(key, Some(text)).unwrap();
            let again = parse_value(key, Some(&format_value(key, &value))).unwrap();
            assert_eq!(again, value);
        }
    }

    #[test]
    fn dump_forms() {
        assert_eq!(dump_assignment(EnvKey::Guards, &Value::Bool(true)), "guards");
        assert_eq!(
            dump_assignment(EnvKey::Guards, &Value::Bool(false)),
            "guards = false"
        );
        assert_eq!(dump_assignment(EnvKey::TabSize, &Value::Int(2)), "tabsize = 2");
        assert_eq!(
            dump_assignment(EnvKey::ConfigHeader, &Value::Str(String::new())),
            "config_header ="
        );
        assert_eq!(
            dump_assignment(EnvKey::CopyrightNotice, &Value::Str("a b\nEOF\n".into())),
            "copyright_notice = <<EOF1\na b\nEOF\nEOF1"
        );
        assert_eq!(
            dump_assignment(EnvKey::CopyrightNotice, &Value::Str("a b\n  EOF\n".into())),
            "copyright_notice = <<EOF\na b\n  EOF\nEOF"
        );
        assert_eq!(
            dump_assignment(EnvKey::ConfigHeader, &Value::Str("}".into())),
            "config_header = <<EOF\n}\nEOF"
        );
    }

    #[test]
    fn macro_names() {
        assert_eq!(to_macro("foo.h"), "FOO_H");
        assert_eq!(to_macro("a--b..c"), "A_B_C");
        assert_eq!(to_macro("..."), "");
        assert_eq!(to_macro("Dir9"), "DIR9");
        assert_eq!(to_macro("naïve.h"), "NA_VE_H");
    }
}
