use std::collections::BTreeMap;
use std::fmt;

use crate::env::{EnvKey, Value, dump_assignment};
use crate::EnvError;

/// A partial set of assignments, as written in one rule block.
///
/// Every stored value has been checked against its key's type, so applying an
/// overlay to an [`Environment`] cannot fail. Iteration is sorted by key name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    values: BTreeMap<EnvKey, Value>,
}

impl Overlay {
    /// Creates an empty overlay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Stores a value the caller has already type checked.
    pub(crate) fn insert(&mut self, key: EnvKey, value: Value) {
        debug_assert!(key.check(&value).is_ok(), "{key} = {value}");
        self.values.insert(key, value);
    }

    /// Assigns `value` to `key`, replacing any earlier assignment.
    pub fn set(&mut self, key: EnvKey, value: Value) -> Result<(), EnvError> {
        key.check(&value)?;
        self.insert(key, value);
        Ok(())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: EnvKey, value: Value) -> Result<Self, EnvError> {
        self.set(key, value)?;
        Ok(self)
    }

    /// The value assigned to `key`, if any.
    #[must_use]
    pub fn get(&self, key: EnvKey) -> Option<&Value> {
        self.values.get(&key)
    }

    /// Returns `true` when nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of assigned keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Assignments sorted by key name.
    pub fn iter(&self) -> impl Iterator<Item = (EnvKey, &Value)> + '_ {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    /// Copies `other`'s assignments over this overlay's.
    pub fn merge(&mut self, other: &Self) {
        self.values
            .extend(other.values.iter().map(|(key, value)| (*key, value.clone())));
    }

    /// Right-biased merge that leaves both operands untouched.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

/// One assignment per line, in rule-file syntax.
impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&dump_assignment(key, value))?;
        }
        Ok(())
    }
}

/// Fully resolved settings for one file.
///
/// Starts from the defaults and is only changed through
/// [`overlay`](Self::overlay), so every field always holds a value of the
/// right type and range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    config_header: String,
    copyright_notice: String,
    extern_c: bool,
    fix_copyright: bool,
    guardname: String,
    guards: bool,
    ignore: bool,
    tabsize: u32,
    width: u32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            config_header: String::new(),
            copyright_notice: String::new(),
            extern_c: false,
            fix_copyright: true,
            guardname: String::new(),
            guards: false,
            ignore: false,
            tabsize: 4,
            width: 0,
        }
    }
}

impl Environment {
    /// Applies every assignment of `overlay`.
    pub fn overlay(&mut self, overlay: &Overlay) {
        for (key, value) in overlay.iter() {
            self.apply(key, value);
        }
    }

    /// Builder form of [`overlay`](Self::overlay).
    #[must_use]
    pub fn overlaid(mut self, overlay: &Overlay) -> Self {
        self.overlay(overlay);
        self
    }

    fn apply(&mut self, key: EnvKey, value: &Value) {
        match (key, value) {
            (EnvKey::ConfigHeader, Value::Str(v)) => self.config_header.clone_from(v),
            (EnvKey::CopyrightNotice, Value::Str(v)) => self.copyright_notice.clone_from(v),
            (EnvKey::GuardName, Value::Str(v)) => self.guardname.clone_from(v),
            (EnvKey::ExternC, Value::Bool(v)) => self.extern_c = *v,
            (EnvKey::FixCopyright, Value::Bool(v)) => self.fix_copyright = *v,
            (EnvKey::Guards, Value::Bool(v)) => self.guards = *v,
            (EnvKey::Ignore, Value::Bool(v)) => self.ignore = *v,
            (EnvKey::TabSize, Value::Int(v)) => self.tabsize = *v,
            (EnvKey::Width, Value::Int(v)) => self.width = *v,
            // Overlay::set rejects mismatched values.
            _ => {}
        }
    }

    /// Whether the file is skipped.
    #[must_use]
    pub const fn ignore(&self) -> bool {
        self.ignore
    }

    /// Include-guard macro name.
    #[must_use]
    pub fn guardname(&self) -> &str {
        &self.guardname
    }

    /// Whether include guards are maintained.
    #[must_use]
    pub const fn guards(&self) -> bool {
        self.guards
    }

    /// Maximum line width, `0` when unlimited.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Tab width.
    #[must_use]
    pub const fn tabsize(&self) -> u32 {
        self.tabsize
    }

    /// Whether header contents are wrapped in `extern "C"`.
    #[must_use]
    pub const fn extern_c(&self) -> bool {
        self.extern_c
    }

    /// Project configuration header to include first.
    #[must_use]
    pub fn config_header(&self) -> &str {
        &self.config_header
    }

    /// Copyright block text.
    #[must_use]
    pub fn copyright_notice(&self) -> &str {
        &self.copyright_notice
    }

    /// Whether copyright years are rewritten.
    #[must_use]
    pub const fn fix_copyright(&self) -> bool {
        self.fix_copyright
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: EnvKey) -> Value {
        match key {
            EnvKey::ConfigHeader => Value::Str(self.config_header.clone()),
            EnvKey::CopyrightNotice => Value::Str(self.copyright_notice.clone()),
            EnvKey::ExternC => Value::Bool(self.extern_c),
            EnvKey::FixCopyright => Value::Bool(self.fix_copyright),
            EnvKey::GuardName => Value::Str(self.guardname.clone()),
            EnvKey::Guards => Value::Bool(self.guards),
            EnvKey::Ignore => Value::Bool(self.ignore),
            EnvKey::TabSize => Value::Int(self.tabsize),
            EnvKey::Width => Value::Int(self.width),
        }
    }

    /// Every key with its value, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (EnvKey, Value)> + '_ {
        EnvKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// Assignments that turn the defaults into this environment.
    #[must_use]
    pub fn diff(&self) -> Overlay {
        let values = self
            .iter()
            .filter(|(key, value)| *value != key.default_value())
            .collect();
        Overlay { values }
    }
}
