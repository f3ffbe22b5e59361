use std::fmt;
use std::sync::Arc;

use logging::debug_log;

use crate::debug_filter::{
    trace_directory_verdict, trace_file_verdict, trace_ignore_file_parsed, trace_pattern_parsed,
};
use crate::{IgnoreFileError, PathPattern, PatternError, Polarity};

/// One `(polarity, pattern)` pair of a [`PatternSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternEntry {
    polarity: Polarity,
    pattern: PathPattern,
}

impl PatternEntry {
    /// Pairs a pattern with its polarity.
    #[must_use]
    pub const fn new(polarity: Polarity, pattern: PathPattern) -> Self {
        Self { polarity, pattern }
    }

    /// Shorthand for a [`Polarity::Positive`] entry.
    #[must_use]
    pub const fn positive(pattern: PathPattern) -> Self {
        Self::new(Polarity::Positive, pattern)
    }

    /// Shorthand for a [`Polarity::Negative`] entry.
    #[must_use]
    pub const fn negative(pattern: PathPattern) -> Self {
        Self::new(Polarity::Negative, pattern)
    }

    /// The verdict a match of this entry produces.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The pattern of this entry.
    #[must_use]
    pub const fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

impl fmt::Display for PatternEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.polarity, self.pattern)
    }
}

/// Ordered patterns with last-match-wins semantics.
///
/// Later entries override earlier ones for the same path, as in layered
/// ignore files. A set is immutable: entering a directory with
/// [`descend`](Self::descend) derives a new, narrower set holding only the
/// patterns that can still match below that directory.
///
/// `PatternSet` is cheaply cloneable (the entries are behind an [`Arc`]).
///
/// # Examples
///
/// ```
/// use filters::PatternSet;
///
/// let set = PatternSet::parse(["*.c", "!*.yy.c"]).unwrap();
/// assert!(set.matches_file("main.c"));
/// assert!(!set.matches_file("lexer.yy.c"));
///
/// let (matched, below) = set.descend("src");
/// assert!(!matched);
/// assert!(below.matches_file("util.c"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSet {
    entries: Arc<[PatternEntry]>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }
}

impl PatternSet {
    /// Builds a set from entries in precedence order.
    ///
    /// Leading negative entries are dropped: with nothing before them to
    /// cancel they can never change the default `false` verdict.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PatternEntry>,
    {
        let entries: Vec<PatternEntry> = entries
            .into_iter()
            .skip_while(|entry| entry.polarity == Polarity::Negative)
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    /// Parses pattern strings, where a leading `!` marks a negative entry.
    ///
    /// Patterns are rooted only by a leading `/`.
    pub fn parse<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for text in patterns {
            let text = text.as_ref();
            let (polarity, body) = match text.strip_prefix('!') {
                Some(rest) => (Polarity::Negative, rest),
                None => (Polarity::Positive, text),
            };
            let pattern = PathPattern::parse(body)?;
            trace_pattern_parsed(&pattern, polarity.verdict(), pattern.is_directory_only());
            entries.push(PatternEntry::new(polarity, pattern));
        }
        Ok(Self::new(entries))
    }

    /// Parses the contents of a gitignore-style file.
    ///
    /// Blank lines and lines starting with `#` are skipped, `!` negates, and
    /// `\#`/`\!` escape a literal first character. A pattern with a `/`
    /// before its last character is rooted at the file's directory; a
    /// leading `**/` keeps it unrooted instead.
    pub fn from_ignore_text(text: &str) -> Result<Self, IgnoreFileError> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (polarity, body) = if let Some(rest) = line.strip_prefix('!') {
                (Polarity::Negative, rest)
            } else if let Some(rest) = line.strip_prefix('\\') {
                (Polarity::Positive, rest)
            } else {
                (Polarity::Positive, line)
            };

            let (body, anywhere) = match body.strip_prefix("**/") {
                Some(rest) => (rest, true),
                None => (body, false),
            };
            let pattern =
                PathPattern::parse(body).map_err(|source| IgnoreFileError::new(index + 1, source))?;
            let pattern = if !anywhere && body.trim_end_matches('/').contains('/') {
                pattern.anchored()
            } else {
                pattern
            };

            trace_pattern_parsed(&pattern, polarity.verdict(), pattern.is_directory_only());
            entries.push(PatternEntry::new(polarity, pattern));
        }

        let parsed = entries.len();
        let set = Self::new(entries);
        trace_ignore_file_parsed(set.len(), parsed - set.len());
        Ok(set)
    }

    /// Returns `true` when the set has no entries and therefore matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in precedence order (lowest first).
    pub fn iter(&self) -> std::slice::Iter<'_, PatternEntry> {
        self.entries.iter()
    }

    /// Enters a directory named `name`.
    ///
    /// Returns the verdict for the directory itself (the polarity of the last
    /// entry that fully matches it, `false` if none does) and the set of
    /// patterns that still apply below it, in their original order.
    #[must_use]
    pub fn descend(&self, name: &str) -> (bool, Self) {
        let mut verdict = false;
        let mut narrowed = Vec::new();

        for entry in self.entries.iter() {
            let step = entry.pattern.match_directory(name);
            if step.matched {
                verdict = entry.polarity.verdict();
                trace_directory_verdict(name, &entry.pattern, verdict);
                debug_log!(Filter, 2, "directory {name}: {entry}");
            }
            narrowed.extend(
                step.into_patterns()
                    .map(|pattern| PatternEntry::new(entry.polarity, pattern)),
            );
        }

        (verdict, Self::new(narrowed))
    }

    /// Last-match-wins verdict for a file named `name` in the current
    /// directory.
    #[must_use]
    pub fn matches_file(&self, name: &str) -> bool {
        let mut result = false;
        for entry in self.entries.iter() {
            let positive = entry.polarity.verdict();
            if result != positive && entry.pattern.match_file(name) {
                result = positive;
                trace_file_verdict(name, &entry.pattern, positive);
                debug_log!(Filter, 3, "file {name}: {entry}");
            }
        }
        result
    }

    /// Matches a `/`-separated path relative to the set's directory.
    ///
    /// Each directory component is entered with [`descend`](Self::descend);
    /// a directory verdict of `true` matches everything below it. A trailing
    /// `/` asks about a directory, which then only matches through such a
    /// verdict.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        let mut components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        let file = if path.ends_with('/') {
            None
        } else {
            components.pop()
        };

        let mut set = self.clone();
        for name in components {
            let (matched, narrowed) = set.descend(name);
            if matched {
                return true;
            }
            if narrowed.is_empty() {
                return false;
            }
            set = narrowed;
        }
        file.is_some_and(|name| set.matches_file(name))
    }

    /// Returns a new set with `entries` appended at higher precedence.
    #[must_use]
    pub fn append<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = PatternEntry>,
    {
        Self::new(self.entries.iter().cloned().chain(entries))
    }

    /// Returns a new set where `other`'s entries take precedence over this
    /// set's.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        self.append(other.iter().cloned())
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a PatternEntry;
    type IntoIter = std::slice::Iter<'a, PatternEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One `+ pattern` / `- pattern` line per entry.
impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
