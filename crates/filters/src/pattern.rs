use std::fmt;
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};

use crate::PatternError;

#[derive(Clone, Debug)]
enum Matcher {
    Literal,
    Glob(GlobMatcher),
    /// Trailing marker of a directory-only pattern; never matches a name.
    Directory,
}

#[derive(Clone, Debug)]
struct Segment {
    text: Box<str>,
    matcher: Matcher,
}

impl Segment {
    fn glob(component: &str, pattern: &str) -> Result<Self, PatternError> {
        let Some(glob) = translate_glob(component) else {
            return Ok(Self::literal(component));
        };
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|source| PatternError::Glob {
                pattern: pattern.to_owned(),
                source,
            })?
            .compile_matcher();
        Ok(Self {
            text: component.into(),
            matcher: Matcher::Glob(matcher),
        })
    }

    fn literal(component: &str) -> Self {
        Self {
            text: component.into(),
            matcher: Matcher::Literal,
        }
    }

    fn directory() -> Self {
        Self {
            text: "".into(),
            matcher: Matcher::Directory,
        }
    }

    fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => *self.text == *name,
            Matcher::Glob(matcher) => matcher.is_match(name),
            Matcher::Directory => false,
        }
    }

    const fn is_directory_marker(&self) -> bool {
        matches!(self.matcher, Matcher::Directory)
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && std::mem::discriminant(&self.matcher) == std::mem::discriminant(&other.matcher)
    }
}

impl Eq for Segment {}

/// Rewrites one path component from shell glob syntax into `globset` syntax.
///
/// Returns `None` when the component has no wildcards and can be compared
/// literally. Braces are literal, a `[` without a closing `]` is literal, and
/// runs of `*` collapse to one (a component never contains `/`).
fn translate_glob(component: &str) -> Option<String> {
    if !component.contains(['*', '?', '[']) {
        return None;
    }

    let chars: Vec<char> = component.chars().collect();
    let mut out = String::with_capacity(component.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while i + 1 < chars.len() && chars[i + 1] == '*' {
                    i += 1;
                }
            }
            '[' => {
                if let Some(end) = class_end(&chars, i) {
                    out.extend(&chars[i..=end]);
                    i = end;
                } else {
                    out.push_str("[[]");
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            c => out.push(c),
        }
        i += 1;
    }
    Some(out)
}

/// Index of the `]` closing the class opened at `start`, using shell rules:
/// a leading `!` negates and a `]` right after the opening is literal.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

/// Remaining path components of a [`PathPattern`].
///
/// Segments are shared between a pattern and every remainder derived from it;
/// a remainder is a view starting further into the same storage.
#[derive(Clone, Debug)]
pub struct Segments {
    parts: Arc<[Segment]>,
    start: usize,
}

impl Segments {
    fn new(parts: Vec<Segment>) -> Self {
        Self {
            parts: parts.into(),
            start: 0,
        }
    }

    fn remaining(&self) -> &[Segment] {
        &self.parts[self.start..]
    }

    fn tail(&self) -> Self {
        Self {
            parts: Arc::clone(&self.parts),
            start: self.start + 1,
        }
    }

    /// Number of remaining segments, counting the directory marker.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len() - self.start
    }

    /// Always `false`; a pattern keeps at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Segment texts in order. A directory-only pattern ends with `""`.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.remaining().iter().map(|segment| &*segment.text)
    }
}

impl PartialEq for Segments {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
    }
}

impl Eq for Segments {}

/// One compiled path pattern.
///
/// A pattern is a sequence of glob segments, optionally followed by a
/// directory marker. [`Rooted`](Self::Rooted) patterns only match starting at
/// the directory that declared them; [`Unrooted`](Self::Unrooted) patterns
/// match at any depth below it.
///
/// Matching is incremental: [`match_directory`](Self::match_directory)
/// consumes one path component and hands back whatever part of the pattern
/// still applies below that directory.
///
/// # Examples
///
/// ```
/// use filters::PathPattern;
///
/// let pattern = PathPattern::parse("src/*.rs").unwrap();
/// let step = pattern.match_directory("src");
/// assert!(!step.matched);
///
/// let rest = step.remainder.unwrap();
/// assert!(rest.is_rooted());
/// assert!(rest.match_file("main.rs"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathPattern {
    /// Anchored to the declaring directory.
    Rooted(Segments),
    /// Tried again at every depth below the declaring directory.
    Unrooted(Segments),
}

/// Outcome of [`PathPattern::match_directory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryMatch {
    /// The directory itself is matched by the whole pattern.
    pub matched: bool,
    /// What is left of the pattern after consuming the directory name, rooted
    /// at that directory.
    pub remainder: Option<PathPattern>,
    /// The unchanged pattern, present for unrooted patterns.
    pub carried: Option<PathPattern>,
}

impl DirectoryMatch {
    /// Patterns that still apply below the directory, remainder first.
    pub fn into_patterns(self) -> impl Iterator<Item = PathPattern> {
        self.remainder.into_iter().chain(self.carried)
    }
}

impl PathPattern {
    /// Parses gitignore-style pattern text.
    ///
    /// A leading `/` roots the pattern and a trailing `/` makes it
    /// directory-only. Empty components are dropped.
    ///
    /// # Errors
    ///
    /// [`PatternError::Empty`] when no component remains, and
    /// [`PatternError::Glob`] when a component is not a valid glob.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let rooted = text.starts_with('/');
        let directory = text.ends_with('/');

        let mut parts = text
            .split('/')
            .filter(|component| !component.is_empty())
            .map(|component| Segment::glob(component, text))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(PatternError::Empty {
                pattern: text.to_owned(),
            });
        }
        if directory {
            parts.push(Segment::directory());
        }

        let segments = Segments::new(parts);
        Ok(if rooted {
            Self::Rooted(segments)
        } else {
            Self::Unrooted(segments)
        })
    }

    /// Builds a rooted pattern that matches exactly the given path components,
    /// with no wildcard interpretation.
    pub fn literal<I, S>(components: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let components: Vec<S> = components.into_iter().collect();
        let texts: Vec<&str> = components.iter().map(|c| c.as_ref()).collect();
        let parts: Vec<Segment> = texts
            .iter()
            .filter(|component| !component.is_empty())
            .map(|component| Segment::literal(component))
            .collect();
        if parts.is_empty() {
            return Err(PatternError::Empty {
                pattern: texts.join("/"),
            });
        }
        Ok(Self::Rooted(Segments::new(parts)))
    }

    /// The same pattern, rooted at its declaring directory.
    #[must_use]
    pub fn anchored(&self) -> Self {
        match self {
            Self::Rooted(_) => self.clone(),
            Self::Unrooted(segments) => Self::Rooted(segments.clone()),
        }
    }

    /// Returns `true` for [`Rooted`](Self::Rooted) patterns.
    #[must_use]
    pub const fn is_rooted(&self) -> bool {
        matches!(self, Self::Rooted(_))
    }

    /// Returns `true` when the pattern only matches directories.
    #[must_use]
    pub fn is_directory_only(&self) -> bool {
        self.segments()
            .remaining()
            .last()
            .is_some_and(Segment::is_directory_marker)
    }

    /// The remaining segments.
    #[must_use]
    pub const fn segments(&self) -> &Segments {
        match self {
            Self::Rooted(segments) | Self::Unrooted(segments) => segments,
        }
    }

    fn head(&self) -> &Segment {
        &self.segments().remaining()[0]
    }

    /// Matches the leading segment against a single path component.
    #[must_use]
    pub fn match_segment(&self, name: &str) -> bool {
        self.head().matches(name)
    }

    /// Applies the pattern to a directory named `name`.
    ///
    /// The leading segment is consumed when it matches. If nothing but (at
    /// most) the directory marker is left, the directory itself is matched;
    /// otherwise the tail becomes a rooted remainder. Unrooted patterns are
    /// carried below the directory unchanged either way.
    #[must_use]
    pub fn match_directory(&self, name: &str) -> DirectoryMatch {
        let segments = self.segments();
        let rest = segments.remaining();
        let mut result = DirectoryMatch {
            matched: false,
            remainder: None,
            carried: None,
        };

        if rest[0].matches(name) {
            match rest {
                [_] => result.matched = true,
                [_, marker] if marker.is_directory_marker() => result.matched = true,
                _ => result.remainder = Some(Self::Rooted(segments.tail())),
            }
        }
        if let Self::Unrooted(_) = self {
            result.carried = Some(self.clone());
        }
        result
    }

    /// Returns `true` when exactly one non-marker segment remains and it
    /// matches `name`.
    #[must_use]
    pub fn match_file(&self, name: &str) -> bool {
        match self.segments().remaining() {
            [only] => only.matches(name),
            _ => false,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rooted() {
            f.write_str("/")?;
        }
        for (index, text) in self.segments().iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            f.write_str(text)?;
        }
        Ok(())
    }
}
