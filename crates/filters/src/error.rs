/// Error produced when pattern text cannot be turned into a [`PathPattern`](crate::PathPattern).
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Nothing remained after removing slashes and the negation marker.
    #[error("empty pattern '{pattern}'")]
    Empty {
        /// The offending pattern text.
        pattern: String,
    },
    /// A path component is not a valid glob.
    #[error("invalid pattern '{pattern}': {source}")]
    Glob {
        /// The offending pattern text.
        pattern: String,
        /// The underlying glob compilation error.
        #[source]
        source: globset::Error,
    },
}

impl PatternError {
    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Empty { pattern } | Self::Glob { pattern, .. } => pattern,
        }
    }
}

/// A pattern error in an ignore file, tagged with its 1-based line number.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct IgnoreFileError {
    line: usize,
    #[source]
    source: PatternError,
}

impl IgnoreFileError {
    pub(crate) const fn new(line: usize, source: PatternError) -> Self {
        Self { line, source }
    }

    /// 1-based line of the offending pattern.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The pattern error itself.
    #[must_use]
    pub const fn pattern_error(&self) -> &PatternError {
        &self.source
    }

    /// Consumes the error, returning the line and the pattern error.
    #[must_use]
    pub fn into_parts(self) -> (usize, PatternError) {
        (self.line, self.source)
    }
}
