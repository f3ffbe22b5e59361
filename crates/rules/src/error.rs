use filters::PatternError;

use crate::EnvKey;

/// A rejected assignment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// The name is not a configuration key.
    #[error("unknown variable: '{key}'")]
    UnknownKey {
        /// The name as written.
        key: String,
    },
    /// A non-boolean key was written without a value.
    #[error("missing value for {key}")]
    MissingValue {
        /// Key that needs a value.
        key: EnvKey,
    },
    /// The value does not parse or is out of range for the key.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Key being assigned.
        key: EnvKey,
        /// What is wrong with the value.
        reason: String,
    },
}

/// What went wrong on a rule-file line.
#[derive(Debug, thiserror::Error)]
pub enum RuleErrorKind {
    /// A `}` without an open block.
    #[error("extra closing brace")]
    ExtraBrace,
    /// End of input with a block still open; the line is where it opened.
    #[error("missing closing brace")]
    MissingBrace,
    /// A pattern line outside of any block.
    #[error("pattern line outside of a block")]
    UnexpectedPattern,
    /// `+` or `-` without exactly one pattern after it.
    #[error("expected a single pattern after '{marker}'")]
    ExpectedPattern {
        /// The `+` or `-` marker.
        marker: char,
    },
    /// More tokens than `key = value`.
    #[error("too many fields")]
    TooManyFields,
    /// `key = <<` without a terminator token.
    #[error("missing heredoc token")]
    MissingHeredocToken,
    /// The terminator line never appeared.
    #[error("heredoc terminator '{token}' not found")]
    UnterminatedHeredoc {
        /// Terminator that was expected.
        token: String,
    },
    /// A `}` after a heredoc start on the same line.
    #[error("heredoc must end its line")]
    HeredocNotLast,
    /// Anything else that is not a statement.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Rejected assignment.
    #[error(transparent)]
    Env(#[from] EnvError),
    /// Malformed pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A rule file that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct RuleError {
    line: usize,
    #[source]
    kind: RuleErrorKind,
}

impl RuleError {
    pub(crate) const fn new(line: usize, kind: RuleErrorKind) -> Self {
        Self { line, kind }
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The failure itself.
    #[must_use]
    pub const fn kind(&self) -> &RuleErrorKind {
        &self.kind
    }

    /// The failure message without the line prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
