use std::io;
use std::path::PathBuf;

use filters::PatternError;
use rules::RuleError;
use walk::ScanError;

use crate::{EXIT_SCAN, EXIT_USAGE};

/// Reasons a run ends early.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Failure {
    /// A `--info` or `--debug` token was not understood.
    #[error("{0}")]
    Verbosity(String),
    /// A path operand does not exist or cannot be resolved.
    #[error("cannot access '{}': {source}", path.display())]
    Operand {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A path operand lies outside the scan root.
    #[error("path not contained in repository: {}", path.display())]
    OutsideRoot { path: PathBuf },
    /// An `--ignore` pattern or operand could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// The rule file given to `--dump-rules` could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    ReadRules {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The rule file given to `--dump-rules` is malformed.
    #[error("{}: {source}", path.display())]
    RuleSyntax {
        path: PathBuf,
        #[source]
        source: RuleError,
    },
    /// The scan stopped on an unreadable or malformed file.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// Standard output went away.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl Failure {
    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Verbosity(_)
            | Self::Operand { .. }
            | Self::OutsideRoot { .. }
            | Self::Pattern(_) => EXIT_USAGE,
            Self::ReadRules { .. } | Self::RuleSyntax { .. } | Self::Scan(_) | Self::Output(_) => {
                EXIT_SCAN
            }
        }
    }
}
