use std::fmt;

/// Whether a matching pattern turns its verdict on or off.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Polarity {
    /// A match sets the verdict to `true` (`+` in rule files, a plain line in
    /// ignore files).
    Positive,
    /// A match sets the verdict back to `false` (`-` in rule files, `!` in
    /// ignore files).
    Negative,
}

impl Polarity {
    /// The verdict a match with this polarity produces.
    #[must_use]
    pub const fn verdict(self) -> bool {
        matches!(self, Self::Positive)
    }

    /// Polarity producing the given verdict.
    #[must_use]
    pub const fn from_verdict(verdict: bool) -> Self {
        if verdict {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("+"),
            Self::Negative => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Polarity;

    #[test]
    fn display_variants_match_rule_file_tokens() {
        let cases = [(Polarity::Positive, "+"), (Polarity::Negative, "-")];

        for (polarity, expected) in cases {
            assert_eq!(polarity.to_string(), expected);
            assert_eq!(Polarity::from_verdict(polarity.verdict()), polarity);
        }
    }
}
