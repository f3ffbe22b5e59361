//! Line tokenizer for rule files.
//!
//! Each non-blank, non-comment line holds at most one statement, optionally
//! preceded by `{`/`}` tokens and followed by `}` tokens. A heredoc value
//! consumes the following lines up to its terminator and must end its line.

use std::collections::VecDeque;
use std::iter::Enumerate;
use std::str::SplitInclusive;

use filters::{PathPattern, PatternEntry, Polarity};

use crate::env::{EnvKey, Value, parse_assignment};
use crate::{RuleError, RuleErrorKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Open,
    Close,
    Pattern(PatternEntry),
    Set(EnvKey, Value),
}

pub(crate) struct Lexer<'a> {
    lines: Enumerate<SplitInclusive<'a, char>>,
    line: usize,
    pending: VecDeque<(usize, Token)>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n').enumerate(),
            line: 0,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    fn error(&self, kind: impl Into<RuleErrorKind>) -> RuleError {
        RuleError::new(self.line, kind.into())
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let (index, raw) = self.lines.next()?;
        self.line = index + 1;
        Some(raw)
    }

    /// Reads one source line into `pending`. Returns `false` at end of input.
    fn fill(&mut self) -> Result<bool, RuleError> {
        loop {
            let Some(raw) = self.next_line() else {
                return Ok(false);
            };
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.tokenize(line)?;
            return Ok(true);
        }
    }

    fn tokenize(&mut self, line: &str) -> Result<(), RuleError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let lead = fields
            .iter()
            .take_while(|field| matches!(**field, "{" | "}"))
            .count();
        let trail = fields[lead..]
            .iter()
            .rev()
            .take_while(|field| **field == "}")
            .count();
        let statement = &fields[lead..fields.len() - trail];
        let here = self.line;

        for field in &fields[..lead] {
            let token = if *field == "{" { Token::Open } else { Token::Close };
            self.pending.push_back((here, token));
        }
        if !statement.is_empty() {
            let (token, heredoc) = self.statement(statement)?;
            if heredoc && trail > 0 {
                return Err(RuleError::new(here, RuleErrorKind::HeredocNotLast));
            }
            self.pending.push_back((here, token));
        }
        for _ in 0..trail {
            self.pending.push_back((here, Token::Close));
        }
        Ok(())
    }

    /// Parses one statement. The flag reports whether it was a heredoc.
    fn statement(&mut self, fields: &[&str]) -> Result<(Token, bool), RuleError> {
        let here = self.line;
        let marker = match fields[0] {
            "+" => Some('+'),
            "-" => Some('-'),
            _ => None,
        };
        if let Some(marker) = marker {
            let [_, text] = fields else {
                return Err(self.error(RuleErrorKind::ExpectedPattern { marker }));
            };
            let pattern = PathPattern::parse(text).map_err(|err| self.error(err))?;
            let polarity = if marker == '+' {
                Polarity::Positive
            } else {
                Polarity::Negative
            };
            return Ok((Token::Pattern(PatternEntry::new(polarity, pattern)), false));
        }

        match fields {
            [name] => {
                let (key, value) = parse_assignment(name, None).map_err(|err| self.error(err))?;
                Ok((Token::Set(key, value), false))
            }
            [name, "="] => {
                let (key, value) =
                    parse_assignment(name, Some("")).map_err(|err| self.error(err))?;
                Ok((Token::Set(key, value), false))
            }
            [name, "=", data] => match data.strip_prefix("<<") {
                Some(terminator) => {
                    if terminator.is_empty() {
                        return Err(self.error(RuleErrorKind::MissingHeredocToken));
                    }
                    let body = self.heredoc(terminator)?;
                    let (key, value) = parse_assignment(name, Some(body.as_str()))
                        .map_err(|err| RuleError::new(here, err.into()))?;
                    Ok((Token::Set(key, value), true))
                }
                None => {
                    let (key, value) =
                        parse_assignment(name, Some(*data)).map_err(|err| self.error(err))?;
                    Ok((Token::Set(key, value), false))
                }
            },
            [_, "=", ..] => Err(self.error(RuleErrorKind::TooManyFields)),
            _ => Err(self.error(RuleErrorKind::Syntax(fields.join(" ")))),
        }
    }

    fn heredoc(&mut self, terminator: &str) -> Result<String, RuleError> {
        let start = self.line;
        let mut body = String::new();
        while let Some(raw) = self.next_line() {
            if raw.trim_end() == terminator {
                return Ok(body);
            }
            body.push_str(raw);
            if !raw.ends_with('\n') {
                body.push('\n');
            }
        }
        Err(RuleError::new(
            start,
            RuleErrorKind::UnterminatedHeredoc {
                token: terminator.to_owned(),
            },
        ))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(usize, Token), RuleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.pending.is_empty() {
            match self.fill() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        self.pending.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<(usize, Token)> {
        Lexer::new(text).collect::<Result<_, _>>().unwrap()
    }

    fn error(text: &str) -> RuleError {
        Lexer::new(text)
            .find_map(Result::err)
            .expect("input should not tokenize")
    }

    #[test]
    fn braces_around_one_statement() {
        let toks = tokens("{ guards }\n} {\n");
        let kinds: Vec<&Token> = toks.iter().map(|(_, token)| token).collect();
        assert_eq!(
            kinds,
            [
                &Token::Open,
                &Token::Set(EnvKey::Guards, Value::Bool(true)),
                &Token::Close,
                &Token::Close,
                &Token::Open,
            ]
        );
        assert_eq!(toks[3].0, 2);
    }

    #[test]
    fn comments_and_blank_lines_count_towards_line_numbers() {
        let toks = tokens("# header\n\n   width = 80\n");
        assert_eq!(toks, [(3, Token::Set(EnvKey::Width, Value::Int(80)))]);
    }

    #[test]
    fn empty_assignment() {
        let toks = tokens("config_header =\n");
        assert_eq!(
            toks[0].1,
            Token::Set(EnvKey::ConfigHeader, Value::Str(String::new()))
        );
        assert!(error("guards =\n").to_string().contains("expected true or false"));
    }

    #[test]
    fn heredoc_reads_until_terminator() {
        let text = "copyright_notice = <<END\nCopyright {year}\n  Someone\n  END\nwidth = 1\n";
        let toks = tokens(text);
        assert_eq!(
            toks[0],
            (
                1,
                Token::Set(
                    EnvKey::CopyrightNotice,
                    Value::Str("Copyright {year}\n  Someone\n".into())
                )
            )
        );
        assert_eq!(toks[1].0, 5);
    }

    #[test]
    fn indented_terminator_is_part_of_the_body() {
        let text = "copyright_notice = <<END\n  END\nEND  \nwidth = 1\n";
        let toks = tokens(text);
        assert_eq!(
            toks[0].1,
            Token::Set(EnvKey::CopyrightNotice, Value::Str("  END\n".into()))
        );
        assert_eq!(toks[1].0, 4);
    }

    #[test]
    fn heredoc_errors() {
        assert!(matches!(
            error("copyright_notice = <<\n").kind(),
            RuleErrorKind::MissingHeredocToken
        ));
        let err = error("\ncopyright_notice = <<END\nnever closed\n");
        assert_eq!(err.line(), 2);
        assert!(matches!(err.kind(), RuleErrorKind::UnterminatedHeredoc { .. }));
        assert!(matches!(
            error("{ copyright_notice = <<END }\nx\nEND\n").kind(),
            RuleErrorKind::HeredocNotLast
        ));
    }

    #[test]
    fn statement_errors() {
        assert!(matches!(error("a = b c\n").kind(), RuleErrorKind::TooManyFields));
        assert!(matches!(
            error("+ a b\n").kind(),
            RuleErrorKind::ExpectedPattern { marker: '+' }
        ));
        assert!(matches!(
            error("-\n").kind(),
            RuleErrorKind::ExpectedPattern { marker: '-' }
        ));
        assert!(matches!(error("guards true\n").kind(), RuleErrorKind::Syntax(_)));
        assert!(matches!(error("{ a { b\n").kind(), RuleErrorKind::Syntax(_)));
        assert_eq!(
            error("\n\ncolour = red\n").to_string(),
            "line 3: unknown variable: 'colour'"
        );
    }

    #[test]
    fn stops_after_first_error() {
        let mut lexer = Lexer::new("a = b c\nguards\n");
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }
}
