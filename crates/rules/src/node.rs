use std::fmt;
use std::sync::Arc;

use filters::{IgnoreFileError, PatternEntry, PatternSet};
use logging::debug_log;

use crate::env::{EnvKey, Value, dump_assignment, to_macro};
use crate::lexer::{Lexer, Token};
use crate::{Environment, Overlay, RuleError, RuleErrorKind};

/// A rule block guarded by the patterns that select it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    patterns: PatternSet,
    node: Arc<RuleNode>,
}

impl Rule {
    /// Guards `node` with `patterns`.
    #[must_use]
    pub fn new(patterns: PatternSet, node: RuleNode) -> Self {
        Self {
            patterns,
            node: Arc::new(node),
        }
    }

    /// Patterns selecting the paths the block applies to.
    #[must_use]
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// The guarded block.
    #[must_use]
    pub fn node(&self) -> &RuleNode {
        &self.node
    }
}

/// Scoped settings for a directory and everything below it.
///
/// A node carries a partial [`Overlay`] that applies to every path under it
/// and an ordered list of child [`Rule`]s whose overlays apply only to the
/// paths their patterns select. Nodes are never modified: entering a
/// directory with [`descend`](Self::descend) derives a new node.
///
/// # Examples
///
/// ```
/// use rules::RuleNode;
///
/// let node = RuleNode::read("width = 80\n{\n+ *.h\nguards\n}\n").unwrap();
///
/// let header = node.effective_env("util.h").unwrap();
/// assert!(header.guards());
/// assert_eq!(header.width(), 80);
/// assert_eq!(header.guardname(), "UTIL_H");
///
/// assert!(!node.effective_env("util.c").unwrap().guards());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleNode {
    env: Overlay,
    children: Vec<Rule>,
}

struct Frame {
    open_line: usize,
    env: Overlay,
    patterns: Vec<PatternEntry>,
    children: Vec<Rule>,
}

impl Frame {
    const fn new(open_line: usize) -> Self {
        Self {
            open_line,
            env: Overlay::new(),
            patterns: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl RuleNode {
    /// Builds a node from its parts.
    #[must_use]
    pub const fn new(env: Overlay, children: Vec<Rule>) -> Self {
        Self { env, children }
    }

    /// Parses rule-file text.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleError`] in the text.
    pub fn read(text: &str) -> Result<Self, RuleError> {
        let mut stack = vec![Frame::new(0)];

        for item in Lexer::new(text) {
            let (line, token) = item?;
            match token {
                Token::Open => stack.push(Frame::new(line)),
                Token::Close => {
                    let frame = match stack.pop() {
                        Some(frame) if !stack.is_empty() => frame,
                        _ => return Err(RuleError::new(line, RuleErrorKind::ExtraBrace)),
                    };
                    let rule = Rule::new(
                        PatternSet::new(frame.patterns),
                        Self::new(frame.env, frame.children),
                    );
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(rule);
                    }
                }
                Token::Pattern(entry) => {
                    if stack.len() == 1 {
                        return Err(RuleError::new(line, RuleErrorKind::UnexpectedPattern));
                    }
                    if let Some(frame) = stack.last_mut() {
                        frame.patterns.push(entry);
                    }
                }
                Token::Set(key, value) => {
                    if let Some(frame) = stack.last_mut() {
                        frame
                            .env
                            .set(key, value)
                            .map_err(|err| RuleError::new(line, err.into()))?;
                    }
                }
            }
        }

        if stack.len() > 1 {
            let open_line = stack.last().map_or(0, |frame| frame.open_line);
            return Err(RuleError::new(open_line, RuleErrorKind::MissingBrace));
        }
        let Some(top) = stack.pop() else {
            return Ok(Self::default());
        };
        Ok(Self::new(top.env, top.children))
    }

    /// A node that ignores every path `patterns` matches.
    #[must_use]
    pub fn from_ignore_set(patterns: PatternSet) -> Self {
        if patterns.is_empty() {
            return Self::default();
        }
        let mut ignore = Overlay::new();
        ignore.insert(EnvKey::Ignore, Value::Bool(true));
        let rule = Rule::new(patterns, Self::new(ignore, Vec::new()));
        Self::new(Overlay::new(), vec![rule])
    }

    /// Parses gitignore-style text into an ignoring node.
    ///
    /// # Errors
    ///
    /// Returns [`IgnoreFileError`] for the first invalid pattern.
    pub fn from_ignore_text(text: &str) -> Result<Self, IgnoreFileError> {
        PatternSet::from_ignore_text(text).map(Self::from_ignore_set)
    }

    /// Assignments applying to everything under this node.
    #[must_use]
    pub const fn env(&self) -> &Overlay {
        &self.env
    }

    /// Child rules in precedence order.
    #[must_use]
    pub fn children(&self) -> &[Rule] {
        &self.children
    }

    /// Returns `true` when the node neither assigns nor holds rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.children.is_empty()
    }

    /// Node overlay plus the guard name derived for `name`.
    fn base_env(&self, name: &str) -> Overlay {
        let prefix = self
            .env
            .get(EnvKey::GuardName)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let component = to_macro(name);
        let guardname = match (prefix.is_empty(), component.is_empty()) {
            (true, _) => component,
            (false, true) => prefix.to_owned(),
            (false, false) => format!("{prefix}_{component}"),
        };

        let mut env = self.env.clone();
        env.insert(EnvKey::GuardName, Value::Str(guardname));
        env
    }

    /// Settings for the file `name` in this node's directory, or `None` when
    /// the file is ignored.
    #[must_use]
    pub fn effective_env(&self, name: &str) -> Option<Environment> {
        let mut env = self.base_env(name);
        for rule in &self.children {
            if rule.patterns.matches_file(name) {
                debug_log!(
                    Rules,
                    2,
                    "file {name}: applying {}",
                    OverlaySummary(&rule.node.env)
                );
                env.merge(&rule.node.env);
            }
        }

        let env = Environment::default().overlaid(&env);
        if env.ignore() {
            debug_log!(Rules, 1, "file {name}: ignored");
            return None;
        }
        Some(env)
    }

    /// The node for the subdirectory `name`, or `None` when the directory is
    /// ignored.
    ///
    /// Child rules whose patterns fully match the directory contribute their
    /// overlay and splice their own children in; rules whose patterns can
    /// still match deeper are kept with the narrowed patterns.
    #[must_use]
    pub fn descend(&self, name: &str) -> Option<Self> {
        let mut env = self.base_env(name);
        let mut children = Vec::new();

        for rule in &self.children {
            let (matched, narrowed) = rule.patterns.descend(name);
            if !narrowed.is_empty() {
                children.push(Rule {
                    patterns: narrowed,
                    node: Arc::clone(&rule.node),
                });
            }
            if matched {
                debug_log!(
                    Rules,
                    2,
                    "directory {name}: applying {}",
                    OverlaySummary(&rule.node.env)
                );
                env.merge(&rule.node.env);
                children.extend(rule.node.children.iter().cloned());
            }
        }

        if env.get(EnvKey::Ignore) == Some(&Value::Bool(true)) {
            debug_log!(Rules, 1, "directory {name}: ignored");
            return None;
        }
        Some(Self::new(env, children))
    }

    /// Combines two nodes; `other`'s assignments win and its rules follow
    /// this node's.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let env = self.env.merged(&other.env);
        let children = self
            .children
            .iter()
            .chain(other.children.iter())
            .cloned()
            .collect();
        Self::new(env, children)
    }

    fn dump(
        &self,
        f: &mut fmt::Formatter<'_>,
        depth: usize,
        patterns: Option<&PatternSet>,
    ) -> fmt::Result {
        let indent = depth * 4;
        if let Some(patterns) = patterns {
            for entry in patterns {
                writeln!(f, "{:indent$}{entry}", "")?;
            }
        }
        for (key, value) in self.env.iter() {
            writeln!(f, "{:indent$}{}", "", dump_assignment(key, value))?;
        }
        for rule in &self.children {
            writeln!(f, "{:indent$}{{", "")?;
            rule.node.dump(f, depth + 1, Some(&rule.patterns))?;
            writeln!(f, "{:indent$}}}", "")?;
        }
        Ok(())
    }
}

/// The node in rule-file syntax, children indented by four spaces.
///
/// Heredoc bodies are written unindented so they read back unchanged.
impl fmt::Display for RuleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0, None)
    }
}

/// Single-line rendering of an overlay for diagnostics.
struct OverlaySummary<'a>(&'a Overlay);

impl fmt::Display for OverlaySummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(no assignments)");
        }
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            match value {
                Value::Str(text) => write!(f, "{key}={text:?}")?,
                _ => write!(f, "{key}={value}")?,
            }
        }
        Ok(())
    }
}
