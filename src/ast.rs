use std::collections::BTreeSet;

/// A concatenation of nodes.
pub type Sequence = Vec<RegexNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    Literal(char),
    Dot,
    Class(ClassKind),
    CharGroup {
        chars: BTreeSet<char>,
        negated: bool,
    },
    /// `id` is `None` only for the implicit wrapper around top-level `|`.
    Group {
        id: Option<usize>,
        alternatives: Vec<Sequence>,
    },
    BackRef {
        id: usize,
    },
    Repeat {
        node: Box<RegexNode>,
        kind: RepeatKind,
    },
}

impl RegexNode {
    /// Whether a `?` or `+` may follow this node.
    pub fn is_quantifiable(&self) -> bool {
        matches!(
            self,
            RegexNode::Literal(_)
                | RegexNode::Dot
                | RegexNode::Class(_)
                | RegexNode::CharGroup { .. }
        )
    }

    /// Test a single character against a one-character node.
    ///
    /// Returns `false` for nodes that do not consume exactly one character.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            RegexNode::Literal(l) => *l == c,
            RegexNode::Dot => true,
            RegexNode::Class(kind) => kind.accepts(c),
            RegexNode::CharGroup { chars, negated } => chars.contains(&c) != *negated,
            RegexNode::Group { .. } | RegexNode::BackRef { .. } | RegexNode::Repeat { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// `\d`
    Digit,
    /// `\w`
    Word,
}

impl ClassKind {
    pub fn accepts(self, c: char) -> bool {
        match self {
            ClassKind::Digit => c.is_ascii_digit(),
            ClassKind::Word => c.is_ascii_alphanumeric(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    ZeroOrOne,
    OneOrMore,
}

impl RepeatKind {
    pub fn min(self) -> usize {
        match self {
            RepeatKind::ZeroOrOne => 0,
            RepeatKind::OneOrMore => 1,
        }
    }

    /// `None` means unbounded.
    pub fn max(self) -> Option<usize> {
        match self {
            RepeatKind::ZeroOrOne => Some(1),
            RepeatKind::OneOrMore => None,
        }
    }
}

/// A parsed pattern, ready to be matched any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub(crate) source: String,
    pub(crate) has_start_anchor: bool,
    pub(crate) has_end_anchor: bool,
    pub(crate) body: Sequence,
    pub(crate) group_count: usize,
    pub(crate) step_limit: usize,
}

impl CompiledPattern {
    /// The pattern text this was compiled from, anchors included.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn has_start_anchor(&self) -> bool {
        self.has_start_anchor
    }

    pub fn has_end_anchor(&self) -> bool {
        self.has_end_anchor
    }

    pub fn body(&self) -> &[RegexNode] {
        &self.body
    }

    /// Number of capturing groups.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Replace the backtracking budget used by every match call.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }
}

impl std::fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
