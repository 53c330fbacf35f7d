use std::collections::BTreeSet;

use crate::ast::{ClassKind, CompiledPattern, RegexNode, RepeatKind, Sequence};
use crate::error::PatternError;
use crate::matcher::DEFAULT_STEP_LIMIT;

/// Deepest group nesting `compile` accepts.
pub const MAX_NESTING: usize = 128;

/// Compile `pattern` into a [`CompiledPattern`].
///
/// A leading `^` and a trailing unescaped `$` become anchors; everywhere else
/// they are ordinary characters.
///
/// Example:
/// - Pattern: `^(cat|dog)s?$` → start and end anchored, one capturing group
pub fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let (has_start_anchor, rest) = match pattern.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (has_end_anchor, body_src) = match rest.strip_suffix('$') {
        Some(body) if !ends_in_escape(body) => (true, body),
        _ => (false, rest),
    };

    let offset = pattern.len() - rest.len();
    let mut p = Parser::new(body_src, offset);
    let mut alternatives = p.parse_alt()?;
    if p.peek() == Some(')') {
        return Err(PatternError::UnbalancedParen { pos: p.offset() });
    }
    p.check_backrefs()?;

    let body = if alternatives.len() == 1 {
        alternatives.pop().unwrap_or_default()
    } else {
        vec![RegexNode::Group {
            id: None,
            alternatives,
        }]
    };

    Ok(CompiledPattern {
        source: pattern.to_string(),
        has_start_anchor,
        has_end_anchor,
        body,
        group_count: p.group_count(),
        step_limit: DEFAULT_STEP_LIMIT,
    })
}

/// Whether `s` ends in an odd run of backslashes, i.e. escapes whatever follows.
fn ends_in_escape(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Parser for regular expressions.
///
/// The `Parser` struct holds the pattern body and the current position.
/// It also manages group IDs for capturing groups and remembers every
/// backreference so they can be validated once all groups are known.
pub struct Parser<'a> {
    pub pattern: &'a str,
    pub pos: usize,
    /// Byte offset of `pattern` inside the text the user wrote.
    base: usize,
    next_group_id: usize,
    backrefs: Vec<(usize, usize)>,
    /// Groups currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given pattern body.
    pub fn new(pattern: &'a str, base: usize) -> Self {
        Self {
            pattern,
            pos: 0,
            base,
            next_group_id: 1,
            backrefs: Vec::new(),
            depth: 0,
        }
    }

    /// Allocate a new group ID for capturing groups.
    fn alloc_group_id(&mut self) -> usize {
        let id = self.next_group_id;
        self.next_group_id += 1;
        id
    }

    /// Number of capturing groups allocated so far.
    pub fn group_count(&self) -> usize {
        self.next_group_id - 1
    }

    /// Current position in the user's pattern, for error reporting.
    fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Peek at the next character in the pattern without advancing.
    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    /// Advance the parser by one character and return it.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Expect a specific character and advance if it matches.
    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse alternation (`|`) up to the end of the pattern or a closing `)`.
    ///
    /// Example:
    /// - Pattern: `a|bc` → [[Literal('a')], [Literal('b'), Literal('c')]]
    /// - Pattern: `abc`  → [[Literal('a'), Literal('b'), Literal('c')]]
    fn parse_alt(&mut self) -> Result<Vec<Sequence>, PatternError> {
        let mut branches = vec![self.parse_seq()?];
        while self.expect('|') {
            branches.push(self.parse_seq()?);
        }
        Ok(branches)
    }

    /// Parse a sequence of regex atoms (concatenation).
    ///
    /// Example:
    /// - Pattern: `a(b|c)d` → [Literal('a'), Group, Literal('d')]
    fn parse_seq(&mut self) -> Result<Sequence, PatternError> {
        let mut nodes = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                ')' | '|' => break,
                // Any quantifier seen here did not directly follow a quantifiable atom.
                '?' | '+' => return Err(PatternError::DanglingQuantifier { pos: self.offset() }),
                _ => nodes.push(self.parse_repeat(ch)?),
            }
        }
        Ok(nodes)
    }

    /// Parse repetition operators (`?`, `+`) after an atom.
    ///
    /// Example:
    /// - Pattern: `a?` → Repeat { node: Literal('a'), kind: ZeroOrOne }
    /// - Pattern: `b+` → Repeat { node: Literal('b'), kind: OneOrMore }
    /// - Pattern: `c`  → Literal('c')
    fn parse_repeat(&mut self, ch: char) -> Result<RegexNode, PatternError> {
        let atom = self.parse_atom(ch)?;
        if !atom.is_quantifiable() {
            return Ok(atom);
        }
        let kind = match self.peek() {
            Some('?') => RepeatKind::ZeroOrOne,
            Some('+') => RepeatKind::OneOrMore,
            _ => return Ok(atom),
        };
        self.advance();
        Ok(RegexNode::Repeat {
            node: Box::new(atom),
            kind,
        })
    }

    /// Parse a single regex atom: group, char group, escape or literal.
    ///
    /// Examples:
    /// - Pattern: `(abc)` → Group { id: Some(1), alternatives: [[a, b, c]] }
    /// - Pattern: `[abc]` → CharGroup { chars: {a, b, c}, negated: false }
    /// - Pattern: `\d`    → Class(Digit)
    /// - Pattern: `\1`    → BackRef { id: 1 }
    /// - Pattern: `.`     → Dot
    /// - Pattern: `a`     → Literal('a')
    fn parse_atom(&mut self, ch: char) -> Result<RegexNode, PatternError> {
        match ch {
            '(' => {
                let open = self.offset();
                if self.depth == MAX_NESTING {
                    return Err(PatternError::TooDeep {
                        pos: open,
                        limit: MAX_NESTING,
                    });
                }
                self.advance();
                // Allocated before the contents so nested groups number by opening paren.
                let id = self.alloc_group_id();
                self.depth += 1;
                let alternatives = self.parse_alt()?;
                self.depth -= 1;
                if !self.expect(')') {
                    return Err(PatternError::UnbalancedParen { pos: open });
                }
                Ok(RegexNode::Group {
                    id: Some(id),
                    alternatives,
                })
            }
            '[' => self.parse_char_group(),
            '\\' => self.parse_escape(),
            '.' => {
                self.advance();
                Ok(RegexNode::Dot)
            }
            c => {
                self.advance();
                Ok(RegexNode::Literal(c))
            }
        }
    }

    /// Parse an escape: `\d`, `\w`, `\N` or an escaped punctuation character.
    fn parse_escape(&mut self) -> Result<RegexNode, PatternError> {
        let start = self.offset();
        self.advance(); // consume '\'
        match self.advance() {
            Some('d') => Ok(RegexNode::Class(ClassKind::Digit)),
            Some('w') => Ok(RegexNode::Class(ClassKind::Word)),
            Some(c @ '0'..='9') => {
                // \1, \2, ... are backreferences; validated once the whole pattern is read
                let mut id = (c as u8 - b'0') as usize;
                while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
                    self.advance();
                    id = id.saturating_mul(10).saturating_add(d as usize);
                }
                self.backrefs.push((id, start));
                Ok(RegexNode::BackRef { id })
            }
            Some(c) if c.is_ascii_punctuation() => Ok(RegexNode::Literal(c)),
            _ => Err(PatternError::UnknownEscape { pos: start }),
        }
    }

    /// Parse a character group, e.g. `[abc]` or `[^abc]`.
    ///
    /// Examples:
    /// - Pattern: `[abc]`  → CharGroup { chars: {a, b, c}, negated: false }
    /// - Pattern: `[^xyz]` → CharGroup { chars: {x, y, z}, negated: true }
    /// - Pattern: `[\]]`   → CharGroup { chars: {]}, negated: false }
    fn parse_char_group(&mut self) -> Result<RegexNode, PatternError> {
        let start = self.offset();
        self.advance(); // consume '['
        let negated = self.expect('^');
        let mut chars = BTreeSet::new();
        loop {
            match self.advance() {
                Some(']') => break,
                Some('\\') => match self.advance() {
                    Some(c) => {
                        chars.insert(c);
                    }
                    None => return Err(PatternError::UnbalancedBracket { pos: start }),
                },
                Some(c) => {
                    chars.insert(c);
                }
                None => return Err(PatternError::UnbalancedBracket { pos: start }),
            }
        }
        if chars.is_empty() {
            return Err(PatternError::EmptyCharGroup { pos: start });
        }
        Ok(RegexNode::CharGroup { chars, negated })
    }

    /// Reject backreferences to groups that do not exist anywhere in the pattern.
    fn check_backrefs(&self) -> Result<(), PatternError> {
        let defined = self.group_count();
        match self.backrefs.iter().find(|&&(id, _)| id == 0 || id > defined) {
            Some(&(group, pos)) => Err(PatternError::UndefinedGroup {
                pos,
                group,
                defined,
            }),
            None => Ok(()),
        }
    }
}
