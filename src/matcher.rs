use std::ops::Range;

use crate::ast::{CompiledPattern, RegexNode};
use crate::error::MatchError;

/// Backtracking steps allowed at each start offset before a match call gives up.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Nested choice points (quantifiers, groups) one match path may stack up.
pub const MAX_DEPTH: usize = 1_000;

/// Substrings captured by a successful match.
///
/// Index 0 is the whole match; indices `1..=group_count` are the capturing
/// groups, `None` when the group took no part in the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    span: Range<usize>,
    groups: Vec<Option<String>>,
}

impl Captures {
    /// Text captured by group `index`, or the whole match for index 0.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index)?.as_deref()
    }

    /// The whole matched text.
    pub fn matched(&self) -> &str {
        self.get(0).unwrap_or_default()
    }

    /// Character (not byte) range of the whole match within the text.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Number of capturing groups, whether or not they were set.
    pub fn len(&self) -> usize {
        self.groups.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(index, capture)` for groups `1..=len()`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&str>)> + '_ {
        self.groups.iter().enumerate().skip(1).map(|(i, g)| (i, g.as_deref()))
    }
}

impl CompiledPattern {
    /// Whether the pattern matches anywhere in `text`.
    ///
    /// A call that gives up (see [`MatchError`]) counts as no match; use
    /// [`CompiledPattern::try_matches`] to tell the two apart.
    pub fn matches(&self, text: &str) -> bool {
        self.try_matches(text).unwrap_or(false)
    }

    /// Leftmost match in `text` together with its captures.
    ///
    /// Like [`CompiledPattern::matches`], a call that gives up returns `None`;
    /// [`CompiledPattern::try_find`] reports it instead.
    pub fn find(&self, text: &str) -> Option<Captures> {
        self.try_find(text).ok().flatten()
    }

    pub fn try_matches(&self, text: &str) -> Result<bool, MatchError> {
        Ok(self.try_find(text)?.is_some())
    }

    pub fn try_find(&self, text: &str) -> Result<Option<Captures>, MatchError> {
        let chars: Vec<char> = text.chars().collect();
        let mut m = Matcher::new(&chars, self.group_count, self.step_limit);
        let done = Cont::Done {
            at_end: self.has_end_anchor,
        };
        let last_start = if self.has_start_anchor { 0 } else { chars.len() };

        for start in 0..=last_start {
            m.reset();
            if let Some(end) = m.match_seq(&self.body, start, &done)? {
                return Ok(Some(m.captures(start..end)));
            }
        }
        Ok(None)
    }
}

/// What remains to be matched once the current sequence is exhausted.
enum Cont<'p, 'k> {
    /// The whole body matched. `at_end` requires the match to stop at the end of the text.
    Done { at_end: bool },
    /// Leaving a group: bind its capture, then continue with the rest of the enclosing sequence.
    Close {
        id: Option<usize>,
        start: usize,
        rest: &'p [RegexNode],
        next: &'k Cont<'p, 'k>,
    },
}

struct Matcher<'t> {
    text: &'t [char],
    /// Indexed by group id; slot 0 is unused.
    slots: Vec<Option<(usize, usize)>>,
    steps: usize,
    limit: usize,
    depth: usize,
}

impl<'t> Matcher<'t> {
    fn new(text: &'t [char], group_count: usize, limit: usize) -> Self {
        Self {
            text,
            slots: vec![None; group_count + 1],
            steps: 0,
            limit,
            depth: 0,
        }
    }

    /// Start over at a new offset: no captures, a fresh step budget.
    fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.steps = 0;
    }

    fn tick(&mut self) -> Result<(), MatchError> {
        self.steps += 1;
        if self.steps > self.limit {
            return Err(MatchError::TooComplex { limit: self.limit });
        }
        Ok(())
    }

    /// Recurse into `match_seq`, refusing to go deeper than [`MAX_DEPTH`].
    fn descend(
        &mut self,
        nodes: &[RegexNode],
        pos: usize,
        k: &Cont<'_, '_>,
    ) -> Result<Option<usize>, MatchError> {
        if self.depth >= MAX_DEPTH {
            return Err(MatchError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let found = self.match_seq(nodes, pos, k);
        self.depth -= 1;
        found
    }

    // Match `nodes` at `pos`, then `k`. Returns the end of the overall match.
    fn match_seq(
        &mut self,
        mut nodes: &[RegexNode],
        mut pos: usize,
        k: &Cont<'_, '_>,
    ) -> Result<Option<usize>, MatchError> {
        self.tick()?;
        // Nodes without a choice point are walked in place; only choices recurse.
        loop {
            let Some((node, rest)) = nodes.split_first() else {
                return self.resume(k, pos);
            };

            match node {
                RegexNode::Repeat { node: inner, kind } => {
                    // Greedy: collect every reachable end, then hand them out longest first.
                    let mut ends = vec![pos];
                    while kind.max().map_or(true, |max| ends.len() <= max) {
                        let last = ends[ends.len() - 1];
                        match self.step(inner, last) {
                            Some(next) => ends.push(next),
                            None => break,
                        }
                    }
                    for &end in ends.iter().skip(kind.min()).rev() {
                        if let Some(found) = self.descend(rest, end, k)? {
                            return Ok(Some(found));
                        }
                    }
                    return Ok(None);
                }
                RegexNode::Group { id, alternatives } => {
                    let close = Cont::Close {
                        id: *id,
                        start: pos,
                        rest,
                        next: k,
                    };
                    for alt in alternatives {
                        if let Some(found) = self.descend(alt, pos, &close)? {
                            return Ok(Some(found));
                        }
                    }
                    return Ok(None);
                }
                RegexNode::BackRef { id } => {
                    let Some((from, to)) = self.slots[*id] else {
                        return Ok(None);
                    };
                    let text = self.text;
                    if !text[pos..].starts_with(&text[from..to]) {
                        return Ok(None);
                    }
                    pos += to - from;
                }
                single => match self.step(single, pos) {
                    Some(next) => pos = next,
                    None => return Ok(None),
                },
            }
            nodes = rest;
        }
    }

    fn resume(&mut self, k: &Cont<'_, '_>, pos: usize) -> Result<Option<usize>, MatchError> {
        match k {
            Cont::Done { at_end } => Ok((!at_end || pos == self.text.len()).then_some(pos)),
            Cont::Close {
                id,
                start,
                rest,
                next,
            } => {
                let Some(id) = *id else {
                    return self.descend(rest, pos, next);
                };
                let saved = self.slots[id].replace((*start, pos));
                let found = self.descend(rest, pos, next)?;
                if found.is_none() {
                    self.slots[id] = saved;
                }
                Ok(found)
            }
        }
    }

    /// Consume one character with a single-character node.
    fn step(&self, node: &RegexNode, pos: usize) -> Option<usize> {
        let c = *self.text.get(pos)?;
        node.accepts(c).then_some(pos + 1)
    }

    fn captures(&self, span: Range<usize>) -> Captures {
        let whole: String = self.text[span.clone()].iter().collect();
        let groups = std::iter::once(Some(whole))
            .chain(
                self.slots
                    .iter()
                    .skip(1)
                    .map(|s| s.map(|(from, to)| self.text[from..to].iter().collect())),
            )
            .collect();
        Captures { span, groups }
    }
}
