use thiserror::Error;

/// A malformed pattern. Positions are byte offsets into the pattern as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unbalanced parenthesis at position {pos}")]
    UnbalancedParen { pos: usize },
    #[error("unterminated character group starting at position {pos}")]
    UnbalancedBracket { pos: usize },
    #[error("unknown escape sequence at position {pos}")]
    UnknownEscape { pos: usize },
    #[error(
        "backreference \\{group} at position {pos} refers to a group that does not exist \
         ({defined} defined)"
    )]
    UndefinedGroup {
        pos: usize,
        group: usize,
        defined: usize,
    },
    #[error("quantifier at position {pos} has nothing to repeat")]
    DanglingQuantifier { pos: usize },
    #[error("empty character group at position {pos}")]
    EmptyCharGroup { pos: usize },
    #[error("group at position {pos} is nested more than {limit} levels deep")]
    TooDeep { pos: usize, limit: usize },
}

impl PatternError {
    pub fn pos(&self) -> usize {
        match *self {
            PatternError::UnbalancedParen { pos }
            | PatternError::UnbalancedBracket { pos }
            | PatternError::UnknownEscape { pos }
            | PatternError::UndefinedGroup { pos, .. }
            | PatternError::DanglingQuantifier { pos }
            | PatternError::EmptyCharGroup { pos }
            | PatternError::TooDeep { pos, .. } => pos,
        }
    }
}

/// A match attempt that was abandoned before reaching an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("pattern too complex: gave up after {limit} backtracking steps")]
    TooComplex { limit: usize },
    #[error("pattern too complex: more than {limit} nested choices on one match path")]
    TooDeep { limit: usize },
}
