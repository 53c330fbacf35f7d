//! A small backtracking regex engine for single lines of text.
//!
//! [`compile`] turns a pattern into a [`CompiledPattern`]; its
//! [`matches`](CompiledPattern::matches) and [`find`](CompiledPattern::find)
//! run the match. Matching can give up on pathological input, either when the
//! backtracking step budget runs out or when a match path nests too many
//! choices. `matches` and `find` fold that into "no match"; call
//! [`try_matches`](CompiledPattern::try_matches) or
//! [`try_find`](CompiledPattern::try_find) to get a [`MatchError`] instead.

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::CompiledPattern;
pub use error::{MatchError, PatternError};
pub use matcher::{Captures, DEFAULT_STEP_LIMIT, MAX_DEPTH};
pub use parser::{compile, MAX_NESTING};

/// Compile `pattern` and test it against `input` in one go.
pub fn is_match(input: &str, pattern: &str) -> Result<bool, PatternError> {
    Ok(compile(pattern)?.matches(input))
}

impl std::str::FromStr for CompiledPattern {
    type Err = PatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        compile(pattern)
    }
}
