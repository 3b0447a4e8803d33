use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Fatal grammar-construction errors.
///
/// These are programmer mistakes detected while a grammar is being wired
/// together, before any input is parsed. They are never produced at parse
/// time: parse-time failures are ordinary boolean outcomes recorded as
/// [`Failure`] values on the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// `higher` was called more than once on a precedence builder.
    #[error("higher-precedence operand parser is already defined")]
    HigherAlreadyDefined,

    /// A precedence builder was finalized without a higher-precedence
    /// operand parser.
    #[error("no higher-precedence operand parser was defined")]
    HigherMissing,

    /// `define` was called more than once on a forward cell.
    #[error("forward parser is already defined")]
    ForwardAlreadyDefined,
}

/// What a parser was looking at when it failed.
///
/// Kinds are deliberately coarse: the engine keeps only the failure that
/// made it furthest into the input, so a kind plus a position is enough to
/// point a grammar author at the offending spot. Rendering rich messages is
/// left to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A negative lookahead matched where it must not.
    BadMatch,
    /// A specific piece of text was expected and not found.
    Expected(Cow<'static, str>),
    /// The character at the position did not satisfy a predicate.
    UnexpectedChar,
    /// The input ended before the parser was satisfied.
    EndOfInput,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::BadMatch => write!(f, "matched input that must not match here"),
            FailureKind::Expected(text) => write!(f, "expected '{}'", text),
            FailureKind::UnexpectedChar => write!(f, "unexpected character"),
            FailureKind::EndOfInput => write!(f, "unexpected end of input"),
        }
    }
}

/// A recorded parse failure: a kind at an input position.
///
/// The state keeps the furthest such record (see
/// [`ParseState::fail`](crate::state::ParseState::fail)); ordered choice
/// means many failures happen on the way to a successful parse, and the
/// furthest one is the most useful to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub pos: usize,
    pub kind: FailureKind,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.pos)
    }
}
