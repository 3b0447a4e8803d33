//! # opcomb - Operator-Precedence Parser Combinators
//!
//! A backtracking (PEG-style) parsing engine with an operator-precedence
//! layer on top. Parsers are boolean predicates over a shared mutable
//! [`ParseState`] that carries the cursor, an undo log, a semantic-value
//! stack, and furthest-failure diagnostics. The library emphasizes:
//!
//! - **Ordered choice**: alternatives are tried in declaration order and the
//!   first match wins, deterministically
//! - **Transactional backtracking**: failed attempts restore position and
//!   stack through length-based checkpoints and an undo log
//! - **Precedence levels as values**: [`PrecedenceLeft`] and
//!   [`PrecedenceRight`] builders turn a table of operator alternatives into
//!   a parser with left- or right-associative semantics
//! - **Zero-width lookahead**: [`ahead`] and [`not`] assertions that check
//!   without consuming
//!
//! Right-associative levels are the interesting part: their operators are
//! parsed left to right but must evaluate right to left, so their effects
//! are deferred on a shared LIFO stack and unwound once the chain completes.

pub mod ahead;
pub mod and;
pub mod capture;
pub mod error;
pub mod forward;
pub mod many;
pub mod not;
pub mod operators;
pub mod opt;
pub mod or;
pub mod parser;
pub mod some;
pub mod state;
pub mod terminals;

pub use ahead::{Ahead, AheadExt, ahead};
pub use and::{And, AndExt, and};
pub use capture::{Capture, capture};
pub use error::{Failure, FailureKind, GrammarError};
pub use forward::Forward;
pub use many::{Many, many};
pub use not::{Not, NotExt, not};
pub use operators::{
    Effect, PrecedenceLeft, PrecedenceLeftBuilder, PrecedenceRight, PrecedenceRightBuilder,
};
pub use opt::{Opt, OptExt, opt};
pub use or::{Or, OrExt, or};
pub use parser::Parser;
// Only the function: a root-level `Some` struct would shadow `Option::Some`
// for glob importers. The struct stays reachable as `some::Some`.
pub use some::some;
pub use state::{Checkpoint, ParseState};
pub use terminals::{char_where, empty, end_of_input, literal};
