use crate::error::FailureKind;
use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that performs negative lookahead.
///
/// Succeeds iff the given parser fails at the current position, and leaves no
/// trace of that parser ever having run. The inner parser's failure records
/// are always suppressed; only the negation's own failure (kind
/// [`FailureKind::BadMatch`], at the entry position) is ever surfaced.
///
/// If the inner parser succeeds, its logged mutations are undone back to the
/// entry checkpoint before `not` reports failure. If it fails, the parser
/// failure contract already restored position and stack, so nothing is undone
/// explicitly.
pub struct Not<P> {
    parser: P,
}

impl<P> Not<P> {
    pub fn new(parser: P) -> Self {
        Not { parser }
    }
}

impl<'code, V, P> Parser<'code, V> for Not<P>
where
    V: Clone,
    P: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        let checkpoint = state.checkpoint();
        let matched = state.ignore_errors(&self.parser);
        if matched {
            // Parser succeeded where it must not: roll back and report.
            state.undo(checkpoint);
            state.fail(checkpoint.pos(), FailureKind::BadMatch);
            return false;
        }
        true
    }
}

/// Convenience function to create a Not parser for negative lookahead
pub fn not<P>(parser: P) -> Not<P> {
    Not::new(parser)
}

/// Extension trait to add .not() method support for parsers
pub trait NotExt: Sized {
    fn not(self) -> Not<Self> {
        Not::new(self)
    }
}

impl<P> NotExt for P {}
