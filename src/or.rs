use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that tries the first parser, and if it fails, tries the
/// second parser from the same position (ordered choice).
///
/// No explicit backtracking is needed here: a failing parser restores
/// position and stack by contract, so the second alternative starts clean.
pub struct Or<P1, P2> {
    first: P1,
    second: P2,
}

impl<P1, P2> Or<P1, P2> {
    pub fn new(first: P1, second: P2) -> Self {
        Or { first, second }
    }
}

impl<'code, V, P1, P2> Parser<'code, V> for Or<P1, P2>
where
    V: Clone,
    P1: Parser<'code, V>,
    P2: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        self.first.parse(state) || self.second.parse(state)
    }
}

/// Convenience function to create an Or parser
pub fn or<P1, P2>(first: P1, second: P2) -> Or<P1, P2> {
    Or::new(first, second)
}

/// Extension trait to add .or() method support for parsers
pub trait OrExt: Sized {
    fn or<P>(self, other: P) -> Or<Self, P> {
        Or::new(self, other)
    }
}

impl<P> OrExt for P {}
