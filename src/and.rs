use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that runs two parsers in sequence.
///
/// The sequence is transactional: if the second parser fails, everything the
/// first one did (position and logged stack mutations) is undone, so the
/// combined parser honors the failure contract as a unit.
pub struct And<P1, P2> {
    first: P1,
    second: P2,
}

impl<P1, P2> And<P1, P2> {
    pub fn new(first: P1, second: P2) -> Self {
        And { first, second }
    }
}

impl<'code, V, P1, P2> Parser<'code, V> for And<P1, P2>
where
    V: Clone,
    P1: Parser<'code, V>,
    P2: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        state.transact(|s| self.first.parse(s) && self.second.parse(s))
    }
}

/// Convenience function to create an And parser
pub fn and<P1, P2>(first: P1, second: P2) -> And<P1, P2> {
    And::new(first, second)
}

/// Extension trait to add .and() method support for parsers
pub trait AndExt: Sized {
    fn and<P>(self, other: P) -> And<Self, P> {
        And::new(self, other)
    }
}

impl<P> AndExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminals::literal;

    #[test]
    fn test_and_both_succeed() {
        let mut state: ParseState<i64> = ParseState::new("ab");
        assert!(and(literal("a"), literal("b")).parse(&mut state));
        assert_eq!(state.pos(), 2);
    }

    #[test]
    fn test_and_second_fails_restores_position() {
        let mut state: ParseState<i64> = ParseState::new("ac");
        assert!(!and(literal("a"), literal("b")).parse(&mut state));
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn test_and_rolls_back_stack_mutations() {
        let push_then_match = |s: &mut ParseState<i64>| {
            s.push(42);
            literal("a").parse(s)
        };

        let mut state: ParseState<i64> = ParseState::new("ax");
        assert!(!and(push_then_match, literal("b")).parse(&mut state));
        assert_eq!(state.depth(), 0);
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn test_and_method_syntax() {
        let mut state: ParseState<i64> = ParseState::new("if (");
        let parser = literal("if").and(literal(" ")).and(literal("("));
        assert!(parser.parse(&mut state));
        assert_eq!(state.pos(), 4);
    }
}
