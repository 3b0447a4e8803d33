use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that matches zero or more occurrences of the given
/// parser. Never fails.
///
/// Caveat: the inner parser must consume input on success. An inner parser
/// that succeeds at zero width (such as [`empty`](crate::terminals::empty))
/// makes the repetition loop forever.
pub struct Many<P> {
    parser: P,
}

impl<P> Many<P> {
    pub fn new(parser: P) -> Self {
        Many { parser }
    }
}

impl<'code, V, P> Parser<'code, V> for Many<P>
where
    V: Clone,
    P: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        while self.parser.parse(state) {}
        true
    }
}

/// Convenience function to create a Many parser
pub fn many<P>(parser: P) -> Many<P> {
    Many::new(parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminals::literal;

    #[test]
    fn test_many_zero_matches() {
        let mut state: ParseState<i64> = ParseState::new("xyz");
        assert!(many(literal("a")).parse(&mut state));
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn test_many_multiple_matches() {
        let mut state: ParseState<i64> = ParseState::new("aaab");
        assert!(many(literal("a")).parse(&mut state));
        assert_eq!(state.pos(), 3);
        assert_eq!(state.rest(), "b");
    }

    #[test]
    fn test_many_empty_input() {
        let mut state: ParseState<i64> = ParseState::new("");
        assert!(many(literal("a")).parse(&mut state));
        assert_eq!(state.pos(), 0);
    }
}
