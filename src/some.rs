use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that matches one or more occurrences of the given
/// parser.
///
/// Same zero-width caveat as [`Many`](crate::many::Many): the inner parser
/// must consume input on success.
pub struct Some<P> {
    parser: P,
}

impl<P> Some<P> {
    pub fn new(parser: P) -> Self {
        Some { parser }
    }
}

impl<'code, V, P> Parser<'code, V> for Some<P>
where
    V: Clone,
    P: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        // First match must succeed
        if !self.parser.parse(state) {
            return false;
        }
        while self.parser.parse(state) {}
        true
    }
}

/// Convenience function to create a Some parser
pub fn some<P>(parser: P) -> Some<P> {
    Some::new(parser)
}
