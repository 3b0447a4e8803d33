use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that makes the given parser optional. Never fails.
pub struct Opt<P> {
    parser: P,
}

impl<P> Opt<P> {
    pub fn new(parser: P) -> Self {
        Opt { parser }
    }
}

impl<'code, V, P> Parser<'code, V> for Opt<P>
where
    V: Clone,
    P: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        self.parser.parse(state);
        true
    }
}

/// Convenience function to create an Opt parser
pub fn opt<P>(parser: P) -> Opt<P> {
    Opt::new(parser)
}

/// Extension trait to add .opt() method support for parsers
pub trait OptExt: Sized {
    fn opt(self) -> Opt<Self> {
        Opt::new(self)
    }
}

impl<P> OptExt for P {}
