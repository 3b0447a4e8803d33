use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that turns matched text into a semantic value.
///
/// Runs the inner parser, takes the slice of input it consumed, applies a
/// user function to it, and pushes the result onto the value stack. The push
/// is logged, so an enclosing transaction that fails later undoes it. This is
/// the bridge between syntax and the value stack that operator-level operand
/// parsers are built from.
pub struct Capture<P, F> {
    parser: P,
    read: F,
}

impl<P, F> Capture<P, F> {
    pub fn new(parser: P, read: F) -> Self {
        Capture { parser, read }
    }
}

impl<'code, V, P, F> Parser<'code, V> for Capture<P, F>
where
    V: Clone,
    P: Parser<'code, V>,
    F: Fn(&'code str) -> V,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        let start = state.pos();
        if !self.parser.parse(state) {
            return false;
        }
        let matched = &state.input()[start..state.pos()];
        let value = (self.read)(matched);
        state.push(value);
        true
    }
}

/// Convenience function to create a Capture parser
pub fn capture<P, F>(parser: P, read: F) -> Capture<P, F> {
    Capture::new(parser, read)
}
