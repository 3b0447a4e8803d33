use crate::parser::Parser;
use crate::state::ParseState;

/// Parser combinator that performs positive lookahead.
///
/// Attempts the given parser without consuming input: whatever the outcome,
/// the position is restored to where it was before the call. The inner
/// parser's boolean outcome is returned unchanged. If the inner parser
/// succeeded, the failure records it produced along the way are suppressed
/// (they are noise once the match is known to succeed); if it failed, they
/// are kept so furthest-failure diagnostics can explain why.
///
/// # Caller obligation
///
/// Only the *position* is restored. The value stack and the undo log are NOT
/// unwound: a parser that pushes values or otherwise mutates the stack inside
/// `ahead` leaves those mutations behind. Grammars must pair `ahead` with
/// side-effect-free syntax parsers. This is a documented contract, not an
/// enforced one.
pub struct Ahead<P> {
    parser: P,
}

impl<P> Ahead<P> {
    pub fn new(parser: P) -> Self {
        Ahead { parser }
    }
}

impl<'code, V, P> Parser<'code, V> for Ahead<P>
where
    V: Clone,
    P: Parser<'code, V>,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        let pos = state.pos();
        let result = state.ignore_errors_if_successful(&self.parser);
        state.set_pos(pos);
        result
    }
}

/// Convenience function to create an Ahead parser for positive lookahead
pub fn ahead<P>(parser: P) -> Ahead<P> {
    Ahead::new(parser)
}

/// Extension trait to add .ahead() method support for parsers
pub trait AheadExt: Sized {
    fn ahead(self) -> Ahead<Self> {
        Ahead::new(self)
    }
}

impl<P> AheadExt for P {}
