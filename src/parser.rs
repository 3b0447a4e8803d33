use crate::state::ParseState;

/// Core parser trait: a boolean predicate over the shared parse state.
///
/// A parser attempts a match at the state's current position and returns
/// whether it succeeded. Semantic values do not travel through return values;
/// they ride the state's value stack (see
/// [`ParseState::push`](crate::state::ParseState::push)).
///
/// Contract: on failure a parser must leave the position and the value stack
/// exactly as it found them. Undo-log entries written during a failed attempt
/// may remain, but a well-behaved failure leaves them canceling out, so
/// replaying them later is a net no-op. [`ParseState::transact`] is the
/// standard way to honor this contract for multi-step parsers.
pub trait Parser<'code, V: Clone> {
    /// Attempt to parse at the state's current position.
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool;
}

/// Any `Fn(&mut ParseState) -> bool` closure is a parser.
impl<'code, V, F> Parser<'code, V> for F
where
    V: Clone,
    F: Fn(&mut ParseState<'code, V>) -> bool,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        self(state)
    }
}
