use crate::error::FailureKind;
use crate::parser::Parser;
use crate::state::ParseState;
use std::borrow::Cow;

/// Parser that matches an exact piece of text.
pub struct Literal {
    text: Cow<'static, str>,
}

impl<'code, V: Clone> Parser<'code, V> for Literal {
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        if state.rest().starts_with(self.text.as_ref()) {
            state.advance(self.text.len());
            true
        } else {
            state.fail(state.pos(), FailureKind::Expected(self.text.clone()));
            false
        }
    }
}

/// Match `text` exactly, advancing past it.
pub fn literal(text: impl Into<Cow<'static, str>>) -> Literal {
    Literal { text: text.into() }
}

/// Parser that matches a single character satisfying a predicate.
pub struct CharWhere<F> {
    predicate: F,
}

impl<'code, V, F> Parser<'code, V> for CharWhere<F>
where
    V: Clone,
    F: Fn(char) -> bool,
{
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        match state.rest().chars().next() {
            Some(c) if (self.predicate)(c) => {
                state.advance(c.len_utf8());
                true
            }
            Some(_) => {
                state.fail(state.pos(), FailureKind::UnexpectedChar);
                false
            }
            None => {
                state.fail(state.pos(), FailureKind::EndOfInput);
                false
            }
        }
    }
}

/// Match one character for which `predicate` holds.
pub fn char_where<F>(predicate: F) -> CharWhere<F>
where
    F: Fn(char) -> bool,
{
    CharWhere { predicate }
}

/// Parser that always succeeds without consuming input.
pub struct Empty;

impl<'code, V: Clone> Parser<'code, V> for Empty {
    fn parse(&self, _state: &mut ParseState<'code, V>) -> bool {
        true
    }
}

/// Always succeed, consuming nothing.
pub fn empty() -> Empty {
    Empty
}

/// Parser that succeeds only at the end of the input.
pub struct EndOfInput;

impl<'code, V: Clone> Parser<'code, V> for EndOfInput {
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        if state.at_end() {
            true
        } else {
            state.fail(state.pos(), FailureKind::Expected("end of input".into()));
            false
        }
    }
}

/// Succeed only if the whole input has been consumed.
pub fn end_of_input() -> EndOfInput {
    EndOfInput
}
