//! Operator-precedence combinators.
//!
//! A precedence level is built in two phases: a mutable builder collects the
//! higher-precedence operand parser and an ordered list of operator
//! alternatives, then `build()` validates the configuration and produces an
//! immutable parser. [`PrecedenceLeft`] applies operator effects immediately
//! as each operator matches, which yields left-associative grouping;
//! [`PrecedenceRight`] defers effects onto the state's deferred-effect stack
//! and unwinds them LIFO after the whole chain has been parsed, which
//! reverses parse order into right-associative grouping.

mod left;
mod right;

pub use left::{PrecedenceLeft, PrecedenceLeftBuilder};
pub use right::{PrecedenceRight, PrecedenceRightBuilder};

use crate::error::GrammarError;
use crate::parser::Parser;
use crate::state::ParseState;
use std::rc::Rc;

/// An operator's semantic action, as a tagged value rather than a bare
/// closure: the tag records how much automatic stack bookkeeping the
/// machinery performs around the user function.
///
/// Effects are cheaply cloneable (the function handles are shared), which is
/// what lets a right-associative level enqueue one registration's effect many
/// times over.
///
/// Applying an effect extracts its operand frame (if any) at application
/// time, not at registration or enqueue time. Deferred LIFO execution depends
/// on this: each effect consumes the operands that are on top of the stack
/// when it finally runs.
pub enum Effect<'code, V: Clone> {
    /// Full-context effect; no automatic stack bookkeeping.
    Stackless(Rc<dyn Fn(&mut ParseState<'code, V>) + 'code>),
    /// The machinery pops an `operands`-sized frame; the effect may push any
    /// number of results itself.
    Affect {
        operands: usize,
        run: Rc<dyn Fn(&mut ParseState<'code, V>, Vec<V>) + 'code>,
    },
    /// The machinery pops an `operands`-sized frame and pushes the effect's
    /// single result.
    Reduce {
        operands: usize,
        run: Rc<dyn Fn(Vec<V>) -> V + 'code>,
    },
}

impl<'code, V: Clone> Effect<'code, V> {
    pub(crate) fn apply(&self, state: &mut ParseState<'code, V>) {
        match self {
            Effect::Stackless(run) => run(state),
            Effect::Affect { operands, run } => {
                let frame = state.frame(*operands);
                run(state, frame);
            }
            Effect::Reduce { operands, run } => {
                let frame = state.frame(*operands);
                let result = run(frame);
                state.push(result);
            }
        }
    }
}

impl<'code, V: Clone> Clone for Effect<'code, V> {
    fn clone(&self) -> Self {
        match self {
            Effect::Stackless(run) => Effect::Stackless(Rc::clone(run)),
            Effect::Affect { operands, run } => Effect::Affect {
                operands: *operands,
                run: Rc::clone(run),
            },
            Effect::Reduce { operands, run } => Effect::Reduce {
                operands: *operands,
                run: Rc::clone(run),
            },
        }
    }
}

/// One operator alternative: its syntax, its effect, and whether the
/// alternative recurses into the operand parser after the syntax (binary
/// operators do; suffix operators do not).
pub(crate) struct OpAlternative<'code, V: Clone> {
    pub(crate) syntax: Rc<dyn Parser<'code, V> + 'code>,
    pub(crate) effect: Effect<'code, V>,
    pub(crate) recursive: bool,
}

/// Shared registration core for both precedence builders: the set-once
/// higher-precedence operand parser and the declaration-ordered alternative
/// list, with validation at finalization.
pub(crate) struct OpSet<'code, V: Clone> {
    higher: Option<Rc<dyn Parser<'code, V> + 'code>>,
    higher_redefined: bool,
    alternatives: Vec<OpAlternative<'code, V>>,
}

impl<'code, V: Clone> OpSet<'code, V> {
    pub(crate) fn new() -> Self {
        OpSet {
            higher: None,
            higher_redefined: false,
            alternatives: Vec::new(),
        }
    }

    /// Record the operand parser. A second call is remembered and surfaced
    /// as a configuration error at finalization.
    pub(crate) fn set_higher(&mut self, parser: Rc<dyn Parser<'code, V> + 'code>) {
        if self.higher.is_some() {
            self.higher_redefined = true;
        } else {
            self.higher = Some(parser);
        }
    }

    pub(crate) fn push(&mut self, alternative: OpAlternative<'code, V>) {
        self.alternatives.push(alternative);
    }

    /// Validate and hand over the finalized configuration.
    pub(crate) fn finish(
        self,
    ) -> Result<(Rc<dyn Parser<'code, V> + 'code>, Vec<OpAlternative<'code, V>>), GrammarError>
    {
        if self.higher_redefined {
            return Err(GrammarError::HigherAlreadyDefined);
        }
        match self.higher {
            Some(operand) => Ok((operand, self.alternatives)),
            None => Err(GrammarError::HigherMissing),
        }
    }
}
