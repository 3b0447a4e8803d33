use crate::error::{Failure, FailureKind};
use crate::operators::Effect;
use crate::parser::Parser;
use log::trace;

/// One engine-level mutation, recorded so it can be reverted.
///
/// Undo records replay strictly in reverse order (see [`ParseState::undo`]).
/// Records hold clones of the values they removed, which is what makes popped
/// values restorable and why the value type must be `Clone`.
#[derive(Debug, Clone)]
enum Undo<V> {
    /// A value was pushed; undoing pops it.
    Pushed,
    /// A value was popped; undoing pushes it back.
    Popped(V),
    /// An n-operand frame was removed; undoing pushes it back in order.
    Framed(Vec<V>),
}

/// A saved restoration point: the position and the undo-log length at the
/// moment [`ParseState::checkpoint`] was called.
///
/// Checkpoints are length-based, so they nest: an inner checkpoint is always
/// deeper than the enclosing one, and restoring the inner one leaves the
/// outer one valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    log: usize,
}

impl Checkpoint {
    /// Input position at the time the checkpoint was taken.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// The shared, mutable state of one parse run.
///
/// Everything a parser may touch lives here: the input cursor, the value
/// stack, the undo log that makes stack mutations reversible, the
/// furthest-failure record, and the deferred-effect stack used by
/// right-associative operator levels. One `&mut ParseState` is threaded
/// through every parser call; parsing is single-threaded and synchronous.
pub struct ParseState<'code, V: Clone> {
    input: &'code str,
    pos: usize,
    stack: Vec<V>,
    log: Vec<Undo<V>>,
    deferred: Vec<Effect<'code, V>>,
    failure: Option<Failure>,
}

impl<'code, V: Clone> ParseState<'code, V> {
    pub fn new(input: &'code str) -> Self {
        ParseState {
            input,
            pos: 0,
            stack: Vec::new(),
            log: Vec::new(),
            deferred: Vec::new(),
            failure: None,
        }
    }

    // --- cursor ---------------------------------------------------------

    /// Current byte offset into the input.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to a previously observed offset. Positions are only
    /// ever saved and restored, never invented.
    pub fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.input.len());
        self.pos = pos;
    }

    /// The whole input being parsed.
    pub fn input(&self) -> &'code str {
        self.input
    }

    /// The input from the current position onward.
    pub fn rest(&self) -> &'code str {
        &self.input[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Advance the cursor by `n` bytes.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.input.len());
        self.pos += n;
    }

    // --- value stack ----------------------------------------------------

    /// Push a semantic value. Logged, hence undoable.
    pub fn push(&mut self, value: V) {
        self.stack.push(value);
        self.log.push(Undo::Pushed);
    }

    /// Pop the top semantic value. Logged, hence undoable.
    pub fn pop(&mut self) -> Option<V> {
        let value = self.stack.pop()?;
        self.log.push(Undo::Popped(value.clone()));
        Some(value)
    }

    pub fn peek(&self) -> Option<&V> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The whole value stack, bottom first. Mainly useful in tests.
    pub fn stack(&self) -> &[V] {
        &self.stack
    }

    /// Remove and return the top `n` values in their original push order.
    ///
    /// This is the operand frame consumed by an operator effect. Logged as a
    /// single record, hence undoable as a unit.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` values are on the stack. An operator that
    /// requests more operands than its operand parsers produced is a grammar
    /// bug, not an input condition.
    pub fn frame(&mut self, n: usize) -> Vec<V> {
        assert!(
            n <= self.stack.len(),
            "frame({n}) requested with only {} values on the stack",
            self.stack.len()
        );
        let frame = self.stack.split_off(self.stack.len() - n);
        self.log.push(Undo::Framed(frame.clone()));
        frame
    }

    // --- checkpoints and undo -------------------------------------------

    /// Save the current position and undo-log length.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            log: self.log.len(),
        }
    }

    /// Restore the position and revert every logged mutation recorded after
    /// `checkpoint`, in reverse order.
    pub fn undo(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            checkpoint.log <= self.log.len(),
            "checkpoint restored out of order"
        );
        trace!(
            "undo: pos {} -> {}, reverting {} log records",
            self.pos,
            checkpoint.pos,
            self.log.len() - checkpoint.log
        );
        while self.log.len() > checkpoint.log {
            match self.log.pop() {
                Some(Undo::Pushed) => {
                    self.stack.pop();
                }
                Some(Undo::Popped(value)) => self.stack.push(value),
                Some(Undo::Framed(values)) => self.stack.extend(values),
                None => break,
            }
        }
        self.pos = checkpoint.pos;
    }

    /// Run `attempt` transactionally: on failure, restore the position and
    /// undo every logged mutation the attempt made. This is the standard way
    /// for a multi-step parser to honor the failure contract.
    pub fn transact<F>(&mut self, attempt: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let checkpoint = self.checkpoint();
        let succeeded = attempt(self);
        if !succeeded {
            self.undo(checkpoint);
        }
        succeeded
    }

    // --- failure bookkeeping --------------------------------------------

    /// Record a failure of `kind` at `pos`. Only the furthest failure is
    /// kept: ordered choice produces many failures on the way to a success,
    /// and the one deepest into the input is the useful diagnostic.
    ///
    /// Recording never short-circuits control flow; the parser still returns
    /// its boolean outcome.
    pub fn fail(&mut self, pos: usize, kind: FailureKind) {
        let further = self.failure.as_ref().is_none_or(|f| pos > f.pos);
        if further {
            trace!("fail: {kind} at offset {pos}");
            self.failure = Some(Failure { pos, kind });
        }
    }

    /// The furthest failure recorded so far, if any.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Run `parser` with all of its failure records suppressed: whatever it
    /// records, the furthest-failure slot is restored afterward.
    pub fn ignore_errors<P>(&mut self, parser: &P) -> bool
    where
        P: Parser<'code, V> + ?Sized,
    {
        let saved = self.failure.clone();
        let result = parser.parse(self);
        self.failure = saved;
        result
    }

    /// Run `parser`, suppressing its failure records only if it succeeds.
    /// A successful parse makes its internal partial failures noise; a
    /// failed one should still contribute to furthest-failure diagnostics.
    pub fn ignore_errors_if_successful<P>(&mut self, parser: &P) -> bool
    where
        P: Parser<'code, V> + ?Sized,
    {
        let saved = self.failure.clone();
        let result = parser.parse(self);
        if result {
            self.failure = saved;
        }
        result
    }

    // --- deferred effects -----------------------------------------------

    /// How many effect closures are pending on the deferred-effect stack.
    ///
    /// Right-associative operator levels enqueue effects here during their
    /// operators phase and drain exactly their own range afterward, using
    /// this length as the checkpoint.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub(crate) fn push_deferred(&mut self, effect: Effect<'code, V>) {
        self.deferred.push(effect);
    }

    pub(crate) fn pop_deferred(&mut self) -> Option<Effect<'code, V>> {
        self.deferred.pop()
    }

    /// Discard pending effects down to `len` without executing them.
    pub(crate) fn truncate_deferred(&mut self, len: usize) {
        debug_assert!(len <= self.deferred.len());
        self.deferred.truncate(len);
    }
}
