use super::{Effect, OpAlternative, OpSet};
use crate::error::GrammarError;
use crate::parser::Parser;
use crate::state::ParseState;
use log::trace;
use std::rc::Rc;

/// A right-associative operator-precedence level.
///
/// Syntactically this parses the same shape as
/// [`PrecedenceLeft`](super::PrecedenceLeft): one operand, then a repetition
/// of operator alternatives tried in declaration order. The difference is
/// when effects run. A matched alternative only enqueues its effect on the
/// state's deferred-effect stack; once the whole chain has been parsed, the
/// effects enqueued by this invocation are popped and executed in LIFO
/// order. The rightmost operator was parsed last but runs first, which turns
/// parse order into right-associative evaluation order: `a op b op c`
/// combines as `a op (b op c)`.
///
/// The drain range is bounded by a deferred-stack length checkpoint taken at
/// entry, so nested invocations (right-recursion through the same level, or
/// other right-associative levels running inside an operand) each clean up
/// exactly their own enqueued range. If the chain fails, anything enqueued
/// above the checkpoint is discarded without being executed.
pub struct PrecedenceRight<'code, V: Clone> {
    operand: Rc<dyn Parser<'code, V> + 'code>,
    alternatives: Vec<OpAlternative<'code, V>>,
}

impl<'code, V: Clone> PrecedenceRight<'code, V> {
    pub fn builder() -> PrecedenceRightBuilder<'code, V> {
        PrecedenceRightBuilder { set: OpSet::new() }
    }

    /// Try one alternative transactionally. The enqueue is the final step,
    /// after the alternative has fully matched, so a deferred effect only
    /// ever exists for an alternative that succeeded.
    fn try_alternative(
        &self,
        alternative: &OpAlternative<'code, V>,
        state: &mut ParseState<'code, V>,
    ) -> bool {
        state.transact(|s| {
            if !alternative.syntax.parse(s) {
                return false;
            }
            if alternative.recursive && !self.operand.parse(s) {
                return false;
            }
            s.push_deferred(alternative.effect.clone());
            true
        })
    }
}

impl<'code, V: Clone> Parser<'code, V> for PrecedenceRight<'code, V> {
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        let deferred_mark = state.deferred_len();

        let result = state.transact(|s| {
            if !self.operand.parse(s) {
                return false;
            }
            loop {
                let matched = self
                    .alternatives
                    .iter()
                    .any(|alternative| self.try_alternative(alternative, s));
                if !matched {
                    break;
                }
            }
            true
        });

        if result {
            let mut executed = 0;
            while state.deferred_len() > deferred_mark {
                if let Some(effect) = state.pop_deferred() {
                    effect.apply(state);
                    executed += 1;
                }
            }
            if executed > 0 {
                trace!("right level: executed {executed} deferred effects");
            }
        } else {
            // Effects enqueued during a failed chain must never run.
            let discarded = state.deferred_len() - deferred_mark;
            if discarded > 0 {
                trace!("right level: discarded {discarded} deferred effects");
            }
            state.truncate_deferred(deferred_mark);
        }

        result
    }
}

/// Builder for [`PrecedenceRight`]. Same registration surface as
/// [`PrecedenceLeftBuilder`](super::PrecedenceLeftBuilder).
pub struct PrecedenceRightBuilder<'code, V: Clone> {
    set: OpSet<'code, V>,
}

impl<'code, V: Clone> PrecedenceRightBuilder<'code, V> {
    /// Set the higher-precedence operand parser. Must be called exactly
    /// once.
    pub fn higher<P>(mut self, parser: P) -> Self
    where
        P: Parser<'code, V> + 'code,
    {
        self.set.set_higher(Rc::new(parser));
        self
    }

    /// Register a binary operator whose effect gets full access to the parse
    /// state and does its own stack bookkeeping.
    pub fn op_stackless<S, E>(mut self, syntax: S, effect: E) -> Self
    where
        S: Parser<'code, V> + 'code,
        E: Fn(&mut ParseState<'code, V>) + 'code,
    {
        self.set.push(OpAlternative {
            syntax: Rc::new(syntax),
            effect: Effect::Stackless(Rc::new(effect)),
            recursive: true,
        });
        self
    }

    /// Register a binary operator whose effect receives an `operands`-sized
    /// frame plus the state, and pushes results manually.
    pub fn op_affect<S, E>(mut self, operands: usize, syntax: S, effect: E) -> Self
    where
        S: Parser<'code, V> + 'code,
        E: Fn(&mut ParseState<'code, V>, Vec<V>) + 'code,
    {
        self.set.push(OpAlternative {
            syntax: Rc::new(syntax),
            effect: Effect::Affect {
                operands,
                run: Rc::new(effect),
            },
            recursive: true,
        });
        self
    }

    /// Register a binary operator whose effect folds an `operands`-sized
    /// frame into one value, which is pushed automatically.
    pub fn op<S, E>(mut self, operands: usize, syntax: S, effect: E) -> Self
    where
        S: Parser<'code, V> + 'code,
        E: Fn(Vec<V>) -> V + 'code,
    {
        self.set.push(OpAlternative {
            syntax: Rc::new(syntax),
            effect: Effect::Reduce {
                operands,
                run: Rc::new(effect),
            },
            recursive: true,
        });
        self
    }

    /// Register a suffix operator: only its syntax is parsed (no recursion
    /// into the operand), taking its operands from what was already parsed.
    pub fn op_suffix<S, E>(mut self, operands: usize, syntax: S, effect: E) -> Self
    where
        S: Parser<'code, V> + 'code,
        E: Fn(Vec<V>) -> V + 'code,
    {
        self.set.push(OpAlternative {
            syntax: Rc::new(syntax),
            effect: Effect::Reduce {
                operands,
                run: Rc::new(effect),
            },
            recursive: false,
        });
        self
    }

    pub fn build(self) -> Result<PrecedenceRight<'code, V>, GrammarError> {
        let (operand, alternatives) = self.set.finish()?;
        Ok(PrecedenceRight {
            operand,
            alternatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture;
    use crate::some::some;
    use crate::terminals::{char_where, literal};
    use std::cell::Cell;

    fn number<'code>() -> impl Parser<'code, i64> {
        capture(some(char_where(|c| c.is_ascii_digit())), |s: &str| {
            s.parse().unwrap()
        })
    }

    fn digit_text<'code>() -> impl Parser<'code, String> {
        capture(some(char_where(|c| c.is_ascii_digit())), str::to_owned)
    }

    #[test]
    fn test_right_associative_power() {
        let power = PrecedenceRight::builder()
            .higher(number())
            .op(2, literal("^"), |ops| ops[0].pow(ops[1] as u32))
            .build()
            .unwrap();

        let mut state = ParseState::new("2^3^2");
        assert!(power.parse(&mut state));
        // Right grouping: 2^(3^2) = 512, not (2^3)^2 = 64.
        assert_eq!(state.stack(), &[512]);
        assert_eq!(state.deferred_len(), 0);
    }

    #[test]
    fn test_right_grouping_structure() {
        let power = PrecedenceRight::builder()
            .higher(digit_text())
            .op(2, literal("^"), |ops: Vec<String>| {
                format!("({}^{})", ops[0], ops[1])
            })
            .build()
            .unwrap();

        let mut state = ParseState::new("2^3^2");
        assert!(power.parse(&mut state));
        assert_eq!(state.stack(), &["(2^(3^2))".to_owned()]);
    }

    #[test]
    fn test_single_operand_runs_no_effects() {
        let power = PrecedenceRight::builder()
            .higher(number())
            .op(2, literal("^"), |ops| ops[0].pow(ops[1] as u32))
            .build()
            .unwrap();

        let mut state = ParseState::new("7");
        assert!(power.parse(&mut state));
        assert_eq!(state.stack(), &[7]);
        assert_eq!(state.deferred_len(), 0);
    }

    #[test]
    fn test_operand_failure_discards_enqueued_effects() {
        // An operand parser that enqueues an effect and then fails exercises
        // the discard path directly: the chain as a whole fails, so the
        // effect must be dropped, not executed.
        let ran = Rc::new(Cell::new(false));
        let ran_probe = Rc::clone(&ran);

        let poisoned = move |s: &mut ParseState<i64>| {
            let ran = Rc::clone(&ran_probe);
            s.push_deferred(Effect::Stackless(Rc::new(move |_: &mut ParseState<i64>| {
                ran.set(true);
            })));
            false
        };

        let level = PrecedenceRight::builder()
            .higher(poisoned)
            .op(2, literal("^"), |ops| ops[0] + ops[1])
            .build()
            .unwrap();

        let mut state: ParseState<i64> = ParseState::new("2^3");
        assert!(!level.parse(&mut state));
        assert_eq!(state.deferred_len(), 0);
        assert!(!ran.get(), "discarded effect must never execute");
    }

    #[test]
    fn test_checkpoint_isolates_enclosing_effects() {
        // Effects enqueued below this invocation's checkpoint belong to an
        // enclosing invocation and must not be touched.
        let ran = Rc::new(Cell::new(false));
        let ran_probe = Rc::clone(&ran);

        let power = PrecedenceRight::builder()
            .higher(number())
            .op(2, literal("^"), |ops| ops[0].pow(ops[1] as u32))
            .build()
            .unwrap();

        let mut state: ParseState<i64> = ParseState::new("2^3");
        state.push_deferred(Effect::Stackless(Rc::new(
            move |_: &mut ParseState<i64>| {
                ran_probe.set(true);
            },
        )));

        assert!(power.parse(&mut state));
        assert_eq!(state.stack(), &[8]);
        assert_eq!(state.deferred_len(), 1);
        assert!(!ran.get(), "enclosing invocation's effect must stay queued");
    }

    #[test]
    fn test_op_suffix_defers_too() {
        let level = PrecedenceRight::builder()
            .higher(digit_text())
            .op(2, literal("^"), |ops: Vec<String>| {
                format!("({}^{})", ops[0], ops[1])
            })
            .op_suffix(1, literal("?"), |ops| format!("({}?)", ops[0]))
            .build()
            .unwrap();

        // The suffix effect was enqueued last, so it runs first (LIFO) and
        // consumes the rightmost operand; the binary effect then sees the
        // suffixed value.
        let mut state = ParseState::new("2^3?");
        assert!(level.parse(&mut state));
        assert_eq!(state.stack(), &["(2^(3?))".to_owned()]);
    }

    #[test]
    fn test_higher_twice_is_a_configuration_error() {
        let result = PrecedenceRight::builder()
            .higher(number())
            .higher(number())
            .build();
        assert!(matches!(result, Err(GrammarError::HigherAlreadyDefined)));
    }

    #[test]
    fn test_missing_higher_is_a_configuration_error() {
        let result = PrecedenceRight::<i64>::builder().build();
        assert!(matches!(result, Err(GrammarError::HigherMissing)));
    }
}
