use super::{Effect, OpAlternative, OpSet};
use crate::error::GrammarError;
use crate::parser::Parser;
use crate::state::ParseState;
use std::rc::Rc;

/// A left-associative operator-precedence level.
///
/// Parses one operand at the higher precedence, then repeatedly tries the
/// registered operator alternatives in declaration order, stopping when none
/// match. Each matched alternative's effect runs immediately, before the next
/// repetition, so a chain `a op b op c` combines as `(a op b) op c`.
pub struct PrecedenceLeft<'code, V: Clone> {
    operand: Rc<dyn Parser<'code, V> + 'code>,
    alternatives: Vec<OpAlternative<'code, V>>,
}

impl<'code, V: Clone> PrecedenceLeft<'code, V> {
    pub fn builder() -> PrecedenceLeftBuilder<'code, V> {
        PrecedenceLeftBuilder { set: OpSet::new() }
    }

    /// Try one alternative transactionally: syntax, then (for binary
    /// operators) the operand, then the effect. The effect only runs once
    /// the alternative has fully matched.
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
            alternative.effect.apply(s);
            true
        })
    }
}

impl<'code, V: Clone> Parser<'code, V> for PrecedenceLeft<'code, V> {
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        state.transact(|s| {
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
        })
    }
}

/// Builder for [`PrecedenceLeft`]. Configuration is validated at
/// [`build`](PrecedenceLeftBuilder::build); misconfiguration is a
/// [`GrammarError`], never a parse-time condition.
pub struct PrecedenceLeftBuilder<'code, V: Clone> {
    set: OpSet<'code, V>,
}

impl<'code, V: Clone> PrecedenceLeftBuilder<'code, V> {
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

    pub fn build(self) -> Result<PrecedenceLeft<'code, V>, GrammarError> {
        let (operand, alternatives) = self.set.finish()?;
        Ok(PrecedenceLeft {
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

    fn number<'code>() -> impl Parser<'code, i64> {
        capture(some(char_where(|c| c.is_ascii_digit())), |s: &str| {
            s.parse().unwrap()
        })
    }

    fn digit_text<'code>() -> impl Parser<'code, String> {
        capture(some(char_where(|c| c.is_ascii_digit())), str::to_owned)
    }

    #[test]
    fn test_left_associative_sum() {
        let sum = PrecedenceLeft::builder()
            .higher(number())
            .op(2, literal("+"), |ops| ops[0] + ops[1])
            .op(2, literal("-"), |ops| ops[0] - ops[1])
            .build()
            .unwrap();

        let mut state = ParseState::new("10-3-4");
        assert!(sum.parse(&mut state));
        // Left grouping: (10-3)-4, not 10-(3-4).
        assert_eq!(state.stack(), &[3]);
    }

    #[test]
    fn test_left_grouping_structure() {
        let sum = PrecedenceLeft::builder()
            .higher(digit_text())
            .op(2, literal("+"), |ops: Vec<String>| {
                format!("({}+{})", ops[0], ops[1])
            })
            .build()
            .unwrap();

        let mut state = ParseState::new("1+2+3");
        assert!(sum.parse(&mut state));
        assert_eq!(state.stack(), &["((1+2)+3)".to_owned()]);
    }

    #[test]
    fn test_no_operator_degenerates_to_operand() {
        let level = PrecedenceLeft::builder()
            .higher(number())
            .build()
            .unwrap();

        let mut state = ParseState::new("42");
        assert!(level.parse(&mut state));
        assert_eq!(state.stack(), &[42]);
    }

    #[test]
    fn test_operand_failure_fails_whole_level() {
        let sum = PrecedenceLeft::builder()
            .higher(number())
            .op(2, literal("+"), |ops| ops[0] + ops[1])
            .build()
            .unwrap();

        let mut state = ParseState::new("x+2");
        assert!(!sum.parse(&mut state));
        assert_eq!(state.pos(), 0);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_trailing_operator_is_left_unconsumed() {
        let sum = PrecedenceLeft::builder()
            .higher(number())
            .op(2, literal("+"), |ops| ops[0] + ops[1])
            .build()
            .unwrap();

        // "1+2+" parses as 1+2; the dangling "+" fails its alternative,
        // which backtracks, and the repetition stops.
        let mut state = ParseState::new("1+2+");
        assert!(sum.parse(&mut state));
        assert_eq!(state.stack(), &[3]);
        assert_eq!(state.rest(), "+");
    }

    #[test]
    fn test_op_suffix() {
        let postfix = PrecedenceLeft::builder()
            .higher(number())
            .op_suffix(1, literal("!"), |ops| {
                (1..=ops[0]).product()
            })
            .build()
            .unwrap();

        let mut state = ParseState::new("4!");
        assert!(postfix.parse(&mut state));
        assert_eq!(state.stack(), &[24]);
    }

    #[test]
    fn test_op_affect_pushes_manually() {
        let swap = PrecedenceLeft::builder()
            .higher(number())
            .op_affect(2, literal("><"), |s, ops| {
                s.push(ops[1]);
                s.push(ops[0]);
            })
            .build()
            .unwrap();

        let mut state = ParseState::new("1><2");
        assert!(swap.parse(&mut state));
        assert_eq!(state.stack(), &[2, 1]);
    }

    #[test]
    fn test_op_stackless_sees_the_state() {
        let sum = PrecedenceLeft::builder()
            .higher(number())
            .op_stackless(literal("+"), |s: &mut ParseState<i64>| {
                let frame = s.frame(2);
                s.push(frame[0] + frame[1]);
            })
            .build()
            .unwrap();

        let mut state = ParseState::new("1+2");
        assert!(sum.parse(&mut state));
        assert_eq!(state.stack(), &[3]);
    }

    #[test]
    fn test_higher_twice_is_a_configuration_error() {
        let result = PrecedenceLeft::builder()
            .higher(number())
            .higher(number())
            .build();
        assert!(matches!(result, Err(GrammarError::HigherAlreadyDefined)));
    }

    #[test]
    fn test_missing_higher_is_a_configuration_error() {
        let result = PrecedenceLeft::<i64>::builder()
            .op(2, literal("+"), |ops| ops[0] + ops[1])
            .build();
        assert!(matches!(result, Err(GrammarError::HigherMissing)));
    }
}
