use crate::error::GrammarError;
use crate::parser::Parser;
use crate::state::ParseState;
use std::cell::RefCell;
use std::rc::Rc;

/// A forward-declared parser slot, for recursive grammar rules.
///
/// A rule cannot reference itself (or a later rule) directly while it is
/// being built; `Forward` breaks the cycle. Create the cell first, use clones
/// of it inside the definitions that need the reference, then fill it exactly
/// once with [`define`](Forward::define).
///
/// Cloning a `Forward` clones the handle, not the slot: all clones resolve to
/// the same parser once it is defined.
pub struct Forward<'code, V: Clone> {
    cell: Rc<RefCell<Option<Rc<dyn Parser<'code, V> + 'code>>>>,
}

impl<'code, V: Clone> Forward<'code, V> {
    pub fn new() -> Self {
        Forward {
            cell: Rc::new(RefCell::new(None)),
        }
    }

    /// Fill the slot. Defining twice is a configuration error.
    pub fn define<P>(&self, parser: P) -> Result<(), GrammarError>
    where
        P: Parser<'code, V> + 'code,
    {
        let mut slot = self.cell.borrow_mut();
        if slot.is_some() {
            return Err(GrammarError::ForwardAlreadyDefined);
        }
        *slot = Some(Rc::new(parser));
        Ok(())
    }

    /// Whether the slot has been filled.
    pub fn is_defined(&self) -> bool {
        self.cell.borrow().is_some()
    }
}

impl<'code, V: Clone> Default for Forward<'code, V> {
    fn default() -> Self {
        Forward::new()
    }
}

impl<'code, V: Clone> Clone for Forward<'code, V> {
    fn clone(&self) -> Self {
        Forward {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<'code, V: Clone> Parser<'code, V> for Forward<'code, V> {
    /// # Panics
    ///
    /// Panics if the cell was never defined. Using an undefined forward
    /// parser is a grammar-construction mistake that only becomes detectable
    /// at first use.
    fn parse(&self, state: &mut ParseState<'code, V>) -> bool {
        let parser = self
            .cell
            .borrow()
            .clone()
            .expect("forward parser used before being defined");
        parser.parse(state)
    }
}
