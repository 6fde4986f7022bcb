//! Local-variable slot allocation.
//!
//! Slot 0 is `this` for instance methods, declared parameters follow in order, and user locals
//! introduced by the method body come last. `long`/`double` locals occupy two consecutive slots,
//! matching `javac_classfile::attributes::MaxLocals`'s accounting.

use javac_ast::Type;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct LocalScope {
    next_slot: u16,
    names: Vec<HashMap<String, u16>>,
}

impl LocalScope {
    #[must_use]
    pub fn new(is_static: bool, params: &[Type]) -> LocalScope {
        let mut scope = LocalScope {
            next_slot: 0,
            names: vec![HashMap::new()],
        };
        if !is_static {
            scope.next_slot = 1; // slot 0: `this`
        }
        for param_type in params {
            scope.next_slot += u16::from(param_type.category());
        }
        scope
    }

    /// Enters a nested block scope; locals declared within it are released on `pop_block`.
    pub fn push_block(&mut self) {
        self.names.push(HashMap::new());
    }

    /// Leaves the innermost block scope. Per JVM local-slot reuse convention this does not lower
    /// `next_slot` — `max_locals` is a high-water mark over the whole method, not a live count.
    pub fn pop_block(&mut self) {
        self.names.pop();
        assert!(!self.names.is_empty(), "unbalanced push_block/pop_block");
    }

    /// Declares a new local in the innermost block scope and returns its first slot.
    pub fn declare(&mut self, name: &str, ty: &Type) -> u16 {
        let slot = self.next_slot;
        self.next_slot += u16::from(ty.category());
        self.names
            .last_mut()
            .expect("at least one scope")
            .insert(name.to_string(), slot);
        slot
    }

    /// Looks up a previously declared local by name, searching inner scopes outward.
    #[must_use]
    pub fn slot_of(&self, name: &str) -> Option<u16> {
        self.names.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    /// Allocates a synthetic local (e.g. a `for`-each index or an enum `$VALUES` cursor) that has
    /// no source name and is never looked up by `slot_of`.
    pub fn declare_synthetic(&mut self, category: u8) -> u16 {
        let slot = self.next_slot;
        self.next_slot += u16::from(category);
        slot
    }

    /// The number of local slots used so far; feeds `Attribute::Code::max_locals` together with
    /// `javac_classfile::attributes::MaxLocals` once the instruction stream is final.
    #[must_use]
    pub fn slot_count(&self) -> u16 {
        self.next_slot
    }
}
