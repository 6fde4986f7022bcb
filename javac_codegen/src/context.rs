//! Per-class and per-method compilation state threaded through `expr`/`stmt` compilation.
//!
//! `javac_bytecode::LocalScope` allocates slots but does not remember source names or types, and
//! it is never told about parameters (`MethodBuilder::new` reserves their slots up front without
//! naming them). [`VarScope`] fills that gap: it is the code generator's own name→(slot, type)
//! table, kept in lock-step with `LocalScope::push_block`/`pop_block`.

use javac_ast::{Span, Type};
use javac_classfile::attributes::BootstrapMethod;
use javac_classpath::Classpath;
use javac_resolve::NameScope;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct VarScope {
    scopes: Vec<HashMap<String, (u16, Type)>>,
}

impl VarScope {
    pub fn new() -> VarScope {
        VarScope {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_block(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_block(&mut self) {
        self.scopes.pop();
        assert!(!self.scopes.is_empty(), "unbalanced push_block/pop_block");
    }

    pub fn declare(&mut self, name: &str, slot: u16, ty: Type) {
        self.scopes
            .last_mut()
            .expect("at least one scope")
            .insert(name.to_string(), (slot, ty));
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(u16, Type)> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).cloned())
    }
}

/// State shared by every method body compiled for one class: the classpath and name-resolution
/// context, this class's own identity, and the accumulators (`BootstrapMethods`, the lambda
/// carrier-method counter) that every method contributes into.
pub(crate) struct ClassContext<'a> {
    pub classpath: &'a Classpath,
    pub name_scope: NameScope<'a>,
    /// This class's internal (`/`-separated) binary name.
    pub internal_name: String,
    pub super_name: String,
    pub is_interface: bool,
    pub is_enum: bool,
    /// Enclosing class internal names, outermost first; empty for a top-level class.
    pub enclosing: Vec<String>,
    /// Accumulates one entry per distinct lambda/method-reference call site; serialized into the
    /// class's `BootstrapMethods` attribute once every method has been compiled.
    pub bootstrap_methods: Vec<BootstrapMethod>,
    /// Synthetic carrier methods produced by desugaring lambdas in this class, appended to the
    /// class's method list by the caller once compilation of the source methods is done.
    pub synthetic_methods: Vec<crate::class_builder::PendingMethod>,
    lambda_counter: u32,
    /// Set once any method body in this class uses `invokedynamic`; forces the class file to
    /// target major version 52 (Java 8) rather than the default 50 (Java 6).
    pub requires_java8: bool,
}

impl<'a> ClassContext<'a> {
    #[must_use]
    pub fn new(
        classpath: &'a Classpath,
        name_scope: NameScope<'a>,
        internal_name: String,
        super_name: String,
        is_interface: bool,
        is_enum: bool,
        enclosing: Vec<String>,
    ) -> ClassContext<'a> {
        ClassContext {
            classpath,
            name_scope,
            internal_name,
            super_name,
            is_interface,
            is_enum,
            enclosing,
            bootstrap_methods: Vec::new(),
            synthetic_methods: Vec::new(),
            lambda_counter: 0,
            requires_java8: false,
        }
    }

    pub fn resolve_class_name(&self, span: &Span, simple_or_qualified: &str) -> crate::error::Result<String> {
        self.name_scope
            .resolve(self.classpath, simple_or_qualified)
            .map_err(|_| crate::error::Error::NameResolution {
                span: span.clone(),
                name: simple_or_qualified.to_string(),
            })
    }

    /// Allocates the next synthetic carrier-method name for a desugared lambda body, e.g.
    /// `lambda$compiled$0`. Mirrors `javac`'s own `lambda$<enclosing>$N` naming scheme, simplified
    /// since this back-end does not track the enclosing method's name at the point a lambda is
    /// encountered.
    pub fn next_lambda_name(&mut self) -> String {
        let name = format!("lambda$compiled${}", self.lambda_counter);
        self.lambda_counter += 1;
        name
    }
}
