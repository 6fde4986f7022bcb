//! # javac
//!
//! Orchestrates the compiler end to end (§6, §9): given one or more parsed, typed compilation
//! units and a classpath, runs two-phase compilation — every class's signature registered before
//! any method body is compiled, so cross-class references within one invocation resolve
//! regardless of declaration order or file order — and returns the serialized class files the
//! driver writes to disk.
//!
//! Parsing is out of scope (§1); this crate's input is already a [`javac_ast::CompilationUnit`]
//! tree that obeys the Java 8 grammar and already carries resolved internal names on every
//! [`javac_ast::Type::Reference`].
//!
//! ## Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` to ensure everything is implemented in 100% safe Rust.

#![forbid(unsafe_code)]

mod error;
mod order;
mod signature;

pub use error::{CompileError, ErrorKind};

use javac_ast::CompilationUnit;
use javac_classpath::Classpath;
use tracing::{debug, instrument, warn};

/// The result of a [`compile`] run: every class successfully produced, plus one error per
/// compilation unit that failed. Per §7's propagation policy, a unit failing does not stop the
/// others from compiling — the driver writes every successful class and reports every error.
#[derive(Debug, Default)]
pub struct CompileOutcome {
    pub classes: Vec<(String, Vec<u8>)>,
    pub errors: Vec<CompileError>,
}

impl CompileOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles every unit in `units` against `classpath`, registering each unit's classes into it
/// along the way. Phase 1 registers every unit's signature before phase 2 compiles any body, so
/// cross-unit references resolve regardless of order (§9); phase 2 compiles each unit
/// independently, collecting a [`CompileError`] for any unit that fails rather than aborting the
/// whole run, matching §7's "proceeds to the next unit" policy.
#[instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn compile(classpath: &mut Classpath, units: &[CompilationUnit]) -> CompileOutcome {
    let order = order::topological_order(units);

    for &index in &order {
        let unit = &units[index];
        for class in &unit.types {
            signature::register_class(classpath, unit.package.as_deref(), &[], class);
        }
    }
    debug!(units = units.len(), "phase 1 complete: signatures registered");

    let mut outcome = CompileOutcome::default();
    for &index in &order {
        let unit = &units[index];
        match compile_unit(classpath, unit) {
            Ok(classes) => outcome.classes.extend(classes),
            Err(error) => {
                warn!(package = ?unit.package, %error, "unit failed to compile");
                outcome.errors.push(error);
            }
        }
    }
    outcome
}

fn compile_unit(classpath: &Classpath, unit: &CompilationUnit) -> error::Result<Vec<(String, Vec<u8>)>> {
    let compiled = javac_codegen::compile_compilation_unit(classpath, unit)?;
    let mut output = Vec::with_capacity(compiled.len());
    for (name, class_file) in compiled {
        let mut bytes = Vec::new();
        class_file.to_bytes(&mut bytes)?;
        debug!(class = %name, bytes = bytes.len(), "class compiled");
        output.push((name, bytes));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use javac_ast::{ClassDecl, ClassKind, Modifiers, Span, Type};
    use javac_classpath::{ClassInfo, MethodInfo};

    fn empty_class(name: &str) -> ClassDecl {
        ClassDecl {
            kind: ClassKind::Class,
            modifiers: Modifiers::public(),
            name: name.to_string(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            enum_constants: Vec::new(),
            nested: Vec::new(),
            span: Span::synthetic(),
        }
    }

    /// A classpath with only `java/lang/Object`'s default constructor registered, standing in
    /// for the platform runtime a real invocation would load from a `rt.jar`-equivalent archive.
    fn classpath_with_object() -> Classpath {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(ClassInfo {
            internal_name: "java/lang/Object".to_string(),
            super_name: None,
            interfaces: Vec::new(),
            is_interface: false,
            fields: Vec::new(),
            methods: vec![MethodInfo {
                name: "<init>".to_string(),
                params: Vec::new(),
                return_type: Type::Void,
                is_static: false,
                is_varargs: false,
                is_abstract: false,
            }],
        });
        classpath
    }

    #[test]
    fn compiles_a_single_empty_class() {
        let mut classpath = classpath_with_object();
        let unit = CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![empty_class("Empty")],
        };
        let outcome = compile(&mut classpath, std::slice::from_ref(&unit));
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        assert_eq!(outcome.classes.len(), 1);
        assert_eq!(outcome.classes[0].0, "Empty");
        assert!(!outcome.classes[0].1.is_empty());
    }

    #[test]
    fn orders_subclass_after_its_superclass_unit() {
        let mut classpath = classpath_with_object();
        let mut child = empty_class("Child");
        child.superclass = Some(Type::reference("Parent"));
        let child_unit = CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![child],
        };
        let parent_unit = CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![empty_class("Parent")],
        };
        // Child's unit is listed first; the topological sort must still compile Parent's
        // signature before Child's body needs it.
        let outcome = compile(&mut classpath, &[child_unit, parent_unit]);
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        assert_eq!(outcome.classes.len(), 2);
    }

    #[test]
    fn isolates_a_failing_unit_from_the_rest() {
        let mut classpath = classpath_with_object();
        let mut broken = empty_class("Broken");
        broken.superclass = Some(Type::reference("does/not/Exist"));
        // `Broken` extends an unregistered class, so its implicit super constructor call
        // cannot resolve; `Healthy` shares nothing with it and must still compile.
        let broken_unit = CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![broken],
        };
        let healthy_unit = CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![empty_class("Healthy")],
        };
        let outcome = compile(&mut classpath, &[broken_unit, healthy_unit]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.classes.len(), 1);
        assert_eq!(outcome.classes[0].0, "Healthy");
    }
}
