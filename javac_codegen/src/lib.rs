//! Translates a resolved, typed AST into JVM class-file models (§2, §4, §9).
//!
//! This crate owns the back half of the pipeline: given a [`javac_ast::CompilationUnit`] and a
//! [`javac_classpath::Classpath`] already populated with every class the unit's bodies can
//! reference, [`compile_compilation_unit`] produces one class-file model per class or interface
//! declaration, including nested ones. Parsing and name/type resolution happen upstream, in
//! `javac_resolve` and the orchestrating `javac` crate; this crate never reports "cannot find
//! symbol" against raw source, only against an AST that resolution has already accepted.

mod class_builder;
mod context;
mod desugar;
mod error;
mod expr;
mod lambda;
mod stmt;

pub use error::{Error, Result};

use javac_ast::CompilationUnit;
use javac_classfile::ClassFile;
use javac_classpath::Classpath;
use tracing::{debug, instrument};

/// Compiles every top-level and nested class/interface/enum declaration in `unit` into a
/// `(binary_name, ClassFile)` pair, binary names using `/`-separated internal form with `$`
/// joining a nested class to its enclosing one (e.g. `com/example/Outer$Inner`).
#[instrument(level = "debug", skip_all, fields(package = ?unit.package))]
pub fn compile_compilation_unit(classpath: &Classpath, unit: &CompilationUnit) -> Result<Vec<(String, ClassFile)>> {
    let mut output = Vec::new();
    for class in &unit.types {
        debug!(class = %class.name, "compiling class");
        let compiled = class_builder::compile_class(classpath, unit.package.as_deref(), &unit.imports, &[], class)?;
        output.extend(compiled);
    }
    Ok(output)
}
