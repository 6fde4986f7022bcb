//! Typed AST and JVM type model that the bytecode generation back-end compiles from.
//!
//! The lexer/parser that produces this tree is out of scope for this crate (see the governing
//! specification's Non-goals); this crate only defines the shape the parser's output, and the
//! resolver/codegen stages' input, must take.

pub mod ast;
pub mod span;
pub mod ty;

pub use ast::*;
pub use span::Span;
pub use ty::{Primitive, Type, ZeroValue, method_descriptor};
