//! # javac_classpath
//!
//! The compiler's view of "what classes exist and what do they look like": a synchronous lookup
//! over a runtime archive/directory classpath plus the classes this invocation has compiled so
//! far (§4.4 of the governing specification). Unlike a JVM class loader this never links,
//! verifies, or initializes anything — it only answers existence, hierarchy, and member-shape
//! questions that the resolver and code generator need before they can compile a reference.
//!
//! ## Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` to ensure everything is implemented in 100% safe Rust.

#![forbid(unsafe_code)]
#![allow(dead_code)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::unwrap_used)]

mod class;
mod classpath;
mod descriptor;
mod entry;
mod error;
mod field;
mod method;

pub use class::ClassInfo;
pub use classpath::Classpath;
pub use entry::ClassPathEntry;
pub use error::{Error, Result};
pub use field::FieldInfo;
pub use method::MethodInfo;
