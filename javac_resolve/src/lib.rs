//! # javac_resolve
//!
//! Turns source-level names into classpath facts: which class a simple name denotes, which
//! declaration a field access binds to, and which overload a method call selects (§4.5 of the
//! governing specification). Built entirely on top of `javac_classpath`'s synchronous lookup —
//! this crate never touches a `.class` file directly.
//!
//! ## Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` to ensure everything is implemented in 100% safe Rust.

#![forbid(unsafe_code)]
#![allow(dead_code)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::unwrap_used)]

mod conversion;
mod error;
mod field;
mod method;
mod name;

pub use conversion::{is_assignable, Phase};
pub use error::{Error, Result};
pub use field::resolve_field;
pub use method::resolve_method;
pub use name::NameScope;
