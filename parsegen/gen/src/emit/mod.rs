//! Emission backends for generated methods.
//!
//! Both backends render the same [`GeneratedUnit`](crate::ir::GeneratedUnit),
//! so they always agree on which methods exist for each alias.
//!
//! ## Submodules
//!
//! - [`java`] - Renders one compilable Java source file
//! - [`declarative`] - Renders a JSON listing of every method signature
//!
//! No validation happens here; see [`crate::pipeline`] for collision checks
//! and [`crate::output`] for file writing.

pub mod declarative;
pub mod java;

pub use declarative::render_declarative;
pub use java::{ImportSet, render_java};
