//! Parsegen code generator library.
//!
//! This crate turns annotated response-parser classes into typed
//! `toObservable<Alias>` conversion methods. For each accepted parser it
//! generates:
//!
//! - A base method taking the raw constructor parameters
//! - A `Class<T>` token overload for generic parsers
//! - A `wrap<Parser>` helper that recovers nested generic types at runtime
//! - Wrapper overloads such as `toObservable<Alias>List` for each container type
//!
//! ## Modules
//!
//! - [`scan`] - Reads class declarations from Java sources with tree-sitter
//! - [`registry`] - Validates annotated classes and keys them by alias
//! - [`analyzer`] - Classifies constructor parameters as type witnesses or pass-through
//! - [`synth`] - Builds method IR from each valid constructor
//! - [`ir`] - The method representation both backends render
//! - [`pipeline`] - Runs registration and synthesis, then checks for collisions
//! - [`emit`] - Java and declarative JSON backends
//! - [`output`] - File layout, dry-run and atomic writing
//! - [`config`] - Generator settings loaded from TOML
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use parsegen_gen::config::GeneratorConfig;
//! use parsegen_gen::output::{OutputFormat, generate_and_write};
//! use parsegen_gen::pipeline::generate;
//! use parsegen_gen::scan::scan_sources;
//!
//! let config = GeneratorConfig::default();
//! let classes = scan_sources(&[PathBuf::from("app/src/main/java")], &config).unwrap();
//! let generation = generate(classes, &config).unwrap();
//! for diagnostic in &generation.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//!
//! // dry_run=true prints instead of writing
//! generate_and_write(&generation.unit, &config, Path::new("build"), OutputFormat::All, true)
//!     .unwrap();
//! ```
//!
//! ## Generated Code Structure
//!
//! For a parser `ResponseParser<T>` with alias `Response` and wrappers
//! `{PageList.class}`:
//!
//! ```text
//! public abstract class RxHttpParsers extends BaseRxHttp {
//!   // Response
//!   public static <T> Parser<T> wrapResponseParser(Type type) { ... }
//!
//!   public <T> ObservableCall<T> toObservableResponse(Type type) { ... }
//!
//!   public <T> ObservableCall<T> toObservableResponse(Class<T> type) { ... }
//!
//!   public <T> ObservableCall<List<T>> toObservableResponseList(Class<T> type) { ... }
//!
//!   public <T> ObservableCall<PageList<T>> toObservableResponsePageList(Class<T> type) { ... }
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod emit;
pub mod errors;
pub mod ir;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod scan;
pub mod synth;

#[cfg(test)]
mod test_utils;
