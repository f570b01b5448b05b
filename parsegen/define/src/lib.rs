//! Parsegen Definition Library
//!
//! This crate provides the metadata records that describe response-parser
//! classes. They are produced by a scan step (a manifest file or the Java
//! source scanner in `parsegen-gen`) and consumed by the generator, which
//! turns each annotated parser into a family of typed `toObservable*`
//! conversion methods.
//!
//! ## Core Types
//!
//! - [`ClassDecl`] - A scanned class with its type parameters, supertypes and members
//! - [`ConstructorDecl`] - A constructor with its parameters and varargs flag
//! - [`MethodDecl`] - A method shape (used to find the parse method)
//! - [`ParserAnnotation`] - The parser alias and optional wrapper types
//! - [`TypeName`] - A structured Java type reference
//! - [`TypeVariable`] - A declared type parameter with bounds
//! - [`ParserManifest`] - Class declarations loaded from TOML, JSON or YAML
//!
//! ## Examples
//!
//! Describe a single-type-parameter parser by hand:
//!
//! ```
//! use parsegen_define::prelude::*;
//!
//! let mut class = ClassDecl::new("com.example.parser.ResponseParser");
//! class.type_parameters = vec![TypeVariable::new("T")];
//! class.supertypes = vec![TypeName::parse("rxhttp.wrapper.parse.TypeParser<T>").unwrap()];
//! class.constructors = vec![ConstructorDecl::public(vec![
//!     ParamDecl::new("type", TypeName::type_descriptor()),
//! ])];
//! class.parser = Some(ParserAnnotation::with_wrappers(
//!     "Response",
//!     vec![TypeName::class("com.example.entity.PageList")],
//! ));
//! class.normalize();
//!
//! assert_eq!(class.generic_arity(), 1);
//! assert_eq!(class.supertypes[0].type_arguments()[0], TypeName::variable("T"));
//! ```

pub mod declaration;
pub mod error;
pub mod manifest;
pub mod prelude;
pub mod types;

pub use declaration::{
    ClassDecl, ConstructorDecl, MethodDecl, ParamDecl, ParserAnnotation, SourceLocation,
    Visibility,
};
pub use error::DefineError;
pub use manifest::ParserManifest;
pub use types::{TypeName, TypeVariable, WildcardBound};
