//! Convenient re-exports for describing parser classes.
//!
//! ## Examples
//!
//! ```
//! use parsegen_define::prelude::*;
//!
//! let mut class = ClassDecl::new("com.example.StringParser");
//! class.parser = Some(ParserAnnotation::new("Str"));
//! assert!(class.is_public());
//! ```

pub use crate::declaration::{
    ClassDecl, ConstructorDecl, MethodDecl, ParamDecl, ParserAnnotation, SourceLocation,
    Visibility,
};
pub use crate::manifest::ParserManifest;
pub use crate::types::{TypeName, TypeVariable, WildcardBound};
