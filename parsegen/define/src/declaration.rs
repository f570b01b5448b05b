//! Class declarations scanned from parser sources.
//!
//! These records are the explicit replacement for reflecting over annotated
//! classes at compile time. A scan step (manifest or source scanner) fills
//! them in once; the generator only ever reads them.
//!
//! - [`ClassDecl`] - One class or interface with its members
//! - [`ConstructorDecl`] / [`MethodDecl`] / [`ParamDecl`] - Members
//! - [`ParserAnnotation`] - The `@Parser(name, wrappers)` annotation
//! - [`Visibility`] - Java access level
//! - [`SourceLocation`] - Where a declaration came from, for diagnostics

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{TypeName, TypeVariable, simple_name_of};

/// Java access level of a class or member.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use parsegen_define::Visibility;
///
/// assert_eq!(Visibility::from_str("protected").unwrap(), Visibility::Protected);
/// assert_eq!(Visibility::Public.to_string(), "public");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// No access modifier (package-private).
    Package,
    Private,
}

/// Where a declaration was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the declaration was read from.
    pub file: PathBuf,
    /// 1-based line, when the source format has lines worth reporting.
    #[serde(default)]
    pub line: Option<usize>,
}

impl SourceLocation {
    /// Creates a location pointing at a specific line.
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }

    /// Creates a location pointing at a whole file.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file.display(), line),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// A constructor or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A declared constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    /// `true` when the last parameter is declared with `...`.
    #[serde(default)]
    pub varargs: bool,
}

impl ConstructorDecl {
    /// Creates a public constructor with the given parameters.
    pub fn public(parameters: Vec<ParamDecl>) -> Self {
        Self {
            visibility: Visibility::Public,
            parameters,
            varargs: false,
        }
    }
}

/// A declared method. Only the shape matters; bodies are never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    pub return_type: TypeName,
}

/// The parser annotation attached to a class.
///
/// `wrappers` distinguishes an absent attribute (`None`) from an explicitly
/// empty list; both mean "no extra wrappers" to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserAnnotation {
    /// The alias used as a generated method-name suffix.
    ///
    /// Absent in a manifest reads as blank, which registration rejects for
    /// that class alone.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub wrappers: Option<Vec<TypeName>>,
}

impl ParserAnnotation {
    /// Creates an annotation without a wrappers attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wrappers: None,
        }
    }

    /// Creates an annotation with the given wrapper types.
    pub fn with_wrappers(name: impl Into<String>, wrappers: Vec<TypeName>) -> Self {
        Self {
            name: name.into(),
            wrappers: Some(wrappers),
        }
    }

    /// Returns the declared wrapper types, empty when the attribute is absent.
    pub fn wrappers(&self) -> &[TypeName] {
        self.wrappers.as_deref().unwrap_or_default()
    }
}

/// A scanned class or interface.
///
/// ## Examples
///
/// ```
/// use parsegen_define::{ClassDecl, ConstructorDecl, ParamDecl, ParserAnnotation, TypeName, TypeVariable};
///
/// let mut class = ClassDecl::new("com.example.ResponseParser");
/// class.type_parameters = vec![TypeVariable::new("T")];
/// class.constructors = vec![ConstructorDecl::public(vec![
///     ParamDecl::new("type", TypeName::type_descriptor()),
/// ])];
/// class.parser = Some(ParserAnnotation::new("Response"));
///
/// assert_eq!(class.simple_name(), "ResponseParser");
/// assert_eq!(class.generic_arity(), 1);
/// assert_eq!(class.public_constructors().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Fully qualified name; nested classes use `Outer.Inner`.
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeVariable>,
    /// Superclass and implemented interfaces, as written.
    #[serde(default)]
    pub supertypes: Vec<TypeName>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub parser: Option<ParserAnnotation>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl ClassDecl {
    /// Creates a public, non-generic class with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_abstract: false,
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            parser: None,
            location: None,
        }
    }

    /// The unqualified class name.
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// Number of declared type parameters.
    pub fn generic_arity(&self) -> usize {
        self.type_parameters.len()
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// The class as a raw type reference.
    pub fn as_type(&self) -> TypeName {
        TypeName::class(self.name.clone())
    }

    /// Constructors as the compiler sees them.
    ///
    /// A class that declares no constructors gets one implicit no-argument
    /// constructor with the class's own visibility.
    pub fn effective_constructors(&self) -> Vec<ConstructorDecl> {
        if self.constructors.is_empty() {
            vec![ConstructorDecl {
                visibility: self.visibility,
                parameters: Vec::new(),
                varargs: false,
            }]
        } else {
            self.constructors.clone()
        }
    }

    /// Public constructors in declaration order.
    pub fn public_constructors(&self) -> Vec<ConstructorDecl> {
        self.effective_constructors()
            .into_iter()
            .filter(|c| c.visibility == Visibility::Public)
            .collect()
    }

    /// Resolves type-variable identifiers and bare `java.lang` names in
    /// every type this class mentions.
    ///
    /// Scanners call this once after building a declaration so that later
    /// stages can compare qualified names directly.
    pub fn normalize(&mut self) {
        let variables: Vec<String> = self
            .type_parameters
            .iter()
            .map(|tv| tv.name.clone())
            .collect();
        let fix = |ty: &TypeName| ty.qualify_java_lang().resolve_variables(&variables);

        for tv in &mut self.type_parameters {
            let bounds = tv.bounds.iter().map(fix).collect();
            *tv = TypeVariable::bounded(tv.name.clone(), bounds);
        }
        for ty in &mut self.supertypes {
            *ty = fix(&*ty);
        }
        for ctor in &mut self.constructors {
            for param in &mut ctor.parameters {
                param.ty = fix(&param.ty);
            }
        }
        for method in &mut self.methods {
            method.return_type = fix(&method.return_type);
            for param in &mut method.parameters {
                param.ty = fix(&param.ty);
            }
        }
        if let Some(annotation) = &mut self.parser
            && let Some(wrappers) = &mut annotation.wrappers
        {
            for ty in wrappers.iter_mut() {
                *ty = ty.qualify_java_lang();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_constructor_follows_class_visibility() {
        let class = ClassDecl::new("com.example.PlainParser");
        let ctors = class.public_constructors();
        assert_eq!(ctors.len(), 1);
        assert!(ctors[0].parameters.is_empty());

        let mut hidden = ClassDecl::new("com.example.HiddenParser");
        hidden.visibility = Visibility::Package;
        assert!(hidden.public_constructors().is_empty());
    }

    #[test]
    fn declared_constructors_replace_the_implicit_one() {
        let mut class = ClassDecl::new("com.example.P");
        class.constructors = vec![ConstructorDecl {
            visibility: Visibility::Protected,
            parameters: vec![],
            varargs: false,
        }];
        assert!(class.public_constructors().is_empty());
    }

    #[test]
    fn absent_wrappers_read_as_empty() {
        let annotation = ParserAnnotation::new("Response");
        assert!(annotation.wrappers.is_none());
        assert!(annotation.wrappers().is_empty());

        let annotation =
            ParserAnnotation::with_wrappers("Response", vec![TypeName::class("com.x.PageList")]);
        assert_eq!(annotation.wrappers().len(), 1);
    }

    #[test]
    fn normalize_resolves_variables_and_java_lang() {
        let mut class = ClassDecl::new("com.example.P");
        class.type_parameters = vec![TypeVariable::bounded(
            "T",
            vec![TypeName::class("Object")],
        )];
        class.constructors = vec![ConstructorDecl::public(vec![
            ParamDecl::new("type", TypeName::type_descriptor()),
            ParamDecl::new("clazz", TypeName::parse("Class<T>").unwrap()),
        ])];
        class.methods = vec![MethodDecl {
            name: "onParse".to_string(),
            visibility: Visibility::Public,
            is_static: false,
            parameters: vec![ParamDecl::new("r", TypeName::class("okhttp3.Response"))],
            return_type: TypeName::parse("java.util.List<T>").unwrap(),
        }];

        class.normalize();

        assert!(class.type_parameters[0].is_unbounded());
        assert_eq!(
            class.constructors[0].parameters[1].ty,
            TypeName::class_token(TypeName::variable("T"))
        );
        assert_eq!(
            class.methods[0].return_type.type_arguments()[0],
            TypeName::variable("T")
        );
    }

    #[test]
    fn location_display() {
        assert_eq!(
            SourceLocation::new("src/A.java", 12).to_string(),
            "src/A.java:12"
        );
        assert_eq!(SourceLocation::file("parsers.toml").to_string(), "parsers.toml");
    }
}
