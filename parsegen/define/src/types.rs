//! Java type references.
//!
//! Parser classes are described in terms of Java types: constructor
//! parameters, parse-method return types, type parameter bounds and wrapper
//! containers. This module provides a small structured model of those types:
//!
//! - [`TypeName`] - A type reference (primitive, class, type variable, array, wildcard)
//! - [`TypeVariable`] - A declared type parameter with optional bounds
//! - [`WildcardBound`] - The `extends` / `super` side of a wildcard
//!
//! Class names are always stored fully qualified (`java.util.List`). The
//! simple name used in generated source is derived on demand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::DefineError;

/// Fully qualified name of the runtime type descriptor.
pub const TYPE: &str = "java.lang.reflect.Type";
/// Fully qualified name of the class token type.
pub const CLASS: &str = "java.lang.Class";
/// Fully qualified name of the universal top type.
pub const OBJECT: &str = "java.lang.Object";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double", "void",
];

/// Types that are implicitly imported in every Java compilation unit.
pub const JAVA_LANG: &[&str] = &[
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Exception",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Number",
    "Object",
    "Override",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "SuppressWarnings",
    "Throwable",
    "Void",
];

/// Direction of a wildcard bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum WildcardBound {
    /// `? extends X`
    Extends,
    /// `? super X`
    Super,
}

/// A reference to a Java type.
///
/// ## Examples
///
/// ```
/// use parsegen_define::TypeName;
///
/// let ty = TypeName::parse("java.util.Map<java.lang.String, java.util.List<T>>").unwrap();
/// assert_eq!(ty.simple_name(), "Map");
/// assert_eq!(ty.type_arguments().len(), 2);
/// assert_eq!(ty.to_string(), "java.util.Map<java.lang.String, java.util.List<T>>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeName {
    /// A primitive type such as `int` or `void`.
    Primitive(String),
    /// A class or interface, optionally parameterized.
    Class {
        /// Fully qualified name, nested classes joined with `.`.
        name: String,
        /// Type arguments; empty for raw or non-generic types.
        args: Vec<TypeName>,
    },
    /// A reference to a declared type parameter.
    Variable(String),
    /// An array of the component type.
    Array(Box<TypeName>),
    /// A wildcard type argument.
    Wildcard(Option<(WildcardBound, Box<TypeName>)>),
}

impl TypeName {
    /// Creates a non-parameterized class reference.
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a parameterized class reference.
    pub fn parameterized(name: impl Into<String>, args: Vec<TypeName>) -> Self {
        Self::Class {
            name: name.into(),
            args,
        }
    }

    /// Creates a type variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Wraps this type in a single array dimension.
    pub fn array_of(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// The runtime type descriptor, `java.lang.reflect.Type`.
    pub fn type_descriptor() -> Self {
        Self::class(TYPE)
    }

    /// A class token for the given type argument, `Class<arg>`.
    pub fn class_token(arg: TypeName) -> Self {
        Self::parameterized(CLASS, vec![arg])
    }

    /// Parses Java type syntax.
    ///
    /// Accepts primitives, dotted class names, type arguments, wildcards and
    /// trailing array dimensions (`[]` or `...`).
    ///
    /// ## Examples
    ///
    /// ```
    /// use parsegen_define::TypeName;
    ///
    /// let ty = TypeName::parse("java.lang.reflect.Type[]").unwrap();
    /// assert!(ty.is_type_descriptor_array());
    ///
    /// assert!(TypeName::parse("List<").is_err());
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `DefineError::InvalidType` when the input is not a type.
    pub fn parse(input: &str) -> Result<Self, DefineError> {
        let mut parser = TypeParser::new(input);
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    /// Returns the fully qualified name of a class type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the type arguments of a parameterized class type.
    pub fn type_arguments(&self) -> &[TypeName] {
        match self {
            Self::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// Returns the same type without type arguments.
    pub fn raw(&self) -> Self {
        match self {
            Self::Class { name, .. } => Self::class(name.clone()),
            other => other.clone(),
        }
    }

    /// Returns `true` for a parameterized class type.
    pub fn is_parameterized(&self) -> bool {
        !self.type_arguments().is_empty()
    }

    /// Returns `true` for an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` if this is a class type with the given qualified name.
    pub fn is_class_named(&self, qualified: &str) -> bool {
        self.class_name() == Some(qualified)
    }

    /// Returns `true` for `java.lang.reflect.Type`.
    pub fn is_type_descriptor(&self) -> bool {
        self.is_class_named(TYPE) && !self.is_parameterized()
    }

    /// Returns `true` for `java.lang.reflect.Type[]`.
    pub fn is_type_descriptor_array(&self) -> bool {
        matches!(self, Self::Array(inner) if inner.is_type_descriptor())
    }

    /// Returns `true` for `java.lang.Class`, with or without type arguments.
    pub fn is_class_token(&self) -> bool {
        self.is_class_named(CLASS)
    }

    /// Returns the simple (unqualified) name of this type's outermost class.
    ///
    /// ## Examples
    ///
    /// ```
    /// use parsegen_define::TypeName;
    ///
    /// assert_eq!(TypeName::class("com.example.PageList").simple_name(), "PageList");
    /// assert_eq!(TypeName::variable("T").simple_name(), "T");
    /// ```
    pub fn simple_name(&self) -> String {
        match self {
            Self::Primitive(name) | Self::Variable(name) => name.clone(),
            Self::Class { name, .. } => simple_name_of(name).to_string(),
            Self::Array(inner) => format!("{}[]", inner.simple_name()),
            Self::Wildcard(_) => "?".to_string(),
        }
    }

    /// Returns the erased type as it appears in a JVM method descriptor.
    ///
    /// Type variables erase to the first bound declared in `scope`, or to
    /// `java.lang.Object` when unbounded or not found.
    pub fn erasure(&self, scope: &[TypeVariable]) -> String {
        match self {
            Self::Primitive(name) => name.clone(),
            Self::Class { name, .. } => name.clone(),
            Self::Variable(var) => scope
                .iter()
                .find(|tv| &tv.name == var)
                .and_then(|tv| tv.bounds.first())
                .map_or_else(|| OBJECT.to_string(), |bound| bound.erasure(scope)),
            Self::Array(inner) => format!("{}[]", inner.erasure(scope)),
            Self::Wildcard(_) => OBJECT.to_string(),
        }
    }

    /// Rewrites every class name through `f`, leaving structure unchanged.
    pub fn map_class_names(&self, f: &mut impl FnMut(&str) -> TypeName) -> TypeName {
        match self {
            Self::Class { name, args } => {
                let args: Vec<TypeName> = args.iter().map(|a| a.map_class_names(f)).collect();
                match f(name) {
                    Self::Class { name, .. } => Self::Class { name, args },
                    other => other,
                }
            }
            Self::Array(inner) => Self::Array(Box::new(inner.map_class_names(f))),
            Self::Wildcard(Some((bound, inner))) => {
                Self::Wildcard(Some((*bound, Box::new(inner.map_class_names(f)))))
            }
            other => other.clone(),
        }
    }

    /// Turns bare identifiers naming one of `variables` into type variables.
    ///
    /// ## Examples
    ///
    /// ```
    /// use parsegen_define::TypeName;
    ///
    /// let ty = TypeName::parse("java.util.List<T>").unwrap();
    /// let resolved = ty.resolve_variables(&["T".to_string()]);
    /// assert_eq!(resolved.type_arguments()[0], TypeName::variable("T"));
    /// ```
    pub fn resolve_variables(&self, variables: &[String]) -> TypeName {
        self.map_class_names(&mut |name| {
            if variables.iter().any(|v| v == name) {
                TypeName::variable(name)
            } else {
                TypeName::class(name)
            }
        })
    }

    /// Qualifies bare `java.lang` names such as `String` or `Class`.
    pub fn qualify_java_lang(&self) -> TypeName {
        self.map_class_names(&mut |name| {
            if JAVA_LANG.contains(&name) {
                TypeName::class(format!("java.lang.{name}"))
            } else {
                TypeName::class(name)
            }
        })
    }

    /// Visits every class name reachable from this type.
    pub fn for_each_class(&self, f: &mut impl FnMut(&str)) {
        match self {
            Self::Class { name, args } => {
                f(name);
                for arg in args {
                    arg.for_each_class(f);
                }
            }
            Self::Array(inner) => inner.for_each_class(f),
            Self::Wildcard(Some((_, inner))) => inner.for_each_class(f),
            _ => {}
        }
    }
}

/// Returns the last dotted segment of a qualified name.
pub fn simple_name_of(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) | Self::Variable(name) => f.write_str(name),
            Self::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Wildcard(None) => f.write_str("?"),
            Self::Wildcard(Some((bound, inner))) => write!(f, "? {bound} {inner}"),
        }
    }
}

impl FromStr for TypeName {
    type Err = DefineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeName {
    type Error = DefineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.to_string()
    }
}

/// A declared type parameter such as `T` or `T extends Number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVariable {
    /// The parameter name.
    pub name: String,
    /// Upper bounds; `java.lang.Object` bounds are dropped on construction.
    #[serde(default)]
    pub bounds: Vec<TypeName>,
}

impl TypeVariable {
    /// Creates an unbounded type variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// Creates a bounded type variable, filtering out `Object` bounds.
    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeName>) -> Self {
        Self {
            name: name.into(),
            bounds: bounds
                .into_iter()
                .filter(|b| !b.is_class_named(OBJECT))
                .collect(),
        }
    }

    /// Returns `true` when no bound other than the top type was declared.
    pub fn is_unbounded(&self) -> bool {
        self.bounds.iter().all(|b| b.is_class_named(OBJECT))
    }

    /// Returns this variable as a type reference.
    pub fn as_type(&self) -> TypeName {
        TypeName::variable(self.name.clone())
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            f.write_str(if i == 0 { " extends " } else { " & " })?;
            write!(f, "{bound}")?;
        }
        Ok(())
    }
}

/// Recursive-descent parser over Java type syntax.
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, reason: &str) -> DefineError {
        DefineError::InvalidType {
            input: self.input.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .take_while(|(i, c)| {
                if *i == 0 {
                    c.is_alphabetic() || *c == '_' || *c == '$'
                } else {
                    c.is_alphanumeric() || *c == '_' || *c == '$'
                }
            })
            .map(|(i, c)| i + c.len_utf8())
            .last()?;
        self.pos += len;
        Some(&rest[..len])
    }

    fn parse_type(&mut self) -> Result<TypeName, DefineError> {
        self.skip_ws();
        let base = if self.eat("?") {
            let bound = if self.eat_keyword("extends") {
                Some((WildcardBound::Extends, Box::new(self.parse_type()?)))
            } else if self.eat_keyword("super") {
                Some((WildcardBound::Super, Box::new(self.parse_type()?)))
            } else {
                None
            };
            return Ok(TypeName::Wildcard(bound));
        } else {
            self.parse_named()?
        };
        self.parse_dimensions(base)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let Some(after) = self.rest().strip_prefix(keyword) else {
            return false;
        };
        let followed_by_ident = after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if !followed_by_ident {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn parse_named(&mut self) -> Result<TypeName, DefineError> {
        let first = self
            .ident()
            .ok_or_else(|| self.error("expected a type name"))?;
        if PRIMITIVES.contains(&first) {
            return Ok(TypeName::Primitive(first.to_string()));
        }

        let mut name = first.to_string();
        let mut args = Vec::new();
        loop {
            if self.eat("<") {
                args = self.parse_arguments()?;
            }
            self.skip_ws();
            // `.class` never appears in a type; a dot must start another segment.
            if self.rest().starts_with('.') && !self.rest().starts_with("...") {
                self.pos += 1;
                let segment = self
                    .ident()
                    .ok_or_else(|| self.error("expected a name after '.'"))?;
                name.push('.');
                name.push_str(segment);
                // Type arguments on an outer class are dropped; only the innermost are kept.
                args.clear();
            } else {
                break;
            }
        }
        Ok(TypeName::Class { name, args })
    }

    fn parse_arguments(&mut self) -> Result<Vec<TypeName>, DefineError> {
        let mut args = vec![self.parse_type()?];
        loop {
            if self.eat(",") {
                args.push(self.parse_type()?);
            } else if self.eat(">") {
                return Ok(args);
            } else {
                return Err(self.error("expected ',' or '>'"));
            }
        }
    }

    fn parse_dimensions(&mut self, mut ty: TypeName) -> Result<TypeName, DefineError> {
        loop {
            if self.eat("[") {
                if !self.eat("]") {
                    return Err(self.error("expected ']'"));
                }
                ty = ty.array_of();
            } else if self.eat("...") {
                ty = ty.array_of();
            } else {
                return Ok(ty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitive() {
        assert_eq!(
            TypeName::parse("int").unwrap(),
            TypeName::Primitive("int".to_string())
        );
    }

    #[test]
    fn parses_nested_generics() {
        let ty = TypeName::parse("java.util.Map<K, java.util.List<V>>").unwrap();
        assert_eq!(ty.class_name(), Some("java.util.Map"));
        assert_eq!(ty.type_arguments().len(), 2);
        assert_eq!(
            ty.type_arguments()[1],
            TypeName::parameterized("java.util.List", vec![TypeName::class("V")])
        );
    }

    #[test]
    fn parses_varargs_as_array() {
        let ty = TypeName::parse("java.lang.reflect.Type...").unwrap();
        assert!(ty.is_type_descriptor_array());
    }

    #[test]
    fn parses_wildcards() {
        let ty = TypeName::parse("java.lang.Class<? extends T>").unwrap();
        match &ty.type_arguments()[0] {
            TypeName::Wildcard(Some((WildcardBound::Extends, inner))) => {
                assert_eq!(**inner, TypeName::class("T"));
            }
            other => panic!("Expected bounded wildcard, got: {:?}", other),
        }
        assert_eq!(ty.to_string(), "java.lang.Class<? extends T>");
    }

    #[test]
    fn keyword_prefix_is_not_a_bound() {
        let ty = TypeName::parse("java.util.List<? superclass>");
        assert!(ty.is_err());
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(TypeName::parse("java.util.List<T").is_err());
        assert!(TypeName::parse("Type[").is_err());
        assert!(TypeName::parse("").is_err());
        assert!(TypeName::parse("java.util.List<T>>").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in [
            "java.lang.reflect.Type[]",
            "com.example.Response<java.util.List<T>>",
            "java.lang.Class<?>",
            "java.util.Map<K, ? super V>",
        ] {
            assert_eq!(TypeName::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn type_descriptor_predicates() {
        assert!(TypeName::type_descriptor().is_type_descriptor());
        assert!(!TypeName::type_descriptor().is_type_descriptor_array());
        assert!(TypeName::type_descriptor().array_of().is_type_descriptor_array());
        assert!(TypeName::class_token(TypeName::variable("T")).is_class_token());
        assert!(!TypeName::class("com.example.Type").is_type_descriptor());
    }

    #[test]
    fn erasure_uses_first_bound() {
        let scope = vec![
            TypeVariable::bounded("T", vec![TypeName::class("java.lang.Number")]),
            TypeVariable::new("U"),
        ];
        assert_eq!(TypeName::variable("T").erasure(&scope), "java.lang.Number");
        assert_eq!(TypeName::variable("U").erasure(&scope), OBJECT);
        assert_eq!(
            TypeName::class_token(TypeName::variable("T")).erasure(&scope),
            CLASS
        );
        assert_eq!(
            TypeName::variable("T").array_of().erasure(&scope),
            "java.lang.Number[]"
        );
    }

    #[test]
    fn object_bound_is_dropped() {
        let tv = TypeVariable::bounded("T", vec![TypeName::class(OBJECT)]);
        assert!(tv.is_unbounded());
        assert_eq!(tv.to_string(), "T");

        let bounded = TypeVariable::bounded("T", vec![TypeName::class("java.lang.Number")]);
        assert!(!bounded.is_unbounded());
        assert_eq!(bounded.to_string(), "T extends java.lang.Number");
    }

    #[test]
    fn qualify_java_lang_leaves_other_names() {
        let ty = TypeName::parse("Class<String>").unwrap().qualify_java_lang();
        assert_eq!(ty.to_string(), "java.lang.Class<java.lang.String>");

        let ty = TypeName::parse("PageList<T>").unwrap().qualify_java_lang();
        assert_eq!(ty.to_string(), "PageList<T>");
    }

    #[test]
    fn for_each_class_visits_arguments() {
        let ty = TypeName::parse("java.util.Map<java.lang.String, com.x.Item[]>").unwrap();
        let mut seen = Vec::new();
        ty.for_each_class(&mut |name| seen.push(name.to_string()));
        assert_eq!(seen, vec!["java.util.Map", "java.lang.String", "com.x.Item"]);
    }

    #[test]
    fn serde_uses_java_syntax() {
        let ty: TypeName = serde_json::from_str("\"java.util.List<T>\"").unwrap();
        assert_eq!(ty.type_arguments().len(), 1);
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"java.util.List<T>\"");
    }
}
