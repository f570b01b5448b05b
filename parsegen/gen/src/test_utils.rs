//! Shared test utilities for parsegen-gen tests.
//!
//! Helpers for building parser class declarations without going through a
//! manifest or the source scanner.

use parsegen_define::{
    ClassDecl, ConstructorDecl, MethodDecl, ParamDecl, ParserAnnotation, TypeName, TypeVariable,
    Visibility,
};

/// A `java.lang.reflect.Type` parameter.
pub fn type_param(name: &str) -> ParamDecl {
    ParamDecl::new(name, TypeName::type_descriptor())
}

/// A `java.lang.reflect.Type[]` parameter.
pub fn type_array(name: &str) -> ParamDecl {
    ParamDecl::new(name, TypeName::type_descriptor().array_of())
}

/// A parameter of any type, given in Java syntax.
pub fn param(name: &str, ty: &str) -> ParamDecl {
    ParamDecl::new(name, TypeName::parse(ty).unwrap())
}

/// `Class<var>` for a type variable.
pub fn class_token(var: &str) -> TypeName {
    TypeName::class_token(TypeName::variable(var))
}

/// A public class with unbounded type parameters and nothing else.
pub fn generic_class(name: &str, vars: &[&str]) -> ClassDecl {
    let mut class = ClassDecl::new(name);
    class.type_parameters = vars.iter().map(|v| TypeVariable::new(*v)).collect();
    class
}

/// `public <return_type> onParse(okhttp3.Response response)`.
pub fn parse_method(return_type: &str) -> MethodDecl {
    MethodDecl {
        name: "onParse".to_string(),
        visibility: Visibility::Public,
        is_static: false,
        parameters: vec![param("response", "okhttp3.Response")],
        return_type: TypeName::parse(return_type).unwrap(),
    }
}

/// Creates an annotated parser class.
///
/// ## Arguments
///
/// * `name` - Qualified class name
/// * `alias` - Annotation name
/// * `vars` - Class type parameters (unbounded)
/// * `constructors` - Declared constructors; empty means the implicit one
/// * `return_type` - Return type of `onParse`, in Java syntax
pub fn make_parser(
    name: &str,
    alias: &str,
    vars: &[&str],
    constructors: Vec<ConstructorDecl>,
    return_type: &str,
) -> ClassDecl {
    let mut class = generic_class(name, vars);
    let parser_args = vars.iter().map(|v| TypeName::class(*v)).collect();
    class.supertypes = vec![TypeName::parameterized(
        "rxhttp.wrapper.parse.TypeParser",
        parser_args,
    )];
    class.constructors = constructors;
    class.methods = vec![parse_method(return_type)];
    class.parser = Some(ParserAnnotation::new(alias));
    class.normalize();
    class
}

/// A `Parser<String>` with no type parameters and the implicit constructor.
pub fn simple_parser(name: &str, alias: &str) -> ClassDecl {
    let mut class = make_parser(name, alias, &[], vec![], "java.lang.String");
    class.supertypes = vec![TypeName::parse("rxhttp.wrapper.parse.Parser<java.lang.String>").unwrap()];
    class
}

/// A `TypeParser<T>` with a single `(Type type)` constructor returning `T`.
pub fn single_type_parser(name: &str, alias: &str) -> ClassDecl {
    make_parser(
        name,
        alias,
        &["T"],
        vec![ConstructorDecl::public(vec![type_param("type")])],
        "T",
    )
}

/// Sets the annotation's wrapper list.
pub fn with_wrappers(mut class: ClassDecl, wrappers: &[&str]) -> ClassDecl {
    let alias = class
        .parser
        .as_ref()
        .map(|a| a.name.clone())
        .unwrap_or_default();
    let wrappers = wrappers.iter().map(|w| TypeName::class(*w)).collect();
    class.parser = Some(ParserAnnotation::with_wrappers(alias, wrappers));
    class
}
