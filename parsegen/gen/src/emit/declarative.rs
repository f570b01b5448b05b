//! Declarative JSON rendering.
//!
//! A flat description of every generated method, for tools that produce a
//! second binding layer from the same parser set. Bodies are omitted; each
//! method carries its role and erased signature instead.
//!
//! The consumer is a Kotlin extension-function binding layer. It reads this
//! file and emits one extension per stream method on the generated class,
//! turning each `class_token` or `wrapper` entry into a reified
//! `inline fun <reified T>` that passes `T::class.java` through. That is why
//! type parameters are written with their bounds and wrapper entries name
//! their container type.
//!
//! ```json
//! {
//!   "package": "rxhttp.wrapper.param",
//!   "class_name": "RxHttpParsers",
//!   "superclass": "rxhttp.wrapper.param.BaseRxHttp",
//!   "parsers": [
//!     {
//!       "alias": "Str",
//!       "class": "com.example.StringParser",
//!       "methods": [
//!         {
//!           "name": "toObservableStr",
//!           "kind": "base",
//!           ...
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use parsegen_define::TypeName;
use serde::Serialize;

use crate::errors::GeneratorError;
use crate::ir::{GeneratedUnit, MethodRole, Parameter, ParserMethods, SynthesizedMethod};

#[derive(Debug, Serialize)]
struct DeclarativeUnit<'a> {
    package: &'a str,
    class_name: &'a str,
    superclass: &'a TypeName,
    parsers: Vec<DeclarativeParser<'a>>,
}

#[derive(Debug, Serialize)]
struct DeclarativeParser<'a> {
    alias: &'a str,
    class: &'a str,
    methods: Vec<DeclarativeMethod<'a>>,
}

#[derive(Debug, Serialize)]
struct DeclarativeMethod<'a> {
    name: &'a str,
    #[serde(flatten)]
    role: &'a MethodRole,
    #[serde(rename = "static")]
    is_static: bool,
    varargs: bool,
    type_parameters: Vec<String>,
    parameters: &'a [Parameter],
    return_type: &'a TypeName,
    signature: String,
}

impl<'a> From<&'a SynthesizedMethod> for DeclarativeMethod<'a> {
    fn from(method: &'a SynthesizedMethod) -> Self {
        Self {
            name: &method.name,
            role: &method.role,
            is_static: method.is_static,
            varargs: method.varargs,
            type_parameters: method
                .type_parameters
                .iter()
                .map(ToString::to_string)
                .collect(),
            parameters: &method.parameters,
            return_type: &method.return_type,
            signature: method.signature(),
        }
    }
}

impl<'a> From<&'a ParserMethods> for DeclarativeParser<'a> {
    fn from(group: &'a ParserMethods) -> Self {
        Self {
            alias: &group.alias,
            class: &group.class,
            methods: group.methods.iter().map(DeclarativeMethod::from).collect(),
        }
    }
}

/// Renders the unit as pretty-printed JSON with a trailing newline.
///
/// ## Errors
///
/// Returns `GeneratorError::Serialize` if serialization fails.
pub fn render_declarative(unit: &GeneratedUnit) -> Result<String, GeneratorError> {
    let document = DeclarativeUnit {
        package: &unit.package,
        class_name: &unit.class_name,
        superclass: &unit.superclass,
        parsers: unit.parsers.iter().map(DeclarativeParser::from).collect(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}
