//! Method synthesis.
//!
//! Turns one registered parser into its family of conversion methods. For
//! every public constructor that can supply the class's type witnesses:
//!
//! - `wrap<Parser>` (arity 1, leading `Type` witness): static helper that
//!   resolves nested generic types before constructing the parser
//! - `toObservable<Alias>`: takes the constructor's raw parameters
//! - `toObservable<Alias>` (arity > 0): takes `Class<T>` tokens and forwards
//!   them as `Type`
//! - `toObservable<Alias><Wrapper>` (arity 1, unbounded, list first): nests
//!   the result type in each wrapper container
//!
//! Nothing is produced when the class has no parse method. With reactive
//! streams disabled only the `wrap<Parser>` helpers are kept.
//!
//! Helper and wrapper locals never shadow a parameter: a clashing name gets
//! `_` appended until it is free.

use parsegen_define::{ClassDecl, TypeName, TypeVariable, Visibility};
use tracing::{debug, warn};

use crate::analyzer::{ConstructorSignature, ParamKind, analyze, array_witness_name};
use crate::config::{GeneratorConfig, RuntimeConfig};
use crate::ir::{Expr, MethodRole, Parameter, Stmt, SynthesizedMethod};
use crate::registry::ParserEntry;

/// Prefix shared by every generated stream method.
pub const METHOD_PREFIX: &str = "toObservable";
/// Bridge method on the generated class's superclass.
const BRIDGE_METHOD: &str = "toObservable";
const ACTUAL_TYPE: &str = "actualType";
const PARSER_LOCAL: &str = "parser";

/// Builds methods for registered parsers.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    fn runtime(&self) -> &RuntimeConfig {
        &self.config.runtime
    }

    /// All methods for one parser, in emission order.
    pub fn synthesize(&self, entry: &ParserEntry) -> Vec<SynthesizedMethod> {
        let Some(result_type) = self.parse_result_type(&entry.class) else {
            warn!(
                alias = %entry.alias,
                class = %entry.class.name,
                "No public {}({}) method; skipping parser",
                self.runtime().parse_method,
                self.runtime().response_type
            );
            return Vec::new();
        };

        if !self.config.reactive_streams {
            debug!(alias = %entry.alias, "Reactive streams disabled; emitting helpers only");
        }

        let mut methods = Vec::new();
        for (index, constructor) in entry.class.public_constructors().iter().enumerate() {
            match analyze(&entry.class, constructor) {
                Some(signature) => {
                    self.synthesize_constructor(entry, &signature, &result_type, &mut methods)
                }
                None => debug!(
                    class = %entry.class.name,
                    constructor = index,
                    "Constructor cannot supply type witnesses; skipped"
                ),
            }
        }
        methods
    }

    /// Return type of the public, non-static, single-argument parse method.
    pub fn parse_result_type(&self, class: &ClassDecl) -> Option<TypeName> {
        let runtime = self.runtime();
        class
            .methods
            .iter()
            .find(|m| {
                m.name == runtime.parse_method
                    && m.visibility == Visibility::Public
                    && !m.is_static
                    && m.parameters.len() == 1
                    && m.parameters[0].ty == runtime.response_type
            })
            .map(|m| m.return_type.clone())
    }

    fn synthesize_constructor(
        &self,
        entry: &ParserEntry,
        signature: &ConstructorSignature,
        result_type: &TypeName,
        methods: &mut Vec<SynthesizedMethod>,
    ) {
        let class = &entry.class;
        let arity = class.generic_arity();
        let name = format!("{METHOD_PREFIX}{}", entry.alias);
        let raw = signature.raw_parameters();

        let uses_helper = arity == 1 && signature.leads_with_single_witness();
        if uses_helper {
            methods.push(self.wrap_helper(class, signature));
        }
        if !self.config.reactive_streams {
            return;
        }

        let args: Vec<Expr> = raw.iter().map(|p| Expr::name(&p.name)).collect();
        let construct = if uses_helper {
            Expr::call(helper_name(class), args)
        } else {
            Expr::New {
                ty: class.as_type(),
                diamond: arity > 0,
                args,
            }
        };
        methods.push(SynthesizedMethod {
            name: name.clone(),
            role: MethodRole::Base,
            is_static: false,
            suppress_unchecked: false,
            type_parameters: class.type_parameters.clone(),
            varargs: is_varargs(signature, &raw),
            parameters: raw,
            return_type: self.stream_of(result_type.clone()),
            body: vec![Stmt::Return(Expr::call(BRIDGE_METHOD, vec![construct]))],
        });

        if arity == 0 {
            return;
        }

        let tokens = signature.class_token_parameters(&class.type_parameters);
        let varargs = is_varargs(signature, &tokens);
        let args = token_forwarding_args(signature, &class.type_parameters);
        methods.push(SynthesizedMethod {
            name: name.clone(),
            role: MethodRole::ClassToken,
            is_static: false,
            suppress_unchecked: false,
            type_parameters: class.type_parameters.clone(),
            parameters: tokens.clone(),
            varargs,
            return_type: self.stream_of(result_type.clone()),
            body: vec![Stmt::Return(Expr::call(name.clone(), args))],
        });

        let has_class_token = tokens.iter().any(|p| p.ty.is_class_token());
        let unbounded = class.type_parameters.iter().all(TypeVariable::is_unbounded);
        if !(has_class_token && arity == 1 && unbounded) {
            return;
        }

        for wrapper in self.wrapper_types(entry) {
            let Some(wrapper_name) = wrapper.class_name() else {
                continue;
            };
            let suffix = wrapper.simple_name();
            let (locals, args) = wrapper_forwarding(
                signature,
                &class.type_parameters,
                &wrapper.raw(),
                &self.runtime().parameterized_type,
                &suffix,
            );
            let mut body = locals;
            body.push(Stmt::Return(Expr::call(name.clone(), args)));

            methods.push(SynthesizedMethod {
                name: format!("{name}{suffix}"),
                role: MethodRole::Wrapper {
                    wrapper: wrapper.raw(),
                },
                is_static: false,
                suppress_unchecked: false,
                type_parameters: class.type_parameters.clone(),
                parameters: tokens.clone(),
                varargs,
                return_type: self.stream_of(wrap_result(result_type, wrapper_name)),
                body,
            });
        }
    }

    /// `wrap<Parser>`: resolves the caller's type before constructing.
    fn wrap_helper(&self, class: &ClassDecl, signature: &ConstructorSignature) -> SynthesizedMethod {
        let runtime = self.runtime();
        let raw = signature.raw_parameters();
        let witness = raw[0].name.clone();

        let mut taken: Vec<String> = raw.iter().map(|p| p.name.clone()).collect();
        let actual_type = fresh_local(ACTUAL_TYPE, &taken);
        taken.push(actual_type.clone());
        let parser_local = fresh_local(PARSER_LOCAL, &taken);

        let mut parser_args = vec![Expr::name(&actual_type)];
        parser_args.extend(raw[1..].iter().map(|p| Expr::name(&p.name)));

        let body = vec![
            Stmt::Local {
                ty: TypeName::type_descriptor(),
                name: actual_type.clone(),
                value: Expr::StaticCall {
                    owner: runtime.type_resolver.raw(),
                    name: "getActualType".to_string(),
                    args: vec![Expr::name(&witness)],
                },
            },
            Stmt::If {
                cond: Expr::eq(Expr::name(&actual_type), Expr::Null),
                then: Box::new(Stmt::Assign {
                    name: actual_type.clone(),
                    value: Expr::name(&witness),
                }),
            },
            Stmt::Local {
                ty: class.as_type(),
                name: parser_local.clone(),
                value: Expr::New {
                    ty: class.as_type(),
                    diamond: false,
                    args: parser_args,
                },
            },
            Stmt::Return(Expr::Conditional {
                cond: Box::new(Expr::eq(Expr::name(&actual_type), Expr::name(&witness))),
                then: Box::new(Expr::name(&parser_local)),
                otherwise: Box::new(Expr::New {
                    ty: runtime.bridge_parser.raw(),
                    diamond: false,
                    args: vec![Expr::name(&parser_local)],
                }),
            }),
        ];

        let parser_of = class
            .type_parameters
            .iter()
            .map(TypeVariable::as_type)
            .collect();

        SynthesizedMethod {
            name: helper_name(class),
            role: MethodRole::WrapHelper,
            is_static: true,
            suppress_unchecked: true,
            type_parameters: class.type_parameters.clone(),
            varargs: is_varargs(signature, &raw),
            parameters: raw,
            return_type: with_args(&runtime.parser_interface, parser_of),
            body,
        }
    }

    /// Annotation wrappers with the list type prepended unless already listed.
    fn wrapper_types(&self, entry: &ParserEntry) -> Vec<TypeName> {
        let list = self.runtime().list_type.raw();
        let mut wrappers: Vec<TypeName> = entry.wrappers.iter().map(TypeName::raw).collect();
        if !wrappers.contains(&list) {
            wrappers.insert(0, list);
        }
        wrappers
    }

    fn stream_of(&self, ty: TypeName) -> TypeName {
        with_args(&self.runtime().stream_type, vec![ty])
    }
}

/// Name of the static helper for `class`.
pub fn helper_name(class: &ClassDecl) -> String {
    format!("wrap{}", class.simple_name())
}

fn with_args(ty: &TypeName, args: Vec<TypeName>) -> TypeName {
    match ty.class_name() {
        Some(name) => TypeName::parameterized(name, args),
        None => ty.clone(),
    }
}

/// A method is varargs only when the constructor is and its own last
/// parameter is still an array.
fn is_varargs(signature: &ConstructorSignature, parameters: &[Parameter]) -> bool {
    signature.varargs && parameters.last().is_some_and(|p| p.ty.is_array())
}

/// `W<R>`, or `R<W<A>, W<B>>` when the result is itself parameterized.
fn wrap_result(result: &TypeName, wrapper: &str) -> TypeName {
    match result {
        TypeName::Class { name, args } if !args.is_empty() => TypeName::parameterized(
            name.clone(),
            args.iter()
                .map(|a| TypeName::parameterized(wrapper, vec![a.clone()]))
                .collect(),
        ),
        other => TypeName::parameterized(wrapper, vec![other.clone()]),
    }
}

/// Arguments passing class tokens back to the `Type`-typed base method.
fn token_forwarding_args(
    signature: &ConstructorSignature,
    type_parameters: &[TypeVariable],
) -> Vec<Expr> {
    signature
        .parameters
        .iter()
        .map(|param| match param.kind {
            ParamKind::TypeWitness { .. } => Expr::Cast {
                ty: TypeName::type_descriptor(),
                expr: Box::new(Expr::name(&param.name)),
            },
            ParamKind::TypeWitnessArray => Expr::NewArray {
                element: TypeName::type_descriptor(),
                items: type_parameters
                    .iter()
                    .map(|tv| Expr::name(array_witness_name(tv)))
                    .collect(),
            },
            ParamKind::PassThrough => Expr::name(&param.name),
        })
        .collect()
}

/// `base`, or `base` followed by as many `_` as it takes to avoid `taken`.
fn fresh_local(base: &str, taken: &[String]) -> String {
    let mut name = base.to_string();
    while taken.contains(&name) {
        name.push('_');
    }
    name
}

/// Locals declaring `Type <token><Suffix> = Factory.get(W.class, <token>)`
/// for each class token, plus the arguments that forward them.
fn wrapper_forwarding(
    signature: &ConstructorSignature,
    type_parameters: &[TypeVariable],
    wrapper: &TypeName,
    factory: &TypeName,
    suffix: &str,
) -> (Vec<Stmt>, Vec<Expr>) {
    let mut taken: Vec<String> = signature
        .class_token_parameters(type_parameters)
        .into_iter()
        .map(|p| p.name)
        .collect();
    let mut locals = Vec::new();
    let mut wrap = |token: String| {
        let local = fresh_local(&format!("{token}{suffix}"), &taken);
        taken.push(local.clone());
        locals.push(Stmt::Local {
            ty: TypeName::type_descriptor(),
            name: local.clone(),
            value: Expr::StaticCall {
                owner: factory.raw(),
                name: "get".to_string(),
                args: vec![Expr::ClassLiteral(wrapper.clone()), Expr::name(token)],
            },
        });
        Expr::name(local)
    };

    let args = signature
        .parameters
        .iter()
        .map(|param| match param.kind {
            ParamKind::TypeWitness { .. } => wrap(param.name.clone()),
            ParamKind::TypeWitnessArray => Expr::NewArray {
                element: TypeName::type_descriptor(),
                items: type_parameters
                    .iter()
                    .map(|tv| wrap(array_witness_name(tv)))
                    .collect(),
            },
            ParamKind::PassThrough => Expr::name(&param.name),
        })
        .collect();
    (locals, args)
}
