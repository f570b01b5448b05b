//! Intermediate representation of generated methods.
//!
//! Synthesis produces these structures and the emission backends render
//! them. Keeping the body as a small expression tree (rather than text)
//! lets synthesis be tested structurally and lets every backend agree on
//! exactly which types a method mentions.

use parsegen_define::{TypeName, TypeVariable};
use serde::Serialize;

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Why a method was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodRole {
    /// Static `wrap<Parser>` helper that recovers nested generic types.
    WrapHelper,
    /// `toObservable<Alias>` taking the constructor's raw parameters.
    Base,
    /// `toObservable<Alias>` taking `Class<T>` tokens instead of `Type`.
    ClassToken,
    /// `toObservable<Alias><Wrapper>` nesting the result in a container.
    Wrapper { wrapper: TypeName },
}

/// An expression in a generated method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name(String),
    Null,
    /// `X.class`
    ClassLiteral(TypeName),
    /// `(T) expr`
    Cast { ty: TypeName, expr: Box<Expr> },
    /// Unqualified call on `this`.
    Call { name: String, args: Vec<Expr> },
    /// `Owner.name(args)`
    StaticCall {
        owner: TypeName,
        name: String,
        args: Vec<Expr>,
    },
    /// `new X(args)`, or `new X<>(args)` when `diamond` is set.
    New {
        ty: TypeName,
        diamond: bool,
        args: Vec<Expr>,
    },
    /// `new T[]{items}`
    NewArray { element: TypeName, items: Vec<Expr> },
    /// `cond ? then : otherwise`
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `left == right`
    Eq(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::Eq(Box::new(left), Box::new(right))
    }

    /// Visits every type mentioned by this expression.
    pub fn for_each_type<'a>(&'a self, f: &mut impl FnMut(&'a TypeName)) {
        match self {
            Self::Name(_) | Self::Null => {}
            Self::ClassLiteral(ty) => f(ty),
            Self::Cast { ty, expr } => {
                f(ty);
                expr.for_each_type(f);
            }
            Self::Call { args, .. } => args.iter().for_each(|a| a.for_each_type(f)),
            Self::StaticCall { owner, args, .. } => {
                f(owner);
                args.iter().for_each(|a| a.for_each_type(f));
            }
            Self::New { ty, args, .. } => {
                f(ty);
                args.iter().for_each(|a| a.for_each_type(f));
            }
            Self::NewArray { element, items } => {
                f(element);
                items.iter().for_each(|i| i.for_each_type(f));
            }
            Self::Conditional {
                cond,
                then,
                otherwise,
            } => {
                cond.for_each_type(f);
                then.for_each_type(f);
                otherwise.for_each_type(f);
            }
            Self::Eq(left, right) => {
                left.for_each_type(f);
                right.for_each_type(f);
            }
        }
    }
}

/// A statement in a generated method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `Type name = value;`
    Local {
        ty: TypeName,
        name: String,
        value: Expr,
    },
    /// `if (cond) <then>` with a single-statement branch.
    If { cond: Expr, then: Box<Stmt> },
    /// `name = value;`
    Assign { name: String, value: Expr },
    Return(Expr),
}

impl Stmt {
    pub fn for_each_type<'a>(&'a self, f: &mut impl FnMut(&'a TypeName)) {
        match self {
            Self::Local { ty, value, .. } => {
                f(ty);
                value.for_each_type(f);
            }
            Self::If { cond, then } => {
                cond.for_each_type(f);
                then.for_each_type(f);
            }
            Self::Assign { value, .. } | Self::Return(value) => value.for_each_type(f),
        }
    }
}

/// One generated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedMethod {
    pub name: String,
    pub role: MethodRole,
    pub is_static: bool,
    /// Emit `@SuppressWarnings("unchecked")`.
    pub suppress_unchecked: bool,
    pub type_parameters: Vec<TypeVariable>,
    pub parameters: Vec<Parameter>,
    /// The last parameter is rendered as `T...`.
    pub varargs: bool,
    pub return_type: TypeName,
    pub body: Vec<Stmt>,
}

impl SynthesizedMethod {
    /// The erased JVM-level signature, `name(java.lang.Class, int)`.
    ///
    /// Two methods with equal signatures cannot coexist in one class.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.ty.erasure(&self.type_parameters))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Visits every type mentioned in the method's declaration and body.
    pub fn for_each_type<'a>(&'a self, f: &mut impl FnMut(&'a TypeName)) {
        for tv in &self.type_parameters {
            tv.bounds.iter().for_each(&mut *f);
        }
        self.parameters.iter().for_each(|p| f(&p.ty));
        f(&self.return_type);
        for stmt in &self.body {
            stmt.for_each_type(f);
        }
    }
}

/// All methods generated for one registered parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserMethods {
    pub alias: String,
    /// Qualified name of the parser class.
    pub class: String,
    pub methods: Vec<SynthesizedMethod>,
}

/// The complete output of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package: String,
    pub class_name: String,
    pub superclass: TypeName,
    /// Groups in registration order.
    pub parsers: Vec<ParserMethods>,
}

impl GeneratedUnit {
    /// Every method in emission order.
    pub fn methods(&self) -> impl Iterator<Item = &SynthesizedMethod> {
        self.parsers.iter().flat_map(|p| p.methods.iter())
    }

    /// Names of every method in emission order, duplicates included.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods().map(|m| m.name.as_str()).collect()
    }
}
