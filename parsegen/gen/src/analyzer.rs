//! Constructor classification.
//!
//! Each public constructor of a registered parser is classified once into a
//! [`ConstructorSignature`]: which parameters carry type witnesses (runtime
//! stand-ins for erased generic arguments) and which are passed through to
//! the parser unchanged. Synthesis then matches on [`ParamKind`] instead of
//! re-inspecting parameter types.

use parsegen_define::{ClassDecl, ConstructorDecl, ParamDecl, TypeName, TypeVariable};

use crate::ir::Parameter;

/// Role of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A single `Type` standing in for the class type parameter at `index`.
    TypeWitness { index: usize },
    /// A `Type[]` standing in for every class type parameter at once.
    TypeWitnessArray,
    /// An ordinary argument, forwarded as declared.
    PassThrough,
}

/// A classified constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedParam {
    pub name: String,
    pub ty: TypeName,
    pub kind: ParamKind,
}

impl AnalyzedParam {
    pub fn is_witness(&self) -> bool {
        !matches!(self.kind, ParamKind::PassThrough)
    }

    /// The parameter exactly as the constructor declares it.
    pub fn raw(&self) -> Parameter {
        Parameter::new(self.name.clone(), self.ty.clone())
    }
}

/// A constructor that can back generated methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    pub parameters: Vec<AnalyzedParam>,
    pub varargs: bool,
}

impl ConstructorSignature {
    /// Declared parameters, unchanged.
    pub fn raw_parameters(&self) -> Vec<Parameter> {
        self.parameters.iter().map(AnalyzedParam::raw).collect()
    }

    /// Parameters with witnesses rendered as `Class<T>` tokens.
    ///
    /// A `Type` witness keeps its name and becomes `Class<T_i>`. A `Type[]`
    /// witness expands into one `Class<T_i>` per class type parameter, named
    /// after the lowercased variable (`tType`, `kType`, ...). Pass-through
    /// parameters are unchanged.
    pub fn class_token_parameters(&self, type_parameters: &[TypeVariable]) -> Vec<Parameter> {
        let mut out = Vec::new();
        for param in &self.parameters {
            match param.kind {
                ParamKind::TypeWitness { index } => {
                    let token = TypeName::class_token(type_parameters[index].as_type());
                    out.push(Parameter::new(param.name.clone(), token));
                }
                ParamKind::TypeWitnessArray => {
                    for tv in type_parameters {
                        out.push(Parameter::new(
                            array_witness_name(tv),
                            TypeName::class_token(tv.as_type()),
                        ));
                    }
                }
                ParamKind::PassThrough => out.push(param.raw()),
            }
        }
        out
    }

    /// Returns `true` if the first parameter is a single `Type` witness.
    pub fn leads_with_single_witness(&self) -> bool {
        self.parameters
            .first()
            .is_some_and(|p| matches!(p.kind, ParamKind::TypeWitness { .. }))
    }
}

/// Name given to the class token that replaces one slot of a `Type[]` witness.
pub fn array_witness_name(tv: &TypeVariable) -> String {
    format!("{}Type", tv.name.to_lowercase())
}

/// Counts the leading witness parameters a constructor offers for `arity`
/// type parameters, or `None` if it cannot supply them.
///
/// A leading `Type[]` satisfies any non-zero arity on its own. Otherwise the
/// first `arity` parameters must each be `Type`.
pub fn leading_witnesses(parameters: &[ParamDecl], arity: usize) -> Option<usize> {
    if arity == 0 {
        return Some(0);
    }
    if parameters
        .first()
        .is_some_and(|p| p.ty.is_type_descriptor_array())
    {
        return Some(1);
    }
    if parameters.len() < arity {
        return None;
    }
    parameters[..arity]
        .iter()
        .all(|p| p.ty.is_type_descriptor())
        .then_some(arity)
}

/// Classifies a constructor of `class`, or returns `None` when it cannot
/// supply the class's type witnesses. Invalid constructors are simply
/// skipped by synthesis; a class may mix valid and invalid ones.
pub fn analyze(class: &ClassDecl, constructor: &ConstructorDecl) -> Option<ConstructorSignature> {
    let arity = class.generic_arity();
    let witnesses = leading_witnesses(&constructor.parameters, arity)?;

    let parameters = constructor
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let kind = if i >= witnesses {
                ParamKind::PassThrough
            } else if p.ty.is_type_descriptor_array() {
                ParamKind::TypeWitnessArray
            } else {
                ParamKind::TypeWitness { index: i }
            };
            AnalyzedParam {
                name: p.name.clone(),
                ty: p.ty.clone(),
                kind,
            }
        })
        .collect();

    Some(ConstructorSignature {
        parameters,
        varargs: constructor.varargs,
    })
}
