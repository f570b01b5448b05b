//! The generation pass: register, synthesize, check.
//!
//! ## Examples
//!
//! ```
//! use parsegen_define::prelude::*;
//! use parsegen_gen::config::GeneratorConfig;
//! use parsegen_gen::pipeline::generate;
//!
//! let mut class = ClassDecl::new("com.example.StringParser");
//! class.supertypes = vec![TypeName::parse("rxhttp.wrapper.parse.Parser<String>").unwrap()];
//! class.methods = vec![MethodDecl {
//!     name: "onParse".to_string(),
//!     visibility: Visibility::Public,
//!     is_static: false,
//!     parameters: vec![ParamDecl::new("response", TypeName::class("okhttp3.Response"))],
//!     return_type: TypeName::class("String"),
//! }];
//! class.parser = Some(ParserAnnotation::new("Str"));
//! class.normalize();
//!
//! let generation = generate(vec![class], &GeneratorConfig::default()).unwrap();
//! assert!(generation.diagnostics.is_empty());
//! assert_eq!(generation.unit.method_names(), vec!["toObservableStr"]);
//! ```

use std::collections::HashMap;

use parsegen_define::ClassDecl;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::ir::{GeneratedUnit, ParserMethods};
use crate::registry::{Diagnostic, ParserRegistry};
use crate::synth::Synthesizer;

/// Result of a generation pass.
#[derive(Debug, Clone)]
pub struct Generation {
    pub unit: GeneratedUnit,
    /// Rejected declarations. The unit still holds every accepted parser.
    pub diagnostics: Vec<Diagnostic>,
}

impl Generation {
    /// Returns `true` when no declaration was rejected.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs registration and synthesis over `classes`.
///
/// Declarations are registered in the given order; methods are emitted in
/// registration order, then constructor order, then wrapper order. Parsers
/// that yield no methods are left out of the unit.
///
/// ## Errors
///
/// Returns `GeneratorError::SignatureCollision` if two methods share an
/// erased signature.
pub fn generate(
    classes: Vec<ClassDecl>,
    config: &GeneratorConfig,
) -> Result<Generation, GeneratorError> {
    let mut registry = ParserRegistry::new(config);
    let diagnostics = registry.register_all(classes);

    let synthesizer = Synthesizer::new(config);
    let parsers: Vec<ParserMethods> = registry
        .entries()
        .iter()
        .map(|entry| ParserMethods {
            alias: entry.alias.clone(),
            class: entry.class.name.clone(),
            methods: synthesizer.synthesize(entry),
        })
        .filter(|group| !group.methods.is_empty())
        .collect();

    let unit = GeneratedUnit {
        package: config.output.package.clone(),
        class_name: config.output.class_name.clone(),
        superclass: config.output.superclass.clone(),
        parsers,
    };
    check_collisions(&unit)?;

    info!(
        parsers = registry.len(),
        methods = unit.methods().count(),
        rejected = diagnostics.len(),
        "Synthesized parser methods"
    );
    Ok(Generation { unit, diagnostics })
}

/// Fails on the first pair of methods with equal erased signatures.
///
/// ## Errors
///
/// Returns `GeneratorError::SignatureCollision` naming both owning classes.
pub fn check_collisions(unit: &GeneratedUnit) -> Result<(), GeneratorError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for group in &unit.parsers {
        for method in &group.methods {
            let signature = method.signature();
            if let Some(first) = seen.get(&signature) {
                return Err(GeneratorError::SignatureCollision {
                    signature,
                    first: first.to_string(),
                    second: group.class.clone(),
                });
            }
            seen.insert(signature, &group.class);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_parser, simple_parser, single_type_parser, type_array, type_param};
    use parsegen_define::ConstructorDecl;

    #[test]
    fn groups_follow_registration_order() {
        let generation = generate(
            vec![
                simple_parser("com.example.StringParser", "Str"),
                single_type_parser("com.example.ResponseParser", "Response"),
            ],
            &GeneratorConfig::default(),
        )
        .unwrap();

        let aliases: Vec<_> = generation.unit.parsers.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(aliases, vec!["Str", "Response"]);
        assert!(generation.is_clean());
    }

    #[test]
    fn rejected_parsers_leave_others_generated() {
        let mut hidden = simple_parser("com.example.Hidden", "Hidden");
        hidden.is_abstract = true;

        let generation = generate(
            vec![hidden, simple_parser("com.example.StringParser", "Str")],
            &GeneratorConfig::default(),
        )
        .unwrap();

        assert_eq!(generation.diagnostics.len(), 1);
        assert_eq!(generation.unit.method_names(), vec!["toObservableStr"]);
    }

    #[test]
    fn parsers_without_methods_are_omitted() {
        let mut class = simple_parser("com.example.Helper", "Helper");
        class.methods.clear();

        let generation = generate(vec![class], &GeneratorConfig::default()).unwrap();
        assert!(generation.unit.parsers.is_empty());
    }

    #[test]
    fn single_and_array_constructors_collide() {
        let class = make_parser(
            "com.example.ResponseParser",
            "Response",
            &["T"],
            vec![
                ConstructorDecl::public(vec![type_param("type")]),
                ConstructorDecl::public(vec![type_array("types")]),
            ],
            "T",
        );

        match generate(vec![class], &GeneratorConfig::default()) {
            Err(GeneratorError::SignatureCollision {
                signature,
                first,
                second,
            }) => {
                assert_eq!(signature, "toObservableResponse(java.lang.Class)");
                assert_eq!(first, "com.example.ResponseParser");
                assert_eq!(second, "com.example.ResponseParser");
            }
            other => panic!("Expected SignatureCollision, got: {:?}", other),
        }
    }

    #[test]
    fn alias_suffix_clash_across_parsers_is_detected() {
        let generation = generate(
            vec![
                single_type_parser("com.example.ResponseParser", "Response"),
                single_type_parser("com.example.ResponseListParser", "ResponseList"),
            ],
            &GeneratorConfig::default(),
        );

        match generation {
            Err(GeneratorError::SignatureCollision { first, second, .. }) => {
                assert_eq!(first, "com.example.ResponseParser");
                assert_eq!(second, "com.example.ResponseListParser");
            }
            other => panic!("Expected SignatureCollision, got: {:?}", other),
        }
    }
}
