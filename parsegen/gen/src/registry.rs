//! Parser registration and validation.
//!
//! The registry is populated once per generation pass. Every annotated class
//! is validated in a fixed order and either stored under its alias or
//! reported as a [`Diagnostic`]. A rejection never stops the remaining
//! classes from registering, so one run reports every problem at once.
//!
//! ## Validation Order
//!
//! 1. The class must be public
//! 2. The class must not be abstract
//! 3. The alias must not be blank
//! 4. A generic class must have a public constructor taking one `Type` per
//!    type parameter (or a leading `Type[]`)
//! 5. The class must implement one of the configured parser capabilities
//!
//! Duplicate aliases are then handled according to
//! [`DuplicateAliasPolicy`].

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use parsegen_define::types::{TYPE, simple_name_of};
use parsegen_define::{ClassDecl, SourceLocation, TypeName};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyzer::leading_witnesses;
use crate::config::{DuplicateAliasPolicy, GeneratorConfig};

/// Why a parser declaration was not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("The class '{class}' must be public")]
    NotPublic { class: String },

    #[error("The class '{class}' is abstract. You can't annotate abstract classes with @{annotation}")]
    AbstractClass { class: String, annotation: String },

    #[error("The name in @{annotation} for class '{class}' is blank; a non-empty alias is required")]
    MissingAlias { class: String, annotation: String },

    /// `required` spells out the constructor to add, e.g.
    /// `public ResponseParser(java.lang.reflect.Type)`.
    #[error("The class '{class}' must declare a '{required}' constructor")]
    MissingTypeConstructor { class: String, required: String },

    #[error("The class '{class}' annotated with @{annotation} must inherit from {capability}")]
    NotAParser {
        class: String,
        annotation: String,
        capability: String,
    },

    #[error("The alias '{alias}' of class '{class}' is already used by '{previous}'")]
    DuplicateAlias {
        alias: String,
        class: String,
        previous: String,
    },
}

/// A rejection pinned to the declaration that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Qualified name of the rejected class.
    pub class: String,
    pub location: Option<SourceLocation>,
    pub rejection: Rejection,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.rejection)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {location}")?;
        }
        Ok(())
    }
}

/// Supertype graph over every scanned class.
///
/// Only the names are tracked; type arguments play no part in the
/// capability check.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    supertypes: HashMap<String, Vec<String>>,
}

impl ClassHierarchy {
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a ClassDecl>) -> Self {
        let supertypes = classes
            .into_iter()
            .map(|class| {
                let names = class
                    .supertypes
                    .iter()
                    .filter_map(|ty| ty.class_name().map(str::to_string))
                    .collect();
                (class.name.clone(), names)
            })
            .collect();
        Self { supertypes }
    }

    /// Returns `true` if `class` reaches any of `targets` through its
    /// supertypes. Classes outside the scanned set end the walk; only their
    /// own name can match.
    pub fn inherits_any(&self, class: &ClassDecl, targets: &[String]) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = class
            .supertypes
            .iter()
            .filter_map(TypeName::class_name)
            .collect();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            if targets.iter().any(|t| t == name) {
                return true;
            }
            if let Some(parents) = self.supertypes.get(name) {
                queue.extend(parents.iter().map(String::as_str));
            }
        }
        false
    }
}

/// A successfully registered parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserEntry {
    pub alias: String,
    pub class: ClassDecl,
    /// Wrapper types from the annotation; empty when the attribute is absent.
    pub wrappers: Vec<TypeName>,
}

/// Alias-keyed table of validated parsers, kept in registration order.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    entries: Vec<ParserEntry>,
    index: HashMap<String, usize>,
    policy: DuplicateAliasPolicy,
    annotation: String,
    capabilities: Vec<String>,
}

impl ParserRegistry {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy: config.duplicate_aliases,
            annotation: simple_name_of(&config.runtime.annotation).to_string(),
            capabilities: config.runtime.parser_capabilities.clone(),
        }
    }

    /// Validates and stores one annotated class.
    ///
    /// ## Errors
    ///
    /// Returns the first failed check in validation order, or
    /// `Rejection::DuplicateAlias` when the alias is taken and the policy
    /// is [`DuplicateAliasPolicy::Reject`].
    pub fn register(
        &mut self,
        class: ClassDecl,
        hierarchy: &ClassHierarchy,
    ) -> Result<(), Rejection> {
        let alias = self.validate(&class, hierarchy)?;
        let wrappers = class
            .parser
            .as_ref()
            .map(|a| a.wrappers().to_vec())
            .unwrap_or_default();
        let entry = ParserEntry {
            alias: alias.clone(),
            class,
            wrappers,
        };

        match self.index.get(&alias) {
            Some(&position) => match self.policy {
                DuplicateAliasPolicy::Reject => Err(Rejection::DuplicateAlias {
                    alias,
                    class: entry.class.name,
                    previous: self.entries[position].class.name.clone(),
                }),
                DuplicateAliasPolicy::LastWriteWins => {
                    warn!(
                        alias = %alias,
                        previous = %self.entries[position].class.name,
                        replacement = %entry.class.name,
                        "Alias registered twice; keeping the later parser"
                    );
                    self.entries[position] = entry;
                    Ok(())
                }
            },
            None => {
                debug!(alias = %alias, class = %entry.class.name, "Registered parser");
                self.index.insert(alias, self.entries.len());
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    /// Registers every annotated class in `classes`, in order.
    ///
    /// Classes without the parser annotation only contribute to the
    /// supertype graph. Returns one diagnostic per rejected class.
    pub fn register_all(&mut self, classes: Vec<ClassDecl>) -> Vec<Diagnostic> {
        let hierarchy = ClassHierarchy::from_classes(&classes);
        let mut diagnostics = Vec::new();

        for class in classes.into_iter().filter(|c| c.parser.is_some()) {
            let name = class.name.clone();
            let location = class.location.clone();
            if let Err(rejection) = self.register(class, &hierarchy) {
                debug!(class = %name, "Rejected parser: {rejection}");
                diagnostics.push(Diagnostic {
                    class: name,
                    location,
                    rejection,
                });
            }
        }
        diagnostics
    }

    /// Runs the checks in order and returns the trimmed alias.
    fn validate(&self, class: &ClassDecl, hierarchy: &ClassHierarchy) -> Result<String, Rejection> {
        if !class.is_public() {
            return Err(Rejection::NotPublic {
                class: class.name.clone(),
            });
        }
        if class.is_abstract {
            return Err(Rejection::AbstractClass {
                class: class.name.clone(),
                annotation: self.annotation.clone(),
            });
        }
        let alias = class
            .parser
            .as_ref()
            .map(|a| a.name.trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Rejection::MissingAlias {
                class: class.name.clone(),
                annotation: self.annotation.clone(),
            })?
            .to_string();

        let arity = class.generic_arity();
        if arity > 0 {
            let has_witness_constructor = class
                .public_constructors()
                .iter()
                .any(|c| {
                    !c.parameters.is_empty() && leading_witnesses(&c.parameters, arity).is_some()
                });
            if !has_witness_constructor {
                return Err(Rejection::MissingTypeConstructor {
                    class: class.name.clone(),
                    required: required_constructor(class),
                });
            }
        }

        if !hierarchy.inherits_any(class, &self.capabilities) {
            let capability = self
                .capabilities
                .first()
                .cloned()
                .unwrap_or_else(|| "a parser type".to_string());
            return Err(Rejection::NotAParser {
                class: class.name.clone(),
                annotation: self.annotation.clone(),
                capability,
            });
        }
        Ok(alias)
    }

    /// Registered parsers in registration order.
    pub fn entries(&self) -> &[ParserEntry] {
        &self.entries
    }

    pub fn get(&self, alias: &str) -> Option<&ParserEntry> {
        self.index.get(alias).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The constructor a generic class needs, written as Java source.
fn required_constructor(class: &ClassDecl) -> String {
    let params = vec![TYPE; class.generic_arity()].join(", ");
    format!("public {}({})", class.simple_name(), params)
}
