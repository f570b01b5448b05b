//! Generator configuration.
//!
//! Configuration is read from a TOML file where every field is optional. The
//! defaults target the RxHttp runtime, so an empty file (or no file at all)
//! produces the conventional `RxHttpParsers` unit.
//!
//! ```toml
//! reactive_streams = true
//! duplicate_aliases = "reject"
//!
//! [output]
//! package = "rxhttp.wrapper.param"
//! class_name = "RxHttpParsers"
//!
//! [runtime]
//! stream_type = "rxhttp.wrapper.param.ObservableCall"
//! ```

use std::fs;
use std::path::Path;

use parsegen_define::TypeName;
use serde::{Deserialize, Serialize};

use crate::errors::GeneratorError;

/// What to do when two parsers declare the same alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateAliasPolicy {
    /// Keep the first registration and report the later one.
    #[default]
    Reject,
    /// Replace the earlier registration, keeping its position.
    LastWriteWins,
}

/// Where and how the generated unit is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Java package of the generated class.
    pub package: String,
    /// Simple name of the generated class.
    pub class_name: String,
    /// Class the generated methods are mixed into; must provide `toObservable(Parser)`.
    pub superclass: TypeName,
    /// File stem of the declarative JSON output.
    pub declarative_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            package: "rxhttp.wrapper.param".to_string(),
            class_name: "RxHttpParsers".to_string(),
            superclass: TypeName::class("rxhttp.wrapper.param.BaseRxHttp"),
            declarative_stem: "parsers".to_string(),
        }
    }
}

/// Fully qualified names of the runtime collaborators the generated code calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Stream type returned by every `toObservable*` method.
    pub stream_type: TypeName,
    /// The generic parser interface; returned by `wrap*` helpers.
    pub parser_interface: TypeName,
    /// Supertypes that mark a class as a parser.
    pub parser_capabilities: Vec<String>,
    /// Parameter type of the parse method.
    pub response_type: TypeName,
    /// Name of the single-argument parse method.
    pub parse_method: String,
    /// Qualified name of the parser annotation, for the source scanner.
    pub annotation: String,
    /// Class whose static `getActualType(Type)` resolves nested generic signatures.
    pub type_resolver: TypeName,
    /// Decorator that re-applies an outer container shape to a parsed value.
    pub bridge_parser: TypeName,
    /// Class whose static `get(Class, Type...)` builds runtime parameterized types.
    pub parameterized_type: TypeName,
    /// Implicit first wrapper type.
    pub list_type: TypeName,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stream_type: TypeName::class("rxhttp.wrapper.param.ObservableCall"),
            parser_interface: TypeName::class("rxhttp.wrapper.parse.Parser"),
            parser_capabilities: vec![
                "rxhttp.wrapper.parse.Parser".to_string(),
                "rxhttp.wrapper.parse.TypeParser".to_string(),
                "rxhttp.wrapper.parse.AbstractParser".to_string(),
                "rxhttp.wrapper.parse.SimpleParser".to_string(),
            ],
            response_type: TypeName::class("okhttp3.Response"),
            parse_method: "onParse".to_string(),
            annotation: "rxhttp.wrapper.annotation.Parser".to_string(),
            type_resolver: TypeName::class("rxhttp.wrapper.utils.TypeUtil"),
            bridge_parser: TypeName::class("rxhttp.wrapper.parse.OkResponseParser"),
            parameterized_type: TypeName::class("rxhttp.wrapper.entity.ParameterizedTypeImpl"),
            list_type: TypeName::class("java.util.List"),
        }
    }
}

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Whether the reactive-stream library is available to generated code.
    ///
    /// When `false`, no stream-returning method is generated at all.
    pub reactive_streams: bool,
    pub duplicate_aliases: DuplicateAliasPolicy,
    pub output: OutputConfig,
    pub runtime: RuntimeConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reactive_streams: true,
            duplicate_aliases: DuplicateAliasPolicy::default(),
            output: OutputConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Reads configuration from a TOML file.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`GeneratorConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let text = fs::read_to_string(path).map_err(|source| GeneratorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses configuration from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` for malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self, GeneratorError> {
        let config: GeneratorConfig =
            toml::from_str(text).map_err(|e| GeneratorError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that names used in generated source are valid Java identifiers.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` naming the offending field.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !self.output.package.is_empty()
            && !self.output.package.split('.').all(is_java_identifier)
        {
            return Err(GeneratorError::ConfigError(format!(
                "output.package '{}' is not a valid Java package name",
                self.output.package
            )));
        }
        if !is_java_identifier(&self.output.class_name) {
            return Err(GeneratorError::ConfigError(format!(
                "output.class_name '{}' is not a valid Java identifier",
                self.output.class_name
            )));
        }
        if !is_java_identifier(&self.runtime.parse_method) {
            return Err(GeneratorError::ConfigError(format!(
                "runtime.parse_method '{}' is not a valid Java identifier",
                self.runtime.parse_method
            )));
        }
        if self.output.declarative_stem.trim().is_empty() {
            return Err(GeneratorError::ConfigError(
                "output.declarative_stem cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns `true` if `s` is usable as a Java identifier.
pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(config.reactive_streams);
        assert_eq!(config.duplicate_aliases, DuplicateAliasPolicy::Reject);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
reactive_streams = false
duplicate_aliases = "last-write-wins"

[output]
class_name = "Parsers"

[runtime]
stream_type = "io.reactivex.rxjava3.core.Observable"
"#,
        )
        .unwrap();

        assert!(!config.reactive_streams);
        assert_eq!(config.duplicate_aliases, DuplicateAliasPolicy::LastWriteWins);
        assert_eq!(config.output.class_name, "Parsers");
        assert_eq!(config.output.package, "rxhttp.wrapper.param");
        assert_eq!(
            config.runtime.stream_type,
            TypeName::class("io.reactivex.rxjava3.core.Observable")
        );
        assert_eq!(config.runtime.parse_method, "onParse");
    }

    #[test]
    fn invalid_class_name_is_rejected() {
        let result = GeneratorConfig::from_toml_str("[output]\nclass_name = \"Rx-Parsers\"\n");
        match result {
            Err(GeneratorError::ConfigError(msg)) => assert!(msg.contains("class_name")),
            other => panic!("Expected ConfigError, got: {:?}", other),
        }
    }

    #[test]
    fn invalid_package_is_rejected() {
        let result = GeneratorConfig::from_toml_str("[output]\npackage = \"com..example\"\n");
        assert!(matches!(result, Err(GeneratorError::ConfigError(_))));
    }

    #[test]
    fn default_package_is_allowed() {
        let config = GeneratorConfig::from_toml_str("[output]\npackage = \"\"\n").unwrap();
        assert!(config.output.package.is_empty());
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let result = GeneratorConfig::from_toml_str("duplicate_aliases = \"first-wins\"\n");
        assert!(matches!(result, Err(GeneratorError::ConfigError(_))));
    }

    #[test]
    fn java_identifier_rules() {
        assert!(is_java_identifier("toObservable"));
        assert!(is_java_identifier("$x_1"));
        assert!(!is_java_identifier("1abc"));
        assert!(!is_java_identifier(""));
        assert!(!is_java_identifier("a-b"));
    }
}
