//! Manifest files describing parser classes.
//!
//! A manifest is the hand-written alternative to scanning Java sources. It
//! lists class declarations in TOML, JSON or YAML; the format is chosen by
//! file extension.
//!
//! ```toml
//! [[classes]]
//! name = "com.example.parser.ResponseParser"
//! type_parameters = [{ name = "T" }]
//! supertypes = ["rxhttp.wrapper.parse.TypeParser<T>"]
//! parser = { name = "Response", wrappers = ["com.example.entity.PageList"] }
//!
//! [[classes.constructors]]
//! parameters = [{ name = "type", type = "java.lang.reflect.Type" }]
//!
//! [[classes.methods]]
//! name = "onParse"
//! parameters = [{ name = "response", type = "okhttp3.Response" }]
//! return_type = "T"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::declaration::{ClassDecl, SourceLocation};
use crate::error::DefineError;

/// The deserialized contents of one manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserManifest {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

impl ParserManifest {
    /// Reads and normalizes a manifest from disk.
    ///
    /// Classes without an explicit `location` are pinned to the manifest file.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown
    /// extension, or does not deserialize.
    pub fn load(path: &Path) -> Result<Self, DefineError> {
        let text = fs::read_to_string(path).map_err(|source| DefineError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse_error = |reason: String| DefineError::ManifestParse {
            path: path.to_path_buf(),
            reason,
        };

        let mut manifest: ParserManifest = match extension.as_deref() {
            Some("toml") => toml::from_str(&text).map_err(|e| parse_error(e.to_string()))?,
            Some("json") => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?,
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
            }
            _ => {
                return Err(DefineError::UnsupportedManifest {
                    path: path.to_path_buf(),
                });
            }
        };

        for class in &mut manifest.classes {
            class.normalize();
            if class.location.is_none() {
                class.location = Some(SourceLocation::file(path));
            }
        }
        Ok(manifest)
    }
}
