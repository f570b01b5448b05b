//! Java source scanning.
//!
//! Builds [`ClassDecl`] records straight from `.java` files using
//! tree-sitter, so the generator never needs a compiler or reflection.
//! Every class and interface is recorded (nested ones as `Outer.Inner`);
//! only those carrying the configured parser annotation are registered, but
//! all of them feed the supertype graph.
//!
//! ## Name Resolution
//!
//! Simple type names are qualified in this order:
//!
//! 1. Type variables in scope stay as they are
//! 2. Types declared in the same file
//! 3. Single-type imports
//! 4. `java.lang`
//! 5. Wildcard imports, for names listed in [`KNOWN_TYPES`] or the runtime config
//! 6. The file's own package
//!
//! ## Examples
//!
//! ```
//! use std::path::Path;
//! use parsegen_gen::config::GeneratorConfig;
//! use parsegen_gen::scan::SourceScanner;
//!
//! let source = r#"
//! package com.example;
//!
//! import java.lang.reflect.Type;
//! import rxhttp.wrapper.annotation.Parser;
//! import rxhttp.wrapper.parse.TypeParser;
//!
//! @Parser(name = "Response")
//! public class ResponseParser<T> extends TypeParser<T> {
//!     public ResponseParser(Type type) { super(type); }
//! }
//! "#;
//!
//! let mut scanner = SourceScanner::new(&GeneratorConfig::default()).unwrap();
//! let classes = scanner.scan_source(Path::new("ResponseParser.java"), source).unwrap();
//! assert_eq!(classes[0].name, "com.example.ResponseParser");
//! assert_eq!(classes[0].parser.as_ref().unwrap().name, "Response");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use parsegen_define::types::JAVA_LANG;
use parsegen_define::{
    ClassDecl, ConstructorDecl, MethodDecl, ParamDecl, ParserAnnotation, SourceLocation, TypeName,
    TypeVariable, Visibility,
};
use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;

/// Types resolvable through wildcard imports without a classpath.
pub const KNOWN_TYPES: &[&str] = &[
    "java.lang.reflect.GenericArrayType",
    "java.lang.reflect.ParameterizedType",
    "java.lang.reflect.Type",
    "java.lang.reflect.TypeVariable",
    "java.lang.reflect.WildcardType",
    "java.util.ArrayList",
    "java.util.Collection",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.LinkedList",
    "java.util.List",
    "java.util.Map",
    "java.util.Optional",
    "java.util.Set",
];

const DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Lists `.java` files under `roots`, sorted.
///
/// Directories are walked with the standard ignore filters (hidden files,
/// `.gitignore`). A root that is itself a `.java` file is taken as is.
///
/// ## Errors
///
/// Returns `GeneratorError::Walk` if traversal fails.
pub fn collect_java_files(roots: &[PathBuf]) -> Result<Vec<PathBuf>, GeneratorError> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            if is_java(root) {
                files.push(root.clone());
            }
            continue;
        }
        for entry in WalkBuilder::new(root).standard_filters(true).build() {
            let entry = entry?;
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if is_file && is_java(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

/// Scans every `.java` file under `roots`.
///
/// ## Errors
///
/// Returns an error if a file cannot be read or contains syntax errors.
pub fn scan_sources(
    roots: &[PathBuf],
    config: &GeneratorConfig,
) -> Result<Vec<ClassDecl>, GeneratorError> {
    let mut scanner = SourceScanner::new(config)?;
    let mut classes = Vec::new();
    for file in collect_java_files(roots)? {
        classes.extend(scanner.scan_file(&file)?);
    }
    Ok(classes)
}

/// A reusable tree-sitter Java parser plus the names it must recognize.
pub struct SourceScanner {
    parser: Parser,
    annotation: String,
    known: Vec<String>,
}

impl SourceScanner {
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the Java grammar cannot be loaded.
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| GeneratorError::ConfigError(format!("Java grammar unavailable: {e}")))?;

        let runtime = &config.runtime;
        let mut known: Vec<String> = KNOWN_TYPES.iter().map(|s| s.to_string()).collect();
        known.push(runtime.annotation.clone());
        known.extend(runtime.parser_capabilities.iter().cloned());
        for ty in [&runtime.response_type, &runtime.list_type, &runtime.parser_interface] {
            if let Some(name) = ty.class_name() {
                known.push(name.to_string());
            }
        }

        Ok(Self {
            parser,
            annotation: runtime.annotation.clone(),
            known,
        })
    }

    /// ## Errors
    ///
    /// Returns `GeneratorError::Scan` if the file cannot be read or parsed.
    pub fn scan_file(&mut self, path: &Path) -> Result<Vec<ClassDecl>, GeneratorError> {
        let source = fs::read_to_string(path).map_err(|e| GeneratorError::Scan {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.scan_source(path, &source)
    }

    /// Scans Java source text; `path` is only used for locations and errors.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Scan` for syntax errors or type text that
    /// cannot be understood.
    pub fn scan_source(
        &mut self,
        path: &Path,
        source: &str,
    ) -> Result<Vec<ClassDecl>, GeneratorError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GeneratorError::Scan {
                path: path.to_path_buf(),
                reason: "tree-sitter returned no tree".to_string(),
            })?;
        let root = tree.root_node();
        if let Some(error) = first_error(root) {
            return Err(GeneratorError::Scan {
                path: path.to_path_buf(),
                reason: format!("syntax error at line {}", error.start_position().row + 1),
            });
        }

        let mut file = FileContext::new(path, source, &self.annotation, &self.known);
        for node in named_children(root) {
            match node.kind() {
                "package_declaration" => file.package = package_name(node, source),
                "import_declaration" => file.add_import(text(node, source)),
                _ => {}
            }
        }
        for node in named_children(root) {
            file.register_local(node, None);
        }

        let mut classes = Vec::new();
        for node in named_children(root) {
            if matches!(node.kind(), "class_declaration" | "interface_declaration") {
                file.class(node, None, false, &mut classes)?;
            }
        }
        debug!(path = %path.display(), classes = classes.len(), "Scanned Java source");
        Ok(classes)
    }
}

/// Per-file resolution state.
struct FileContext<'s> {
    path: &'s Path,
    source: &'s str,
    annotation: &'s str,
    known: &'s [String],
    package: String,
    imports: HashMap<String, String>,
    wildcards: Vec<String>,
    local: HashMap<String, String>,
}

#[derive(Default)]
struct Modifiers<'t> {
    visibility: Option<Visibility>,
    is_abstract: bool,
    is_static: bool,
    annotations: Vec<Node<'t>>,
}

impl<'s> FileContext<'s> {
    fn new(path: &'s Path, source: &'s str, annotation: &'s str, known: &'s [String]) -> Self {
        Self {
            path,
            source,
            annotation,
            known,
            package: String::new(),
            imports: HashMap::new(),
            wildcards: Vec::new(),
            local: HashMap::new(),
        }
    }

    fn error(&self, node: Node<'_>, reason: impl std::fmt::Display) -> GeneratorError {
        GeneratorError::Scan {
            path: self.path.to_path_buf(),
            reason: format!("line {}: {reason}", node.start_position().row + 1),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        text(node, self.source)
    }

    fn add_import(&mut self, statement: &str) {
        let body = statement.trim().trim_start_matches("import").trim_end_matches(';');
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        if body.starts_with("static") {
            return;
        }
        match body.strip_suffix(".*") {
            Some(package) => self.wildcards.push(package.to_string()),
            None => {
                let simple = body.rsplit('.').next().unwrap_or(&body).to_string();
                self.imports.insert(simple, body);
            }
        }
    }

    /// Records every type declared in this file, nested ones included.
    fn register_local(&mut self, node: Node<'_>, outer: Option<(&str, &str)>) {
        if !DECLARATION_KINDS.contains(&node.kind()) {
            return;
        }
        let Some(name) = node.child_by_field_name("name").map(|n| self.text(n)) else {
            return;
        };
        let (qualified, relative) = match outer {
            Some((outer_qualified, outer_relative)) => (
                format!("{outer_qualified}.{name}"),
                format!("{outer_relative}.{name}"),
            ),
            None => (qualify(&self.package, name), name.to_string()),
        };
        self.local
            .entry(name.to_string())
            .or_insert_with(|| qualified.clone());
        self.local.insert(relative.clone(), qualified.clone());

        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                self.register_local(member, Some((&qualified, &relative)));
            }
        }
    }

    fn lookup(&self, simple: &str) -> Option<String> {
        if let Some(q) = self.local.get(simple).or_else(|| self.imports.get(simple)) {
            return Some(q.clone());
        }
        if JAVA_LANG.contains(&simple) {
            return Some(format!("java.lang.{simple}"));
        }
        self.wildcards
            .iter()
            .map(|package| format!("{package}.{simple}"))
            .find(|candidate| self.known.iter().any(|k| k == candidate))
    }

    /// Qualifies a class name as written in source.
    fn resolve_name(&self, name: &str, vars: &[String]) -> String {
        if vars.iter().any(|v| v == name) {
            return name.to_string();
        }
        if let Some(q) = self.local.get(name) {
            return q.clone();
        }
        match name.split_once('.') {
            Some((head, tail)) => match self.lookup(head) {
                Some(q) => format!("{q}.{tail}"),
                None => name.to_string(),
            },
            None => self
                .lookup(name)
                .unwrap_or_else(|| qualify(&self.package, name)),
        }
    }

    fn type_of(&self, node: Node<'_>, vars: &[String]) -> Result<TypeName, GeneratorError> {
        let ty = TypeName::parse(self.text(node)).map_err(|e| self.error(node, e))?;
        Ok(ty.map_class_names(&mut |name| TypeName::class(self.resolve_name(name, vars))))
    }

    fn modifiers<'t>(&self, node: Node<'t>) -> Modifiers<'t> {
        let mut mods = Modifiers::default();
        let Some(list) = child_of_kind(node, "modifiers") else {
            return mods;
        };
        for child in list.children(&mut list.walk()) {
            match child.kind() {
                "public" => mods.visibility = Some(Visibility::Public),
                "protected" => mods.visibility = Some(Visibility::Protected),
                "private" => mods.visibility = Some(Visibility::Private),
                "abstract" => mods.is_abstract = true,
                "static" => mods.is_static = true,
                "annotation" | "marker_annotation" => mods.annotations.push(child),
                _ => {}
            }
        }
        mods
    }

    fn class(
        &self,
        node: Node<'_>,
        outer: Option<&str>,
        in_interface: bool,
        out: &mut Vec<ClassDecl>,
    ) -> Result<(), GeneratorError> {
        let Some(name_node) = node.child_by_field_name("name") else {
            return Ok(());
        };
        let simple = self.text(name_node);
        let qualified = match outer {
            Some(outer) => format!("{outer}.{simple}"),
            None => qualify(&self.package, simple),
        };
        let is_interface = node.kind() == "interface_declaration";
        let mods = self.modifiers(node);

        let mut class = ClassDecl::new(qualified.clone());
        class.visibility = mods.visibility.unwrap_or(if in_interface {
            Visibility::Public
        } else {
            Visibility::Package
        });
        class.is_abstract = mods.is_abstract || is_interface;
        class.location = Some(SourceLocation::new(
            self.path,
            name_node.start_position().row + 1,
        ));

        if let Some(params) = node.child_by_field_name("type_parameters") {
            class.type_parameters = self.type_parameters(params, &[])?;
        }
        let vars: Vec<String> = class
            .type_parameters
            .iter()
            .map(|tv| tv.name.clone())
            .collect();

        if let Some(superclass) = node.child_by_field_name("superclass")
            && let Some(ty) = named_children(superclass).into_iter().next()
        {
            class.supertypes.push(self.type_of(ty, &vars)?);
        }
        let interface_lists = node
            .child_by_field_name("interfaces")
            .into_iter()
            .chain(child_of_kind(node, "extends_interfaces"));
        for list in interface_lists {
            if let Some(types) = child_of_kind(list, "type_list") {
                for ty in named_children(types) {
                    class.supertypes.push(self.type_of(ty, &vars)?);
                }
            }
        }

        for annotation in &mods.annotations {
            if let Some(parsed) = self.parser_annotation(*annotation)? {
                class.parser = Some(parsed);
            }
        }

        let mut nested = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                match member.kind() {
                    "constructor_declaration" => {
                        class.constructors.push(self.constructor(member, &vars)?)
                    }
                    "method_declaration" => {
                        class.methods.push(self.method(member, &vars, is_interface)?)
                    }
                    "class_declaration" | "interface_declaration" => {
                        self.class(member, Some(&qualified), is_interface, &mut nested)?
                    }
                    _ => {}
                }
            }
        }

        class.normalize();
        out.push(class);
        out.extend(nested);
        Ok(())
    }

    fn type_parameters(
        &self,
        node: Node<'_>,
        outer_vars: &[String],
    ) -> Result<Vec<TypeVariable>, GeneratorError> {
        let params: Vec<Node<'_>> = named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "type_parameter")
            .collect();
        let mut vars: Vec<String> = outer_vars.to_vec();
        for param in &params {
            if let Some(name) = child_of_kind(*param, "type_identifier")
                .or_else(|| child_of_kind(*param, "identifier"))
            {
                vars.push(self.text(name).to_string());
            }
        }

        let mut out = Vec::new();
        for param in params {
            let Some(name) = child_of_kind(param, "type_identifier")
                .or_else(|| child_of_kind(param, "identifier"))
            else {
                continue;
            };
            let mut bounds = Vec::new();
            if let Some(bound) = child_of_kind(param, "type_bound") {
                for ty in named_children(bound) {
                    bounds.push(self.type_of(ty, &vars)?);
                }
            }
            out.push(TypeVariable::bounded(self.text(name), bounds));
        }
        Ok(out)
    }

    fn constructor(
        &self,
        node: Node<'_>,
        vars: &[String],
    ) -> Result<ConstructorDecl, GeneratorError> {
        let mods = self.modifiers(node);
        let (parameters, varargs) = match node.child_by_field_name("parameters") {
            Some(list) => self.parameters(list, vars)?,
            None => (Vec::new(), false),
        };
        Ok(ConstructorDecl {
            visibility: mods.visibility.unwrap_or(Visibility::Package),
            parameters,
            varargs,
        })
    }

    fn method(
        &self,
        node: Node<'_>,
        class_vars: &[String],
        in_interface: bool,
    ) -> Result<MethodDecl, GeneratorError> {
        let mods = self.modifiers(node);
        let mut vars = class_vars.to_vec();
        if let Some(params) = node.child_by_field_name("type_parameters") {
            vars.extend(
                self.type_parameters(params, class_vars)?
                    .into_iter()
                    .map(|tv| tv.name),
            );
        }

        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .ok_or_else(|| self.error(node, "method without a name"))?;
        let return_type = match node.child_by_field_name("type") {
            Some(ty) => self.type_of(ty, &vars)?,
            None => TypeName::Primitive("void".to_string()),
        };
        let (parameters, _) = match node.child_by_field_name("parameters") {
            Some(list) => self.parameters(list, &vars)?,
            None => (Vec::new(), false),
        };

        Ok(MethodDecl {
            name,
            visibility: mods.visibility.unwrap_or(if in_interface {
                Visibility::Public
            } else {
                Visibility::Package
            }),
            is_static: mods.is_static,
            parameters,
            return_type,
        })
    }

    /// Reads a `formal_parameters` list; the flag is set for a trailing `...`.
    fn parameters(
        &self,
        node: Node<'_>,
        vars: &[String],
    ) -> Result<(Vec<ParamDecl>, bool), GeneratorError> {
        let mut params = Vec::new();
        let mut varargs = false;
        for param in named_children(node) {
            match param.kind() {
                "formal_parameter" => {
                    let ty_node = param
                        .child_by_field_name("type")
                        .ok_or_else(|| self.error(param, "parameter without a type"))?;
                    let mut ty = self.type_of(ty_node, vars)?;
                    if let Some(dims) = param.child_by_field_name("dimensions") {
                        for _ in self.text(dims).matches('[') {
                            ty = ty.array_of();
                        }
                    }
                    let name = param
                        .child_by_field_name("name")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    params.push(ParamDecl::new(name, ty));
                }
                "spread_parameter" => {
                    let children = named_children(param);
                    let ty_node = children
                        .iter()
                        .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))
                        .ok_or_else(|| self.error(param, "varargs parameter without a type"))?;
                    let ty = self.type_of(*ty_node, vars)?.array_of();
                    let name = children
                        .iter()
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"))
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    params.push(ParamDecl::new(name, ty));
                    varargs = true;
                }
                _ => {}
            }
        }
        Ok((params, varargs))
    }

    /// Reads the parser annotation, or `None` for any other annotation.
    fn parser_annotation(
        &self,
        node: Node<'_>,
    ) -> Result<Option<ParserAnnotation>, GeneratorError> {
        let Some(name) = node.child_by_field_name("name") else {
            return Ok(None);
        };
        if self.resolve_name(self.text(name), &[]) != self.annotation {
            return Ok(None);
        }

        let mut annotation = ParserAnnotation::new("");
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return Ok(Some(annotation));
        };
        for pair in named_children(arguments) {
            if pair.kind() != "element_value_pair" {
                continue;
            }
            let (Some(key), Some(value)) = (
                pair.child_by_field_name("key"),
                pair.child_by_field_name("value"),
            ) else {
                continue;
            };
            match self.text(key) {
                "name" => annotation.name = self.string_literal(value)?,
                "wrappers" => annotation.wrappers = Some(self.class_literals(value)?),
                _ => {}
            }
        }
        Ok(Some(annotation))
    }

    fn string_literal(&self, node: Node<'_>) -> Result<String, GeneratorError> {
        if node.kind() != "string_literal" {
            return Err(self.error(node, "parser name must be a string literal"));
        }
        let raw = self.text(node);
        let inner = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        Ok(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
    }

    fn class_literals(&self, node: Node<'_>) -> Result<Vec<TypeName>, GeneratorError> {
        let literals = match node.kind() {
            "class_literal" => vec![node],
            "element_value_array_initializer" => named_children(node),
            _ => return Err(self.error(node, "wrappers must be class literals")),
        };
        literals
            .into_iter()
            .map(|literal| {
                if literal.kind() != "class_literal" {
                    return Err(self.error(literal, "wrappers must be class literals"));
                }
                let text = self.text(literal).trim();
                let type_text = text.strip_suffix("class").unwrap_or(text).trim_end();
                let type_text = type_text.strip_suffix('.').unwrap_or(type_text);
                let ty = TypeName::parse(type_text).map_err(|e| self.error(literal, e))?;
                Ok(ty
                    .map_class_names(&mut |name| TypeName::class(self.resolve_name(name, &[])))
                    .raw())
            })
            .collect()
    }
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    node.named_children(&mut node.walk()).collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn package_name(node: Node<'_>, source: &str) -> String {
    named_children(node)
        .into_iter()
        .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
        .map(|n| text(n, source).chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
