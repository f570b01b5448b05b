//! Scanning real Java sources through to generated output.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use parsegen_gen::config::GeneratorConfig;
use parsegen_gen::output::{OutputFormat, generate_and_write, java_path};
use parsegen_gen::pipeline::generate;
use parsegen_gen::registry::Rejection;
use parsegen_gen::scan::scan_sources;

const BASE_PARSER: &str = r#"package com.example;

import rxhttp.wrapper.parse.TypeParser;

public abstract class BaseParser<T> extends TypeParser<T> {
    protected BaseParser() {
        super();
    }
}
"#;

const PACKAGE_PARSER: &str = r#"package com.example;

import rxhttp.wrapper.annotation.Parser;

@Parser(name = "Bad")
class PackageParser extends rxhttp.wrapper.parse.SimpleParser<String> {
}
"#;

const RESPONSE_PARSER: &str = r#"package com.example;

import java.io.IOException;
import java.lang.reflect.Type;

import com.example.entity.PageList;
import okhttp3.Response;
import rxhttp.wrapper.annotation.Parser;
import rxhttp.wrapper.parse.TypeParser;

@Parser(name = "Response", wrappers = {PageList.class})
public class ResponseParser<T> extends TypeParser<T> {
    protected ResponseParser() {
        super();
    }

    public ResponseParser(Type type) {
        super(type);
    }

    @Override
    public T onParse(Response response) throws IOException {
        return convert(response, types[0]);
    }
}
"#;

const STRING_PARSER: &str = r#"package com.example;

import okhttp3.Response;
import rxhttp.wrapper.annotation.Parser;

@Parser(name = "Str")
public class StringParser implements rxhttp.wrapper.parse.Parser<String> {
    @Override
    public String onParse(Response response) {
        return response.body().string();
    }
}
"#;

const WRAPPED_PARSER: &str = r#"package com.example;

import java.lang.reflect.Type;

import okhttp3.Response;
import rxhttp.wrapper.annotation.Parser;

@Parser(name = "Wrapped")
public class WrappedParser<T> extends BaseParser<T> {
    public WrappedParser(Type type) {
        super(type);
    }

    public T onParse(Response response) {
        return null;
    }
}
"#;

fn write_sources(root: &Path) {
    let dir = root.join("com/example");
    fs::create_dir_all(&dir).unwrap();
    for (name, source) in [
        ("BaseParser.java", BASE_PARSER),
        ("PackageParser.java", PACKAGE_PARSER),
        ("ResponseParser.java", RESPONSE_PARSER),
        ("StringParser.java", STRING_PARSER),
        ("WrappedParser.java", WRAPPED_PARSER),
    ] {
        fs::write(dir.join(name), source).unwrap();
    }
    fs::write(root.join("README.md"), "not java").unwrap();
}

#[test]
fn scans_and_generates_from_java_sources() {
    let sources = TempDir::new().unwrap();
    write_sources(sources.path());
    let config = GeneratorConfig::default();

    let classes = scan_sources(&[sources.path().to_path_buf()], &config).unwrap();
    let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "com.example.BaseParser",
            "com.example.PackageParser",
            "com.example.ResponseParser",
            "com.example.StringParser",
            "com.example.WrappedParser",
        ]
    );

    let generation = generate(classes, &config).unwrap();

    assert_eq!(generation.diagnostics.len(), 1);
    let diagnostic = &generation.diagnostics[0];
    match &diagnostic.rejection {
        Rejection::NotPublic { class } => assert_eq!(class, "com.example.PackageParser"),
        other => panic!("Expected NotPublic, got: {:?}", other),
    }
    let location = diagnostic.location.as_ref().unwrap();
    assert!(location.file.ends_with("com/example/PackageParser.java"));
    assert_eq!(location.line, Some(6));

    let aliases: Vec<_> = generation
        .unit
        .parsers
        .iter()
        .map(|p| p.alias.as_str())
        .collect();
    assert_eq!(aliases, vec!["Response", "Str", "Wrapped"]);
    assert_eq!(
        generation.unit.method_names(),
        vec![
            "wrapResponseParser",
            "toObservableResponse",
            "toObservableResponse",
            "toObservableResponseList",
            "toObservableResponsePageList",
            "toObservableStr",
            "wrapWrappedParser",
            "toObservableWrapped",
            "toObservableWrapped",
            "toObservableWrappedList",
        ]
    );
}

#[test]
fn writes_both_backends_for_scanned_sources() {
    let sources = TempDir::new().unwrap();
    let dir = sources.path().join("com/example");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ResponseParser.java"), RESPONSE_PARSER).unwrap();

    let output = TempDir::new().unwrap();
    let config = GeneratorConfig::default();
    let classes = scan_sources(&[sources.path().to_path_buf()], &config).unwrap();
    let generation = generate(classes, &config).unwrap();
    assert!(generation.is_clean());

    generate_and_write(
        &generation.unit,
        &config,
        output.path(),
        OutputFormat::All,
        false,
    )
    .unwrap();

    let java = fs::read_to_string(output.path().join(java_path(&config))).unwrap();
    assert!(java.contains("import com.example.ResponseParser;\n"));
    assert!(java.contains("import com.example.entity.PageList;\n"));
    assert!(java.contains(
        "  public <T> ObservableCall<PageList<T>> toObservableResponsePageList(Class<T> type) {\n"
    ));

    let json = fs::read_to_string(output.path().join("parsers.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["parsers"][0]["class"], "com.example.ResponseParser");
    assert_eq!(doc["parsers"][0]["methods"].as_array().unwrap().len(), 5);
}

#[test]
fn scanning_a_broken_file_fails() {
    let sources = TempDir::new().unwrap();
    fs::write(sources.path().join("Broken.java"), "public class Broken {").unwrap();

    let result = scan_sources(&[sources.path().to_path_buf()], &GeneratorConfig::default());
    assert!(result.is_err());
}
