//! Whole-pass properties of the generator.
//!
//! Declarations are built through the public `parsegen-define` API, run
//! through `pipeline::generate`, and checked on the resulting IR and
//! rendered output.

use parsegen_define::{
    ClassDecl, ConstructorDecl, MethodDecl, ParamDecl, ParserAnnotation, TypeName, TypeVariable,
    Visibility,
};
use parsegen_gen::config::{DuplicateAliasPolicy, GeneratorConfig};
use parsegen_gen::emit::{render_declarative, render_java};
use parsegen_gen::errors::GeneratorError;
use parsegen_gen::ir::{GeneratedUnit, MethodRole};
use parsegen_gen::pipeline::generate;
use parsegen_gen::registry::Rejection;

fn parser(
    name: &str,
    alias: &str,
    vars: Vec<TypeVariable>,
    constructors: Vec<ConstructorDecl>,
    result: &str,
) -> ClassDecl {
    let mut class = ClassDecl::new(name);
    let args = vars.iter().map(TypeVariable::as_type).collect();
    class.type_parameters = vars;
    class.supertypes = vec![TypeName::parameterized(
        "rxhttp.wrapper.parse.TypeParser",
        args,
    )];
    class.constructors = constructors;
    class.methods = vec![MethodDecl {
        name: "onParse".to_string(),
        visibility: Visibility::Public,
        is_static: false,
        parameters: vec![ParamDecl::new("response", TypeName::class("okhttp3.Response"))],
        return_type: TypeName::parse(result).unwrap(),
    }];
    class.parser = Some(ParserAnnotation::new(alias));
    class.normalize();
    class
}

fn string_parser(name: &str, alias: &str) -> ClassDecl {
    parser(name, alias, vec![], vec![], "String")
}

fn response_parser(wrappers: &[&str]) -> ClassDecl {
    let mut class = parser(
        "com.example.ResponseParser",
        "Response",
        vec![TypeVariable::new("T")],
        vec![ConstructorDecl::public(vec![ParamDecl::new(
            "type",
            TypeName::type_descriptor(),
        )])],
        "T",
    );
    class.parser = Some(ParserAnnotation::with_wrappers(
        "Response",
        wrappers.iter().map(|w| TypeName::class(*w)).collect(),
    ));
    class
}

fn names(unit: &GeneratedUnit) -> Vec<&str> {
    unit.method_names()
}

#[test]
fn arity_zero_yields_one_base_method_when_streams_enabled() {
    let generation = generate(
        vec![string_parser("com.example.StringParser", "Str")],
        &GeneratorConfig::default(),
    )
    .unwrap();
    assert_eq!(names(&generation.unit), vec!["toObservableStr"]);

    let config = GeneratorConfig {
        reactive_streams: false,
        ..GeneratorConfig::default()
    };
    let generation = generate(vec![string_parser("com.example.StringParser", "Str")], &config)
        .unwrap();
    assert!(generation.is_clean());
    assert!(names(&generation.unit).is_empty());
}

#[test]
fn streams_disabled_still_emits_wrap_helpers() {
    let config = GeneratorConfig {
        reactive_streams: false,
        ..GeneratorConfig::default()
    };
    let generation = generate(
        vec![
            response_parser(&["com.example.entity.PageList"]),
            string_parser("com.example.StringParser", "Str"),
        ],
        &config,
    )
    .unwrap();

    assert!(generation.is_clean());
    assert_eq!(names(&generation.unit), vec!["wrapResponseParser"]);
    let java = render_java(&generation.unit);
    assert!(java.contains("  public static <T> Parser<T> wrapResponseParser(Type type) {\n"));
    assert!(!java.contains("toObservable"));
}

#[test]
fn arity_one_with_page_list_wrapper_produces_full_family() {
    let generation = generate(
        vec![response_parser(&["com.example.entity.PageList"])],
        &GeneratorConfig::default(),
    )
    .unwrap();

    let methods: Vec<_> = generation.unit.methods().collect();
    assert_eq!(methods[0].role, MethodRole::WrapHelper);
    assert_eq!(methods[0].name, "wrapResponseParser");

    let conversions: Vec<_> = methods
        .iter()
        .filter(|m| m.role != MethodRole::WrapHelper)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(
        conversions,
        vec![
            "toObservableResponse",
            "toObservableResponse",
            "toObservableResponseList",
            "toObservableResponsePageList",
        ]
    );
}

#[test]
fn class_token_overload_forwards_to_base_method() {
    let generation = generate(vec![response_parser(&[])], &GeneratorConfig::default()).unwrap();
    let java = render_java(&generation.unit);

    assert!(java.contains(
        "  public <T> ObservableCall<T> toObservableResponse(Type type) {\n    return toObservable(wrapResponseParser(type));\n  }\n"
    ));
    assert!(java.contains(
        "  public <T> ObservableCall<T> toObservableResponse(Class<T> type) {\n    return toObservableResponse((Type) type);\n  }\n"
    ));
}

#[test]
fn duplicate_alias_is_rejected_by_default() {
    let generation = generate(
        vec![
            string_parser("com.example.FirstParser", "Same"),
            string_parser("com.example.SecondParser", "Same"),
        ],
        &GeneratorConfig::default(),
    )
    .unwrap();

    assert_eq!(generation.diagnostics.len(), 1);
    match &generation.diagnostics[0].rejection {
        Rejection::DuplicateAlias {
            alias,
            class,
            previous,
        } => {
            assert_eq!(alias, "Same");
            assert_eq!(class, "com.example.SecondParser");
            assert_eq!(previous, "com.example.FirstParser");
        }
        other => panic!("Expected DuplicateAlias, got: {:?}", other),
    }
    assert_eq!(generation.unit.parsers[0].class, "com.example.FirstParser");
}

#[test]
fn duplicate_alias_keeps_later_parser_with_last_write_wins() {
    let config = GeneratorConfig {
        duplicate_aliases: DuplicateAliasPolicy::LastWriteWins,
        ..GeneratorConfig::default()
    };
    let generation = generate(
        vec![
            string_parser("com.example.FirstParser", "Same"),
            string_parser("com.example.OtherParser", "Other"),
            string_parser("com.example.SecondParser", "Same"),
        ],
        &config,
    )
    .unwrap();

    assert!(generation.is_clean());
    let classes: Vec<_> = generation
        .unit
        .parsers
        .iter()
        .map(|p| p.class.as_str())
        .collect();
    assert_eq!(
        classes,
        vec!["com.example.SecondParser", "com.example.OtherParser"]
    );
}

#[test]
fn generation_is_byte_identical_across_runs() {
    let classes = || {
        vec![
            string_parser("com.example.StringParser", "Str"),
            response_parser(&["com.example.entity.PageList"]),
            parser(
                "com.example.MapParser",
                "Map",
                vec![TypeVariable::new("K"), TypeVariable::new("V")],
                vec![ConstructorDecl::public(vec![ParamDecl::new(
                    "types",
                    TypeName::type_descriptor().array_of(),
                )])],
                "java.util.Map<K, V>",
            ),
        ]
    };
    let config = GeneratorConfig::default();

    let first = generate(classes(), &config).unwrap().unit;
    let second = generate(classes(), &config).unwrap().unit;

    assert_eq!(render_java(&first), render_java(&second));
    assert_eq!(
        render_declarative(&first).unwrap(),
        render_declarative(&second).unwrap()
    );
}

#[test]
fn type_array_constructor_satisfies_arity_two() {
    let generation = generate(
        vec![parser(
            "com.example.MapParser",
            "Map",
            vec![TypeVariable::new("K"), TypeVariable::new("V")],
            vec![ConstructorDecl::public(vec![ParamDecl::new(
                "types",
                TypeName::type_descriptor().array_of(),
            )])],
            "java.util.Map<K, V>",
        )],
        &GeneratorConfig::default(),
    )
    .unwrap();

    assert!(generation.is_clean());
    assert_eq!(
        names(&generation.unit),
        vec!["toObservableMap", "toObservableMap"]
    );

    let java = render_java(&generation.unit);
    assert!(java.contains(
        "  public <K, V> ObservableCall<Map<K, V>> toObservableMap(Type[] types) {\n    return toObservable(new MapParser<>(types));\n  }\n"
    ));
    assert!(java.contains(
        "  public <K, V> ObservableCall<Map<K, V>> toObservableMap(Class<K> kType, Class<V> vType) {\n    return toObservableMap(new Type[]{kType, vType});\n  }\n"
    ));
}

#[test]
fn bounded_type_parameter_suppresses_wrappers() {
    let mut class = response_parser(&["com.example.entity.PageList"]);
    class.type_parameters = vec![TypeVariable::bounded(
        "T",
        vec![TypeName::class("java.lang.Number")],
    )];

    let generation = generate(vec![class], &GeneratorConfig::default()).unwrap();
    let unit_names = names(&generation.unit);

    assert_eq!(
        unit_names,
        vec![
            "wrapResponseParser",
            "toObservableResponse",
            "toObservableResponse"
        ]
    );
    let java = render_java(&generation.unit);
    assert!(java.contains("<T extends Number>"));
}

#[test]
fn rejections_do_not_stop_other_declarations() {
    let mut hidden = string_parser("com.example.HiddenParser", "Hidden");
    hidden.visibility = Visibility::Package;
    let pair = parser(
        "com.example.PairParser",
        "Pair",
        vec![TypeVariable::new("A"), TypeVariable::new("B")],
        vec![ConstructorDecl::public(vec![ParamDecl::new(
            "type",
            TypeName::type_descriptor(),
        )])],
        "A",
    );

    let generation = generate(
        vec![hidden, pair, string_parser("com.example.StringParser", "Str")],
        &GeneratorConfig::default(),
    )
    .unwrap();

    assert_eq!(generation.diagnostics.len(), 2);
    assert!(matches!(
        generation.diagnostics[0].rejection,
        Rejection::NotPublic { .. }
    ));
    let message = generation.diagnostics[1].to_string();
    assert!(
        message.contains("public PairParser(java.lang.reflect.Type, java.lang.reflect.Type)"),
        "unexpected message: {message}"
    );
    assert_eq!(names(&generation.unit), vec!["toObservableStr"]);
}

#[test]
fn colliding_signatures_fail_the_pass() {
    let mut fixed = response_parser(&[]);
    fixed.name = "com.example.other.ResponseParser".to_string();
    fixed.parser = Some(ParserAnnotation::new("Other"));

    // Same simple class name, so both emit `wrapResponseParser(Type)`.
    let result = generate(
        vec![response_parser(&[]), fixed],
        &GeneratorConfig::default(),
    );
    match result {
        Err(GeneratorError::SignatureCollision {
            signature,
            first,
            second,
        }) => {
            assert_eq!(signature, "wrapResponseParser(java.lang.reflect.Type)");
            assert_eq!(first, "com.example.ResponseParser");
            assert_eq!(second, "com.example.other.ResponseParser");
        }
        other => panic!("Expected SignatureCollision, got: {:?}", other),
    }
}
