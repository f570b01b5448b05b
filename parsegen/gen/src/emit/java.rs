//! Java source rendering.
//!
//! Produces a single compilation unit:
//!
//! ```text
//! // This code was automatically generated by parsegen. Do not edit manually.
//! package rxhttp.wrapper.param;
//!
//! import java.lang.reflect.Type;
//! import rxhttp.wrapper.parse.Parser;
//!
//! public abstract class RxHttpParsers extends BaseRxHttp {
//!   // Response
//!   public <T> ObservableCall<T> toObservableResponse(Type type) {
//!     return toObservable(wrapResponseParser(type));
//!   }
//! }
//! ```
//!
//! Types are written by simple name wherever an import makes that
//! unambiguous. The first type to claim a simple name gets it; any later
//! type with the same simple name is written fully qualified.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use parsegen_define::types::simple_name_of;
use parsegen_define::{TypeName, TypeVariable};

use crate::ir::{Expr, GeneratedUnit, Stmt, SynthesizedMethod};

/// Header line written at the top of every generated file.
pub const GENERATED_NOTICE: &str =
    "// This code was automatically generated by parsegen. Do not edit manually.";

const INDENT: &str = "  ";

/// Decides how each class name is written and which imports are needed.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    imports: BTreeSet<String>,
    rendered: HashMap<String, String>,
}

impl ImportSet {
    /// Collects every class name `unit` mentions, in emission order.
    pub fn for_unit(unit: &GeneratedUnit) -> Self {
        let mut names: Vec<String> = Vec::new();
        unit.superclass.for_each_class(&mut |n| names.push(n.to_string()));
        for method in unit.methods() {
            method.for_each_type(&mut |ty| ty.for_each_class(&mut |n| names.push(n.to_string())));
        }

        let own = qualify(&unit.package, &unit.class_name);
        let mut set = Self::default();
        let mut claimed: HashMap<&str, &str> = HashMap::new();
        claimed.insert(&unit.class_name, &own);

        for name in names.iter().map(String::as_str) {
            if set.rendered.contains_key(name) {
                continue;
            }
            let simple = simple_name_of(name);
            let rendered = match claimed.get(simple) {
                Some(owner) if *owner == name => simple.to_string(),
                Some(_) => name.to_string(),
                None => {
                    claimed.insert(simple, name);
                    if needs_import(name, &unit.package) {
                        set.imports.insert(name.to_string());
                    }
                    simple.to_string()
                }
            };
            set.rendered.insert(name.to_string(), rendered);
        }
        set
    }

    /// Sorted import lines, without the `import` keyword.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    /// Writes a type as it should appear in the source.
    pub fn type_name(&self, ty: &TypeName) -> String {
        match ty {
            TypeName::Primitive(name) | TypeName::Variable(name) => name.clone(),
            TypeName::Class { name, args } => {
                let base = self
                    .rendered
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| name.clone());
                if args.is_empty() {
                    base
                } else {
                    let args: Vec<String> = args.iter().map(|a| self.type_name(a)).collect();
                    format!("{base}<{}>", args.join(", "))
                }
            }
            TypeName::Array(inner) => format!("{}[]", self.type_name(inner)),
            TypeName::Wildcard(None) => "?".to_string(),
            TypeName::Wildcard(Some((bound, inner))) => {
                format!("? {bound} {}", self.type_name(inner))
            }
        }
    }

    fn type_variable(&self, tv: &TypeVariable) -> String {
        let mut out = tv.name.clone();
        for (i, bound) in tv.bounds.iter().enumerate() {
            out.push_str(if i == 0 { " extends " } else { " & " });
            out.push_str(&self.type_name(bound));
        }
        out
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Name(name) => name.clone(),
            Expr::Null => "null".to_string(),
            Expr::ClassLiteral(ty) => format!("{}.class", self.type_name(&ty.raw())),
            Expr::Cast { ty, expr } => format!("({}) {}", self.type_name(ty), self.expr(expr)),
            Expr::Call { name, args } => format!("{name}({})", self.args(args)),
            Expr::StaticCall { owner, name, args } => {
                format!("{}.{name}({})", self.type_name(&owner.raw()), self.args(args))
            }
            Expr::New { ty, diamond, args } => format!(
                "new {}{}({})",
                self.type_name(&ty.raw()),
                if *diamond { "<>" } else { "" },
                self.args(args)
            ),
            Expr::NewArray { element, items } => {
                format!("new {}[]{{{}}}", self.type_name(element), self.args(items))
            }
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => format!(
                "{} ? {} : {}",
                self.expr(cond),
                self.expr(then),
                self.expr(otherwise)
            ),
            Expr::Eq(left, right) => format!("{} == {}", self.expr(left), self.expr(right)),
        }
    }

    fn args(&self, args: &[Expr]) -> String {
        args.iter()
            .map(|a| self.expr(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Local { ty, name, value } => {
                format!("{} {name} = {};", self.type_name(ty), self.expr(value))
            }
            Stmt::If { cond, then } => format!("if ({}) {}", self.expr(cond), self.stmt(then)),
            Stmt::Assign { name, value } => format!("{name} = {};", self.expr(value)),
            Stmt::Return(value) => format!("return {};", self.expr(value)),
        }
    }

    fn method(&self, method: &SynthesizedMethod, out: &mut String) {
        if method.suppress_unchecked {
            out.push_str(INDENT);
            out.push_str("@SuppressWarnings(\"unchecked\")\n");
        }

        let mut header = String::from("public ");
        if method.is_static {
            header.push_str("static ");
        }
        if !method.type_parameters.is_empty() {
            let vars: Vec<String> = method
                .type_parameters
                .iter()
                .map(|tv| self.type_variable(tv))
                .collect();
            let _ = write!(header, "<{}> ", vars.join(", "));
        }

        let last = method.parameters.len().saturating_sub(1);
        let params: Vec<String> = method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| match &p.ty {
                TypeName::Array(inner) if method.varargs && i == last => {
                    format!("{}... {}", self.type_name(inner), p.name)
                }
                ty => format!("{} {}", self.type_name(ty), p.name),
            })
            .collect();

        let _ = writeln!(
            out,
            "{INDENT}{header}{} {}({}) {{",
            self.type_name(&method.return_type),
            method.name,
            params.join(", ")
        );
        for stmt in &method.body {
            let _ = writeln!(out, "{INDENT}{INDENT}{}", self.stmt(stmt));
        }
        let _ = writeln!(out, "{INDENT}}}");
    }
}

/// Renders the unit as a Java source file.
pub fn render_java(unit: &GeneratedUnit) -> String {
    let imports = ImportSet::for_unit(unit);
    let mut out = String::new();

    out.push_str(GENERATED_NOTICE);
    out.push('\n');
    if !unit.package.is_empty() {
        let _ = writeln!(out, "package {};", unit.package);
    }
    out.push('\n');

    let mut any_import = false;
    for import in imports.imports() {
        let _ = writeln!(out, "import {import};");
        any_import = true;
    }
    if any_import {
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "public abstract class {} extends {} {{",
        unit.class_name,
        imports.type_name(&unit.superclass)
    );

    let mut first = true;
    for group in &unit.parsers {
        for (i, method) in group.methods.iter().enumerate() {
            if !first {
                out.push('\n');
            }
            first = false;
            if i == 0 {
                let _ = writeln!(out, "{INDENT}// {}", group.alias);
            }
            imports.method(method, &mut out);
        }
    }
    out.push_str("}\n");
    out
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Types in `java.lang` and in the unit's own package need no import.
fn needs_import(name: &str, package: &str) -> bool {
    let Some((owner, _)) = name.rsplit_once('.') else {
        return false;
    };
    owner != "java.lang" && owner != package
}
