//! Declaration-file emission via the Emit trait.
//!
//! Each IR node implements `Emit`; block constructs (interfaces, namespaces) additionally
//! support indented emission so nested namespaces print with two spaces per level.

use super::types::{
    DeclKind, JsDoc, TsDecl, TsFunctionType, TsIndex, TsKeyword, TsLiteral, TsMember, TsMethod,
    TsModule, TsParam, TsProp, TsType,
};
use super::utils::{escape_js_string, quote_if_needed, sanitize_description};

/// Trait for emitting declaration text from IR nodes.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Keywords and literals
// =============================================================================

impl Emit for TsKeyword {
    fn emit(&self) -> String {
        match self {
            TsKeyword::Any => "any".to_string(),
            TsKeyword::String => "string".to_string(),
            TsKeyword::Number => "number".to_string(),
            TsKeyword::Boolean => "boolean".to_string(),
            TsKeyword::Null => "null".to_string(),
            TsKeyword::Void => "void".to_string(),
            TsKeyword::Never => "never".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

fn wrap_if(ty: &TsType, needs_parens: bool) -> String {
    if needs_parens {
        format!("({})", ty.emit())
    } else {
        ty.emit()
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Keyword(k) => k.emit(),
            TsType::Literal(lit) => lit.emit(),
            TsType::Array(inner) => {
                let complex = matches!(
                    **inner,
                    TsType::Union(_)
                        | TsType::Intersection(_)
                        | TsType::Function(_)
                        | TsType::Documented { .. }
                );
                format!("{}[]", wrap_if(inner, complex))
            }
            TsType::Union(types) => {
                if types.is_empty() {
                    return TsKeyword::Never.emit();
                }
                types
                    .iter()
                    .map(|t| wrap_if(t, matches!(t, TsType::Function(_))))
                    .collect::<Vec<_>>()
                    .join(" | ")
            }
            TsType::Intersection(types) => types
                .iter()
                .map(|t| wrap_if(t, matches!(t, TsType::Union(_) | TsType::Function(_))))
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(members) => {
                if members.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = members.iter().map(|m| m.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Function(func) => func.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{name}<{args_str}>")
            }
            TsType::TypeQuery(name) => format!("typeof {name}"),
            TsType::Documented { doc, ty } => match inline_doc(doc) {
                Some(comment) => format!("{comment} {}", ty.emit()),
                None => ty.emit(),
            },
        }
    }
}

impl Emit for TsFunctionType {
    fn emit(&self) -> String {
        format!("({}) => {}", emit_params(&self.params), self.return_type.emit())
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let rest = if self.rest { "..." } else { "" };
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}{}: {}", rest, self.name, opt, self.ty.emit())
    }
}

fn emit_params(params: &[TsParam]) -> String {
    params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ")
}

// =============================================================================
// Members
// =============================================================================

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

impl Emit for TsMethod {
    fn emit(&self) -> String {
        format!(
            "{}({}): {}",
            quote_if_needed(&self.name),
            emit_params(&self.params),
            self.return_type.emit()
        )
    }
}

impl Emit for TsIndex {
    fn emit(&self) -> String {
        format!("[{}: string]: {}", self.key, self.value.emit())
    }
}

impl Emit for TsMember {
    fn emit(&self) -> String {
        match self {
            TsMember::Property(prop) => prop.emit(),
            TsMember::Method(method) => method.emit(),
            TsMember::Index(index) => index.emit(),
        }
    }
}

impl TsMember {
    fn doc(&self) -> Option<&JsDoc> {
        match self {
            TsMember::Property(prop) => Some(&prop.doc),
            TsMember::Method(method) => Some(&method.doc),
            TsMember::Index(_) => None,
        }
    }

    /// Emit as an interface body line, doc comment included.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let doc = self.doc().map(|d| d.emit_indented(indent)).unwrap_or_default();
        format!("{doc}{prefix}{};\n", self.emit())
    }
}

// =============================================================================
// Doc comments
// =============================================================================

fn doc_lines(doc: &JsDoc) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(description) = &doc.description {
        lines.extend(
            sanitize_description(description)
                .lines()
                .map(|l| l.trim_end().to_string()),
        );
    }
    for (name, text) in &doc.params {
        let text = sanitize_description(text).replace('\n', " ");
        lines.push(format!("@param {name} {text}").trim_end().to_string());
    }
    if let Some(message) = &doc.deprecated {
        let message = sanitize_description(message).replace('\n', " ");
        lines.push(format!("@deprecated {message}").trim_end().to_string());
    }
    lines
}

fn inline_doc(doc: &JsDoc) -> Option<String> {
    if doc.is_empty() {
        return None;
    }
    Some(format!("/** {} */", doc_lines(doc).join(" ")))
}

impl JsDoc {
    /// Emit a `/** ... */` block at the given indentation, or nothing when empty.
    pub fn emit_indented(&self, indent: usize) -> String {
        if self.is_empty() {
            return String::new();
        }
        let prefix = "  ".repeat(indent);
        let lines = doc_lines(self);
        if let [single] = lines.as_slice() {
            return format!("{prefix}/** {single} */\n");
        }
        let mut output = format!("{prefix}/**\n");
        for line in lines {
            if line.is_empty() {
                output.push_str(&format!("{prefix} *\n"));
            } else {
                output.push_str(&format!("{prefix} * {line}\n"));
            }
        }
        output.push_str(&format!("{prefix} */\n"));
        output
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl Emit for TsDecl {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TsDecl {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let mut output = self.doc.emit_indented(indent);
        let export = if self.export { "export " } else { "" };
        let declare = if self.declare { "declare " } else { "" };
        let modifiers = format!("{prefix}{export}{declare}");

        match &self.kind {
            DeclKind::Interface {
                type_params,
                members,
            } => {
                let generics = if type_params.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", type_params.join(", "))
                };
                if members.is_empty() {
                    output.push_str(&format!("{modifiers}interface {}{generics} {{}}\n", self.name));
                } else {
                    output.push_str(&format!("{modifiers}interface {}{generics} {{\n", self.name));
                    for member in members {
                        output.push_str(&member.emit_indented(indent + 1));
                    }
                    output.push_str(&format!("{prefix}}}\n"));
                }
            }
            DeclKind::TypeAlias { ty } => {
                output.push_str(&format!("{modifiers}type {} = {};\n", self.name, ty.emit()));
            }
            DeclKind::Function {
                params,
                return_type,
            } => {
                output.push_str(&format!(
                    "{modifiers}function {}({}): {};\n",
                    self.name,
                    emit_params(params),
                    return_type.emit()
                ));
            }
            DeclKind::Const { ty } => {
                output.push_str(&format!("{modifiers}const {}: {};\n", self.name, ty.emit()));
            }
            DeclKind::ExportAlias { local } => {
                output.push_str(&format!("{prefix}export {{ {local} as {} }};\n", self.name));
            }
            DeclKind::ImportAlias { target } => {
                output.push_str(&format!("{modifiers}import {} = {target};\n", self.name));
            }
            DeclKind::Namespace { body } => {
                if body.is_empty() {
                    output.push_str(&format!("{modifiers}namespace {} {{}}\n", self.name));
                } else {
                    output.push_str(&format!("{modifiers}namespace {} {{\n", self.name));
                    for decl in body {
                        output.push_str(&decl.emit_indented(indent + 1));
                    }
                    output.push_str(&format!("{prefix}}}\n"));
                }
            }
        }

        output
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        self.statements
            .iter()
            .map(|stmt| stmt.emit())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn string() -> TsType {
        TsType::Keyword(TsKeyword::String)
    }

    fn number() -> TsType {
        TsType::Keyword(TsKeyword::Number)
    }

    #[test]
    fn test_emit_keywords_and_literals() {
        assert_eq!(TsKeyword::Never.emit(), "never");
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Int(-5).emit(), "-5");
        assert_eq!(TsLiteral::Number(1.5).emit(), "1.5");
        assert_eq!(TsLiteral::Bool(false).emit(), "false");
    }

    #[test]
    fn test_emit_union_array() {
        let ty = TsType::Array(Box::new(TsType::Union(vec![string(), number()])));
        assert_eq!(ty.emit(), "(string | number)[]");
    }

    #[test]
    fn test_emit_empty_union_is_never() {
        assert_eq!(TsType::Union(vec![]).emit(), "never");
    }

    #[test]
    fn test_emit_union_of_functions() {
        let f1 = TsType::Function(TsFunctionType {
            params: vec![TsParam::new("a", string())],
            return_type: Box::new(TsType::Keyword(TsKeyword::Void)),
        });
        let f2 = TsType::Function(TsFunctionType {
            params: vec![],
            return_type: Box::new(TsType::Keyword(TsKeyword::Void)),
        });
        assert_eq!(
            TsType::Union(vec![f1, f2]).emit(),
            "((a: string) => void) | (() => void)"
        );
    }

    #[test]
    fn test_emit_object_with_index() {
        let ty = TsType::Object(vec![
            TsMember::Property(TsProp {
                name: "id".into(),
                ty: number(),
                optional: false,
                doc: JsDoc::default(),
            }),
            TsMember::Property(TsProp {
                name: "foo-bar".into(),
                ty: string(),
                optional: true,
                doc: JsDoc::default(),
            }),
            TsMember::Index(TsIndex {
                key: "key".into(),
                value: TsType::Keyword(TsKeyword::Any),
            }),
        ]);
        assert_eq!(
            ty.emit(),
            "{ id: number; \"foo-bar\"?: string; [key: string]: any }"
        );
    }

    #[test]
    fn test_emit_documented_literal() {
        let ty = TsType::Union(vec![
            TsType::Documented {
                doc: JsDoc {
                    description: Some("Normal window".into()),
                    ..JsDoc::default()
                },
                ty: Box::new(TsType::Literal(TsLiteral::String("normal".into()))),
            },
            TsType::Literal(TsLiteral::String("popup".into())),
        ]);
        assert_eq!(ty.emit(), "/** Normal window */ \"normal\" | \"popup\"");
    }

    #[test]
    fn test_emit_interface_with_docs() {
        let decl = TsDecl::exported(
            "Alarm",
            DeclKind::Interface {
                type_params: vec![],
                members: vec![TsMember::Property(TsProp {
                    name: "name".into(),
                    ty: string(),
                    optional: false,
                    doc: JsDoc {
                        description: Some("Name of this alarm.".into()),
                        ..JsDoc::default()
                    },
                })],
            },
        );
        let expected = "export interface Alarm {\n  /** Name of this alarm. */\n  name: string;\n}\n";
        assert_eq!(decl.emit(), expected);
    }

    #[test]
    fn test_emit_function_with_param_docs() {
        let decl = TsDecl::exported(
            "clear",
            DeclKind::Function {
                params: vec![TsParam {
                    name: "name".into(),
                    ty: string(),
                    optional: true,
                    rest: false,
                }],
                return_type: TsType::generic("Promise", vec![TsType::Keyword(TsKeyword::Boolean)]),
            },
        )
        .with_doc(JsDoc {
            description: Some("Clears the alarm.".into()),
            params: vec![("name".into(), "The alarm to clear.".into())],
            deprecated: Some(String::new()),
        });
        let expected = "/**\n * Clears the alarm.\n * @param name The alarm to clear.\n * @deprecated\n */\nexport function clear(name?: string): Promise<boolean>;\n";
        assert_eq!(decl.emit(), expected);
    }

    #[test]
    fn test_emit_nested_namespace() {
        let inner = TsDecl::exported(
            "alarms",
            DeclKind::Namespace {
                body: vec![TsDecl::exported("Id", DeclKind::TypeAlias { ty: string() })],
            },
        );
        let outer = TsDecl {
            name: "messenger".into(),
            export: false,
            declare: true,
            doc: JsDoc::default(),
            kind: DeclKind::Namespace { body: vec![inner] },
        };
        let expected = "declare namespace messenger {\n  export namespace alarms {\n    export type Id = string;\n  }\n}\n";
        assert_eq!(outer.emit(), expected);
    }

    #[test]
    fn test_emit_aliases() {
        let export = TsDecl::exported(
            "delete",
            DeclKind::ExportAlias {
                local: "__delete".into(),
            },
        );
        assert_eq!(export.emit(), "export { __delete as delete };\n");

        let import = TsDecl::exported(
            "tabs",
            DeclKind::ImportAlias {
                target: "messenger.tabs".into(),
            },
        );
        assert_eq!(import.emit(), "export import tabs = messenger.tabs;\n");
    }

    #[test]
    fn test_emit_rest_param() {
        let param = TsParam {
            name: "args".into(),
            ty: TsType::Array(Box::new(TsType::Keyword(TsKeyword::Any))),
            optional: false,
            rest: true,
        };
        assert_eq!(param.emit(), "...args: any[]");
    }
}
