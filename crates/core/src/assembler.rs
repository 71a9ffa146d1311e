//! Namespace assembly.
//!
//! Runs one generation pass per catalog namespace and wraps the results in the final module:
//!
//! ```text
//! interface Window { messenger: typeof messenger; }
//! interface WebExtEvent<TCallback extends (...args: any[]) => any> { ... }
//! declare namespace messenger {
//!   export namespace alarms { ... }
//! }
//! declare namespace browser {            // only with an alias namespace
//!   export import alarms = messenger.alarms;
//! }
//! ```

use tracing::{debug, info};

use crate::catalog::{NamespaceSchema, SchemaCatalog};
use crate::diagnostics::Diagnostics;
use crate::generator::overloads::{expand_function, generate_event};
use crate::generator::{Context, Generated, Scope, dispatch, dispatch_inline, doc_for};
use crate::schema::{Descriptor, DescriptorKind, classify};
use crate::ts::{
    DeclKind, Emit, JsDoc, TsDecl, TsFunctionType, TsKeyword, TsMember, TsMethod, TsModule,
    TsParam, TsProp, TsType,
};

/// Name of the generic listener interface every event refers to.
pub const EVENT_INTERFACE: &str = "WebExtEvent";

/// Options shaping the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Ambient namespace holding every API namespace.
    pub root_namespace: String,
    /// Second global re-exporting every API namespace of the root.
    pub alias_namespace: Option<String>,
    /// Interface of the hosting environment that exposes the root namespace.
    pub host_interface: String,
    /// Namespaces left out of the output. They still resolve references.
    pub ignored_namespaces: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            root_namespace: "messenger".to_string(),
            alias_namespace: None,
            host_interface: "Window".to_string(),
            ignored_namespaces: Vec::new(),
        }
    }
}

impl GenerateOptions {
    /// Whether `namespace` is left out of the output.
    pub fn is_ignored(&self, namespace: &str) -> bool {
        self.ignored_namespaces.iter().any(|n| n == namespace)
    }
}

fn scope<'a>(ns: &'a NamespaceSchema, catalog: &'a SchemaCatalog, defined: &'a [TsDecl]) -> Scope<'a> {
    Scope {
        namespace: &ns.name,
        known_types: &ns.types,
        catalog,
        defined,
    }
}

/// Append declarations, skipping non-mergeable ones whose name is already taken in the same
/// declaration space. A type and a value may share a name.
fn push_decls(body: &mut Vec<TsDecl>, decls: Vec<TsDecl>, namespace: &str, diagnostics: &mut Diagnostics) {
    for decl in decls {
        if !decl.may_repeat() && body.iter().any(|d| d.shares_name_with(&decl)) {
            diagnostics.warn(
                Some(namespace),
                format!("skipping duplicate declaration of {namespace}.{}", decl.name),
            );
            continue;
        }
        body.push(decl);
    }
}

/// Declaration for a namespace-level type.
fn type_declaration(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<TsDecl> {
    match classify(desc) {
        Some(DescriptorKind::Reference(target)) => {
            diagnostics.warn(
                Some(scope.namespace),
                format!(
                    "skipping type {} referencing {target}, type merging is not supported",
                    desc.label()
                ),
            );
            None
        }
        Some(DescriptorKind::Function) => {
            let ty = dispatch_inline(desc, scope, diagnostics)?;
            let Some(id) = desc.id.as_deref() else {
                diagnostics.error(Some(scope.namespace), format!("function type {} has no id", desc.label()));
                return None;
            };
            Some(TsDecl::exported(id, DeclKind::TypeAlias { ty }).with_doc(doc_for(desc)))
        }
        Some(DescriptorKind::StaticValue(_)) => {
            dispatch(desc, scope, Context::Namespace, diagnostics).and_then(Generated::into_decl)
        }
        _ => dispatch(desc, scope, Context::Interface, diagnostics).and_then(Generated::into_decl),
    }
}

/// Declaration for a namespace-level property.
fn property_declaration(
    key: &str,
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<TsDecl> {
    if desc.is_unsupported() {
        diagnostics.warn(
            Some(scope.namespace),
            format!("skipping unsupported property {}.{key}", scope.namespace),
        );
        return None;
    }

    match classify(desc) {
        Some(DescriptorKind::StaticValue(_)) => {
            let named = Descriptor {
                name: Some(key.to_string()),
                ..desc.clone()
            };
            dispatch(&named, scope, Context::Namespace, diagnostics).and_then(Generated::into_decl)
        }
        Some(kind) if kind.is_constant_like() => {
            let ty = dispatch_inline(desc, scope, diagnostics)?;
            Some(TsDecl::exported(key, DeclKind::Const { ty }).with_doc(doc_for(desc)))
        }
        kind => {
            let kind = kind.map_or("unknown", |k| k.as_str());
            diagnostics.warn(
                Some(scope.namespace),
                format!("cannot create property {}.{key} of kind {kind}", scope.namespace),
            );
            None
        }
    }
}

/// Generate the declarations of one namespace in order: types, functions, events, properties.
pub fn generate_namespace(
    ns: &NamespaceSchema,
    catalog: &SchemaCatalog,
    diagnostics: &mut Diagnostics,
) -> Vec<TsDecl> {
    let namespace = ns.name.as_str();
    let mut body: Vec<TsDecl> = Vec::new();

    for desc in &ns.types {
        let decl = type_declaration(desc, &scope(ns, catalog, &body), diagnostics);
        push_decls(&mut body, decl.into_iter().collect(), namespace, diagnostics);
    }

    for desc in &ns.functions {
        let decls = expand_function(desc, &scope(ns, catalog, &body), diagnostics);
        push_decls(&mut body, decls, namespace, diagnostics);
    }

    for event in &ns.events {
        if event.is_unsupported() {
            diagnostics.warn(
                Some(namespace),
                format!("skipping unsupported event {namespace}.{}", event.label()),
            );
            continue;
        }
        let decl = generate_event(event, &scope(ns, catalog, &body), diagnostics);
        push_decls(&mut body, decl.into_iter().collect(), namespace, diagnostics);
    }

    for (key, desc) in &ns.properties {
        let decl = property_declaration(key, desc, &scope(ns, catalog, &body), diagnostics);
        push_decls(&mut body, decl.into_iter().collect(), namespace, diagnostics);
    }

    debug!(namespace, declarations = body.len(), "Generated namespace");
    body
}

fn property(name: &str, ty: TsType) -> TsMember {
    TsMember::Property(TsProp {
        name: name.to_string(),
        ty,
        optional: false,
        doc: JsDoc::default(),
    })
}

/// `interface Window { messenger: typeof messenger; }`, merged into the global host type.
fn host_declaration(options: &GenerateOptions) -> TsDecl {
    let mut members = vec![property(
        &options.root_namespace,
        TsType::TypeQuery(options.root_namespace.clone()),
    )];
    if let Some(alias) = &options.alias_namespace {
        members.push(property(alias, TsType::TypeQuery(alias.clone())));
    }
    TsDecl {
        export: false,
        ..TsDecl::exported(
            options.host_interface.as_str(),
            DeclKind::Interface {
                type_params: Vec::new(),
                members,
            },
        )
    }
}

/// The generic listener interface shared by all events.
fn event_interface() -> TsDecl {
    let any_function = TsFunctionType {
        params: vec![TsParam {
            rest: true,
            ..TsParam::new("args", TsType::Array(Box::new(TsType::keyword(TsKeyword::Any))))
        }],
        return_type: Box::new(TsType::keyword(TsKeyword::Any)),
    };
    let callback = TsType::reference("TCallback");
    let method = |name: &str, return_type: TsKeyword| {
        TsMember::Method(TsMethod {
            name: name.to_string(),
            params: vec![TsParam::new("cb", callback.clone())],
            return_type: TsType::keyword(return_type),
            doc: JsDoc::default(),
        })
    };

    TsDecl {
        export: false,
        ..TsDecl::exported(
            EVENT_INTERFACE,
            DeclKind::Interface {
                type_params: vec![format!("TCallback extends {}", any_function.emit())],
                members: vec![
                    method("addListener", TsKeyword::Void),
                    method("removeListener", TsKeyword::Void),
                    method("hasListener", TsKeyword::Boolean),
                ],
            },
        )
    }
}

fn ambient_namespace(name: &str, body: Vec<TsDecl>) -> TsDecl {
    TsDecl {
        export: false,
        declare: true,
        ..TsDecl::exported(name, DeclKind::Namespace { body })
    }
}

/// `export import tabs = messenger.tabs;` for every first-level name under the root.
/// Dotted namespaces (`devtools.panels`) are covered by their first segment.
fn alias_imports(root: &str, namespaces: &[TsDecl]) -> Vec<TsDecl> {
    let mut seen: Vec<&str> = Vec::new();
    for ns in namespaces {
        let first = ns.name.split('.').next().unwrap_or(&ns.name);
        if !seen.contains(&first) {
            seen.push(first);
        }
    }
    seen.into_iter()
        .map(|name| {
            TsDecl::exported(
                name,
                DeclKind::ImportAlias {
                    target: format!("{root}.{name}"),
                },
            )
        })
        .collect()
}

/// Build the complete module for a catalog.
pub fn assemble(catalog: &SchemaCatalog, options: &GenerateOptions, diagnostics: &mut Diagnostics) -> TsModule {
    let mut namespaces = Vec::new();
    for ns in catalog.namespaces() {
        if options.is_ignored(&ns.name) {
            debug!(namespace = %ns.name, "Ignoring namespace");
            continue;
        }
        let body = generate_namespace(ns, catalog, diagnostics);
        let doc = JsDoc {
            description: ns.description.clone(),
            ..JsDoc::default()
        };
        namespaces.push(TsDecl::exported(ns.name.as_str(), DeclKind::Namespace { body }).with_doc(doc));
    }

    let mut statements = vec![host_declaration(options), event_interface()];

    let aliases = match &options.alias_namespace {
        Some(_) => alias_imports(&options.root_namespace, &namespaces),
        None => Vec::new(),
    };

    info!(
        namespaces = namespaces.len(),
        warnings = diagnostics.warning_count(),
        errors = diagnostics.error_count(),
        "Assembled declarations"
    );

    statements.push(ambient_namespace(&options.root_namespace, namespaces));
    if let Some(alias) = &options.alias_namespace {
        statements.push(ambient_namespace(alias, aliases));
    }
    TsModule { statements }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn catalog(fragments: Value) -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        let mut diagnostics = Diagnostics::new();
        let Value::Array(fragments) = fragments else {
            unreachable!("fragments are an array");
        };
        for fragment in fragments {
            catalog.merge_value(fragment, "test.json", &mut diagnostics);
        }
        catalog
    }

    fn namespace_text(catalog: &SchemaCatalog, name: &str, diagnostics: &mut Diagnostics) -> String {
        let ns = catalog.get(name).unwrap();
        generate_namespace(ns, catalog, diagnostics)
            .iter()
            .map(|d| d.emit())
            .collect()
    }

    #[test]
    fn test_bootstrap_declarations() {
        let module = assemble(&SchemaCatalog::new(), &GenerateOptions::default(), &mut Diagnostics::new());
        let out = module.emit();
        assert!(out.starts_with("interface Window {\n  messenger: typeof messenger;\n}\n"));
        assert!(out.contains(
            "interface WebExtEvent<TCallback extends (...args: any[]) => any> {\n  \
             addListener(cb: TCallback): void;\n  \
             removeListener(cb: TCallback): void;\n  \
             hasListener(cb: TCallback): boolean;\n}\n"
        ));
        assert!(out.ends_with("declare namespace messenger {}\n"));
    }

    #[test]
    fn test_section_order() {
        let catalog = catalog(json!([{
            "namespace": "runtime",
            "properties": {"lastError": {"type": "object", "properties": {"message": {"type": "string"}}}},
            "events": [{"name": "onStartup", "type": "function"}],
            "functions": [{"name": "reload", "type": "function"}],
            "types": [{"id": "PlatformOs", "type": "string", "enum": ["mac", "win"]}]
        }]));
        let mut diagnostics = Diagnostics::new();
        let out = namespace_text(&catalog, "runtime", &mut diagnostics);
        assert_eq!(
            out,
            "export type PlatformOs = \"mac\" | \"win\";\n\
             export function reload(): void;\n\
             export const onStartup: WebExtEvent<() => void>;\n\
             export const lastError: { message: string };\n"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_reference_types_skipped_with_warning() {
        let catalog = catalog(json!([{
            "namespace": "menus",
            "types": [{"id": "OnClickData", "$ref": "contextMenus.OnClickData"}]
        }]));
        let mut diagnostics = Diagnostics::new();
        assert_eq!(namespace_text(&catalog, "menus", &mut diagnostics), "");
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.entries()[0].message.contains("type merging"));
    }

    #[test]
    fn test_duplicate_alias_skipped() {
        let catalog = catalog(json!([{
            "namespace": "tabs",
            "types": [
                {"id": "TabStatus", "type": "string", "enum": ["loading"]},
                {"id": "TabStatus", "type": "string", "enum": ["complete"]},
                {"id": "Tab", "type": "object", "properties": {"id": {"type": "integer"}}},
                {"id": "Tab", "type": "object", "properties": {"url": {"type": "string"}}}
            ]
        }]));
        let mut diagnostics = Diagnostics::new();
        let out = namespace_text(&catalog, "tabs", &mut diagnostics);
        assert!(out.contains("export type TabStatus = \"loading\";"));
        assert!(!out.contains("\"complete\""));
        assert!(out.contains("url: string;"));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_type_and_value_share_a_name() {
        let catalog = catalog(json!([{
            "namespace": "downloads",
            "types": [{"id": "State", "type": "string", "enum": ["in_progress"]}],
            "events": [{"name": "onChanged", "type": "function"}],
            "properties": {
                "State": {"value": "in_progress"},
                "onChanged": {"value": 1}
            }
        }]));
        let mut diagnostics = Diagnostics::new();
        let out = namespace_text(&catalog, "downloads", &mut diagnostics);
        assert!(out.contains("export type State = \"in_progress\";"));
        assert!(out.contains("export const State: \"in_progress\";"));
        assert_eq!(out.matches("export const onChanged").count(), 1);
        assert!(out.contains("export const onChanged: WebExtEvent<() => void>;"));
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.entries()[0].message.contains("downloads.onChanged"));
    }

    #[test]
    fn test_properties() {
        let catalog = catalog(json!([{
            "namespace": "alarms",
            "properties": {
                "MAX_ALARMS": {"value": 500},
                "OFFSET": {"value": -5, "description": "Shift."},
                "callable": {"type": "function"},
                "legacy": {"type": "string", "unsupported": true}
            }
        }]));
        let mut diagnostics = Diagnostics::new();
        let out = namespace_text(&catalog, "alarms", &mut diagnostics);
        assert_eq!(
            out,
            "export const MAX_ALARMS: 500;\n/** Shift. */\nexport const OFFSET: -5;\n"
        );
        assert_eq!(diagnostics.warning_count(), 2);
    }

    #[test]
    fn test_unsupported_event_warned() {
        let catalog = catalog(json!([{
            "namespace": "tabs",
            "events": [{"name": "onGone", "type": "function", "unsupported": true}]
        }]));
        let mut diagnostics = Diagnostics::new();
        assert_eq!(namespace_text(&catalog, "tabs", &mut diagnostics), "");
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_function_type_becomes_alias() {
        let catalog = catalog(json!([{
            "namespace": "tabs",
            "types": [{"id": "Filter", "type": "function", "parameters": [{"name": "tab", "type": "integer"}], "returns": {"type": "boolean"}}]
        }]));
        let mut diagnostics = Diagnostics::new();
        assert_eq!(
            namespace_text(&catalog, "tabs", &mut diagnostics),
            "export type Filter = (tab: number) => boolean;\n"
        );
    }

    #[test]
    fn test_alias_and_ignored_namespaces() {
        let catalog = catalog(json!([
            {"namespace": "alarms", "description": "Alarms."},
            {"namespace": "test"},
            {"namespace": "tabs"}
        ]));
        let options = GenerateOptions {
            alias_namespace: Some("browser".to_string()),
            ignored_namespaces: vec!["test".to_string()],
            ..GenerateOptions::default()
        };
        let out = assemble(&catalog, &options, &mut Diagnostics::new()).emit();

        assert!(out.contains("  messenger: typeof messenger;\n  browser: typeof browser;\n"));
        assert!(out.contains(
            "declare namespace messenger {\n  /** Alarms. */\n  export namespace alarms {}\n  export namespace tabs {}\n}\n"
        ));
        assert!(out.ends_with(
            "declare namespace browser {\n  export import alarms = messenger.alarms;\n  export import tabs = messenger.tabs;\n}\n"
        ));
        assert!(!out.contains("namespace test"));
    }
}
