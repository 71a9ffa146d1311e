//! `$ref` types and the reference resolution policy.
//!
//! A bare name is looked up in the current namespace (catalog types, sibling descriptors,
//! already emitted declarations), then in `manifest`. A dotted name is checked against the
//! catalog entry of its namespace prefix. Unresolved references are still emitted.

use super::{Context, Generated, Scope, doc_for};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{DeclKind, TsDecl, TsMember, TsProp, TsType};

/// Namespace holding manifest-level types shared by every API.
pub const MANIFEST_NAMESPACE: &str = "manifest";

/// Resolve a `$ref` target to the name that should be emitted.
pub fn resolve_reference(target: &str, scope: &Scope<'_>, diagnostics: &mut Diagnostics) -> String {
    let namespace = scope.namespace;

    if let Some((prefix, id)) = target.rsplit_once('.') {
        if !scope.catalog.has_type(prefix, id) {
            diagnostics.warn(
                Some(namespace),
                format!("referenced type '{target}' not found in schema '{prefix}'"),
            );
        }
        return target.to_string();
    }

    let local = scope.catalog.has_type(namespace, target)
        || scope.is_known(target)
        || scope.is_defined(target);
    if local {
        return target.to_string();
    }

    if scope.catalog.has_type(MANIFEST_NAMESPACE, target) {
        diagnostics.warn(
            Some(namespace),
            format!(
                "schema incorrect, referenced local type '{target}' in '{namespace}', but should reference {MANIFEST_NAMESPACE}.{target}"
            ),
        );
        return format!("{MANIFEST_NAMESPACE}.{target}");
    }

    diagnostics.warn(
        Some(namespace),
        format!("referenced type '{target}' not found in schema '{namespace}'"),
    );
    target.to_string()
}

pub fn generate_reference(
    desc: &Descriptor,
    target: &str,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let identifier = match context {
        Context::Inline => None,
        Context::Namespace | Context::Interface => Some(
            desc.identifier()
                .ok_or(GenerateError::MissingIdentifier {
                    variant: "reference",
                    context,
                })?
                .to_string(),
        ),
    };

    let ty = TsType::reference(resolve_reference(target, scope, diagnostics));

    Ok(Some(match (context, identifier) {
        (Context::Namespace, Some(name)) => {
            Generated::Decl(TsDecl::exported(name, DeclKind::Const { ty }).with_doc(doc_for(desc)))
        }
        (Context::Interface, Some(name)) => Generated::Member(TsMember::Property(TsProp {
            name,
            ty,
            optional: desc.is_optional(),
            doc: doc_for(desc),
        })),
        _ => Generated::Type(ty),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::generator::test_support::{catalog_with, descriptor, emit_generated, scope};
    use crate::generator::{dispatch, dispatch_inline};

    #[test]
    fn test_local_reference() {
        let catalog = catalog_with(json!({"namespace": "tabs", "types": [{"id": "Tab", "type": "object"}]}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();

        let ty = dispatch_inline(&descriptor(json!({"$ref": "Tab"})), &scope, &mut diagnostics).unwrap();
        assert_eq!(ty, TsType::reference("Tab"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_manifest_fallback() {
        let catalog = catalog_with(json!({"namespace": "browserAction"}));
        let scope = scope(&catalog, "browserAction", &[]);
        let mut diagnostics = Diagnostics::new();

        let ty = dispatch_inline(
            &descriptor(json!({"$ref": "ImageDataOrExtensionURL"})),
            &scope,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(ty, TsType::reference("manifest.ImageDataOrExtensionURL"));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_dangling_reference_single_diagnostic() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();

        let ty = dispatch_inline(&descriptor(json!({"$ref": "Nowhere"})), &scope, &mut diagnostics).unwrap();
        assert_eq!(ty, TsType::reference("Nowhere"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_defined_declaration_resolves() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let defined = vec![TsDecl::exported(
            "QueryInfo",
            DeclKind::Interface {
                type_params: vec![],
                members: vec![],
            },
        )];
        let scope = scope(&catalog, "tabs", &defined);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(resolve_reference("QueryInfo", &scope, &mut diagnostics), "QueryInfo");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_dotted_reference() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            resolve_reference("manifest.ImageDataOrExtensionURL", &scope, &mut diagnostics),
            "manifest.ImageDataOrExtensionURL"
        );
        assert!(diagnostics.is_empty());
        assert_eq!(resolve_reference("windows.Window", &scope, &mut diagnostics), "windows.Window");
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_reference_contexts() {
        let catalog = catalog_with(json!({"namespace": "tabs", "types": [{"id": "Tab", "type": "object"}]}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({"name": "tab", "$ref": "Tab", "optional": true}));

        let member = dispatch(&desc, &scope, Context::Interface, &mut diagnostics).unwrap();
        assert_eq!(emit_generated(&member), "tab?: Tab");
        let decl = dispatch(&desc, &scope, Context::Namespace, &mut diagnostics).unwrap();
        assert_eq!(emit_generated(&decl), "export const tab: Tab;\n");
    }
}
