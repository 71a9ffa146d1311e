//! Schema descriptor → declaration mapping.
//!
//! [`dispatch`] is the single entry point: it applies the static override table, classifies
//! the descriptor and routes it to the generator for its variant. Generators recurse through
//! the dispatcher for nested types. A generator failure is reported as a diagnostic and
//! yields "no declaration" for that node only.

pub(crate) mod array;
pub(crate) mod function;
pub(crate) mod object;
pub(crate) mod overloads;
pub(crate) mod overrides;
pub(crate) mod primitive;
pub(crate) mod reference;
pub(crate) mod static_value;
pub(crate) mod string;
pub(crate) mod union;

use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use crate::catalog::SchemaCatalog;
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::{Descriptor, DescriptorKind, classify};
use crate::ts::{DeclKind, JsDoc, TsDecl, TsKeyword, TsMember, TsType};

use overrides::{OverrideAction, find_override};

/// Where a generated type is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// A bare type usable inside another declaration
    Inline,
    /// A standalone exported declaration
    Namespace,
    /// A member of an interface body, or a type declaration collected for one
    Interface,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Inline => f.write_str("inline"),
            Context::Namespace => f.write_str("namespace"),
            Context::Interface => f.write_str("interface"),
        }
    }
}

/// Read-only view of the current namespace, threaded through every generator.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Namespace being generated.
    pub namespace: &'a str,
    /// Type descriptors declared by the namespace.
    pub known_types: &'a [Descriptor],
    /// Every namespace, for dotted references.
    pub catalog: &'a SchemaCatalog,
    /// Declarations already emitted in this namespace, in order.
    pub defined: &'a [TsDecl],
}

impl Scope<'_> {
    /// Whether a type-level declaration with this name was already emitted.
    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.iter().any(|d| d.declares_type() && d.name == name)
    }

    /// Whether a sibling descriptor carries this id.
    pub fn is_known(&self, id: &str) -> bool {
        self.known_types.iter().any(|t| t.id.as_deref() == Some(id))
    }
}

/// Output of a generator; its shape depends on the context.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// Inline context
    Type(TsType),
    /// Namespace context, and named types collected in interface context
    Decl(TsDecl),
    /// A property or method of an interface body
    Member(TsMember),
}

impl Generated {
    /// The inline type, if that is what was generated.
    pub fn into_type(self) -> Option<TsType> {
        match self {
            Generated::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// The declaration, if that is what was generated.
    pub fn into_decl(self) -> Option<TsDecl> {
        match self {
            Generated::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    /// The interface member, if that is what was generated.
    pub fn into_member(self) -> Option<TsMember> {
        match self {
            Generated::Member(member) => Some(member),
            _ => None,
        }
    }
}

/// Generate a descriptor, containing any failure as an error diagnostic.
pub fn dispatch(
    desc: &Descriptor,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Option<Generated> {
    match try_dispatch(desc, scope, context, diagnostics) {
        Ok(generated) => generated,
        Err(err) => {
            diagnostics.error(
                Some(scope.namespace),
                format!(
                    "failed to create typing for {} in {context} context: {err}",
                    desc.label()
                ),
            );
            None
        }
    }
}

/// Generate a descriptor at inline context and keep only a type result.
pub fn dispatch_inline(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<TsType> {
    dispatch(desc, scope, Context::Inline, diagnostics).and_then(Generated::into_type)
}

/// Apply the override table. `None` means the descriptor is skipped.
pub fn apply_overrides(desc: &Descriptor) -> Option<Cow<'_, Descriptor>> {
    match find_override(desc) {
        Some(OverrideAction::Skip) => None,
        Some(OverrideAction::Reshape(reshape)) => Some(Cow::Owned(reshape(desc))),
        None => Some(Cow::Borrowed(desc)),
    }
}

/// Generate a descriptor, returning the failure to the caller.
///
/// `Ok(None)` means the node was deliberately skipped.
pub fn try_dispatch(
    desc: &Descriptor,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let Some(desc) = apply_overrides(desc) else {
        trace!(namespace = scope.namespace, node = %desc.label(), "Skipped by override");
        return Ok(None);
    };
    let desc: &Descriptor = &desc;

    let kind = classify(desc).ok_or_else(|| GenerateError::Unclassifiable {
        label: desc.label(),
    })?;

    match kind {
        DescriptorKind::Null => primitive::generate_null(context),
        DescriptorKind::Any => primitive::generate_keyword(desc, TsKeyword::Any, "any", context),
        DescriptorKind::Boolean => {
            primitive::generate_keyword(desc, TsKeyword::Boolean, "boolean", context)
        }
        DescriptorKind::Integer | DescriptorKind::Number => {
            primitive::generate_keyword(desc, TsKeyword::Number, kind.as_str(), context)
        }
        DescriptorKind::Function => function::generate_function(desc, scope, context, diagnostics),
        DescriptorKind::Array(items) => array::generate_array(desc, items, scope, context, diagnostics),
        DescriptorKind::Union(choices) => {
            union::generate_union(desc, choices, scope, context, diagnostics)
        }
        DescriptorKind::Reference(target) => {
            reference::generate_reference(desc, target, scope, context, diagnostics)
        }
        DescriptorKind::String => string::generate_string(desc, context),
        DescriptorKind::EnumString(choices) => string::generate_enum(desc, choices, context),
        DescriptorKind::Object => object::generate_object(desc, scope, context, diagnostics),
        DescriptorKind::StaticValue(value) => static_value::generate_static_value(desc, value, context),
    }
}

/// JSDoc for a descriptor: description and deprecation note.
pub fn doc_for(desc: &Descriptor) -> JsDoc {
    JsDoc {
        description: desc.description.clone(),
        params: Vec::new(),
        deprecated: desc.deprecation_message().map(str::to_string),
    }
}

/// `export type <id> = <ty>;` for variants whose standalone form is a type alias.
pub(crate) fn named_alias(
    desc: &Descriptor,
    ty: TsType,
    variant: &'static str,
    context: Context,
) -> Result<Option<Generated>, GenerateError> {
    let id = desc
        .id
        .as_deref()
        .ok_or(GenerateError::MissingIdentifier { variant, context })?;
    Ok(Some(Generated::Decl(
        TsDecl::exported(id, DeclKind::TypeAlias { ty }).with_doc(doc_for(desc)),
    )))
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::test_support::{catalog_with, descriptor, emit_generated, scope};
    use super::*;

    #[test]
    fn test_dispatch_contains_failures() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();

        let result = dispatch(&descriptor(json!({"id": "Mystery"})), &scope, Context::Inline, &mut diagnostics);
        assert!(result.is_none());
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.entries()[0].message.contains("Mystery"));
    }

    #[test]
    fn test_try_dispatch_reports_missing_id() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();

        let err = try_dispatch(&descriptor(json!({"type": "string"})), &scope, Context::Namespace, &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingIdentifier { .. }));
    }

    #[test]
    fn test_unsupported_skipped_silently() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();

        let result = dispatch(
            &descriptor(json!({"type": "string", "unsupported": true})),
            &scope,
            Context::Inline,
            &mut diagnostics,
        );
        assert!(result.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_null_only_inline() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();
        let null = descriptor(json!({"id": "Nothing", "type": "null"}));

        let inline = dispatch(&null, &scope, Context::Inline, &mut diagnostics).unwrap();
        assert_eq!(emit_generated(&inline), "null");
        let err = try_dispatch(&null, &scope, Context::Namespace, &mut diagnostics).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidContext { .. }));
    }

    #[test]
    fn test_primitive_alias() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();

        let generated = dispatch(
            &descriptor(json!({"id": "Count", "type": "integer", "description": "How many."})),
            &scope,
            Context::Interface,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(emit_generated(&generated), "/** How many. */\nexport type Count = number;\n");
    }
}
