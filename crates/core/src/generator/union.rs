//! Unions of choices. Choices are always generated inline.

use super::{Context, Generated, Scope, dispatch_inline};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{DeclKind, TsDecl, TsType};

pub fn generate_union(
    desc: &Descriptor,
    choices: &[Descriptor],
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let id = match context {
        Context::Inline => None,
        Context::Namespace | Context::Interface => Some(
            desc.id
                .as_deref()
                .ok_or(GenerateError::UnionWithoutId { context })?,
        ),
    };

    let types: Vec<TsType> = choices
        .iter()
        .filter_map(|choice| dispatch_inline(choice, scope, diagnostics))
        .collect();
    if types.is_empty() {
        return Err(GenerateError::EmptyUnion { label: desc.label() });
    }
    let ty = TsType::Union(types);

    Ok(Some(match id {
        None => Generated::Type(ty),
        Some(id) => Generated::Decl(
            TsDecl::exported(id, DeclKind::TypeAlias { ty }).with_doc(super::doc_for(desc)),
        ),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::generator::test_support::{catalog_with, descriptor, emit_generated, scope};

    #[test]
    fn test_union_alias() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({
            "id": "TabIdOrIds",
            "choices": [{"type": "integer"}, {"type": "array", "items": {"type": "integer"}}]
        }));
        let choices = desc.choices.clone().unwrap();

        let generated = generate_union(&desc, &choices, &scope, Context::Interface, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(emit_generated(&generated), "export type TabIdOrIds = number | number[];\n");
    }

    #[test]
    fn test_union_without_id() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({"choices": [{"type": "integer"}]}));
        let choices = desc.choices.clone().unwrap();

        let err = generate_union(&desc, &choices, &scope, Context::Namespace, &mut diagnostics).unwrap_err();
        assert_eq!(err, GenerateError::UnionWithoutId { context: Context::Namespace });
    }

    #[test]
    fn test_failed_choices_dropped() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({"choices": [{"type": "string"}, {"id": "Mystery"}]}));
        let choices = desc.choices.clone().unwrap();

        let generated = generate_union(&desc, &choices, &scope, Context::Inline, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(emit_generated(&generated), "string");
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_all_choices_failed() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({"choices": [{"id": "Mystery"}]}));
        let choices = desc.choices.clone().unwrap();

        let err = generate_union(&desc, &choices, &scope, Context::Inline, &mut diagnostics).unwrap_err();
        assert!(matches!(err, GenerateError::EmptyUnion { .. }));
    }
}
