//! Object types.
//!
//! An object collects declared properties, methods and a dynamic part (pattern and
//! additional properties), optionally on top of an `isInstanceOf` base type.
//!
//! | members | dynamic | instanceOf | inline                 | named            |
//! |---------|---------|------------|------------------------|------------------|
//! | no      | no      | no         | `{ [key: string]: any }` | empty interface |
//! | yes     | no      | no         | `{ ... }`              | interface        |
//! | no      | yes     | no         | dynamic                | alias of dynamic |
//! | yes     | yes     | no         | `{ ... } & dynamic`    | alias            |
//! | any     | any     | yes        | `Base & ...`           | alias            |

use super::{Context, Generated, Scope, dispatch_inline, doc_for, overloads};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::{AdditionalProperties, Descriptor};
use crate::ts::utils::{IdentifierTreatment, identifier_treatment};
use crate::ts::{DeclKind, TsDecl, TsIndex, TsKeyword, TsMember, TsProp, TsType};

pub fn generate_object(
    desc: &Descriptor,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let id = match context {
        Context::Inline => None,
        Context::Namespace | Context::Interface => Some(desc.id.as_deref().ok_or(
            GenerateError::MissingIdentifier {
                variant: "object",
                context,
            },
        )?),
    };

    let mut members = property_members(desc, scope, diagnostics);
    members.extend(method_members(desc, scope, diagnostics));
    members.extend(pattern_members(desc, scope, diagnostics));
    let additional = additional_type(desc, scope, diagnostics);
    let base = desc.is_instance_of.as_deref().map(TsType::reference);

    if let Some(id) = id
        && base.is_none()
        && additional.is_none()
    {
        let kind = DeclKind::Interface {
            type_params: Vec::new(),
            members,
        };
        return Ok(Some(Generated::Decl(
            TsDecl::exported(id, kind).with_doc(doc_for(desc)),
        )));
    }

    let mut parts: Vec<TsType> = base.into_iter().collect();
    if !members.is_empty() {
        parts.push(TsType::Object(members));
    }
    parts.extend(additional);
    let ty = match parts.len() {
        0 => TsType::string_index(TsType::keyword(TsKeyword::Any)),
        1 => parts.swap_remove(0),
        _ => TsType::Intersection(parts),
    };

    Ok(Some(match id {
        None => Generated::Type(ty),
        Some(id) => Generated::Decl(
            TsDecl::exported(id, DeclKind::TypeAlias { ty }).with_doc(doc_for(desc)),
        ),
    }))
}

fn member_path(scope: &Scope<'_>, desc: &Descriptor, member: &str) -> String {
    [Some(scope.namespace), desc.id.as_deref(), Some(member)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(".")
}

fn property_members(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<TsMember> {
    let mut members = Vec::new();
    for (key, prop) in desc.properties.iter().flatten() {
        match dispatch_inline(prop, scope, diagnostics) {
            Some(ty) => members.push(TsMember::Property(TsProp {
                name: key.clone(),
                ty,
                optional: prop.is_optional(),
                doc: doc_for(prop),
            })),
            None if prop.is_unsupported() => diagnostics.warn(
                Some(scope.namespace),
                format!("skipping unsupported property {}", member_path(scope, desc, key)),
            ),
            None => diagnostics.error(
                Some(scope.namespace),
                format!("cannot create property type for {}", member_path(scope, desc, key)),
            ),
        }
    }
    members
}

fn method_members(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<TsMember> {
    let mut members = Vec::new();
    for func in desc.functions.iter().flatten() {
        if func.is_unsupported() {
            let name = func.identifier().unwrap_or("<unnamed>");
            diagnostics.warn(
                Some(scope.namespace),
                format!("skipping unsupported function {}", member_path(scope, desc, name)),
            );
            continue;
        }
        members.extend(overloads::expand_method(func, scope, diagnostics));
    }
    members
}

/// Identifier-named patterns become optional properties; the rest fold into one index
/// signature over the union of their value types.
fn pattern_members(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<TsMember> {
    let mut members = Vec::new();
    let mut index_types = Vec::new();

    for (pattern, value) in desc.pattern_properties.iter().flatten() {
        let Some(ty) = dispatch_inline(value, scope, diagnostics) else {
            diagnostics.warn(
                Some(scope.namespace),
                format!(
                    "cannot resolve pattern property {}",
                    member_path(scope, desc, pattern)
                ),
            );
            continue;
        };
        match identifier_treatment(pattern) {
            IdentifierTreatment::Valid => members.push(TsMember::Property(TsProp {
                name: pattern.clone(),
                ty,
                optional: true,
                doc: doc_for(value),
            })),
            IdentifierTreatment::Quoted => index_types.push(ty),
        }
    }

    if !index_types.is_empty() {
        let value = if index_types.len() == 1 {
            index_types.swap_remove(0)
        } else {
            TsType::Union(index_types)
        };
        members.push(TsMember::Index(TsIndex {
            key: "key".to_string(),
            value,
        }));
    }
    members
}

fn additional_type(
    desc: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<TsType> {
    match desc.additional_properties.as_ref()? {
        AdditionalProperties::Bool(true) => {
            Some(TsType::string_index(TsType::keyword(TsKeyword::Any)))
        }
        AdditionalProperties::Bool(false) => None,
        AdditionalProperties::Schema(schema) => Some(
            match dispatch_inline(schema, scope, diagnostics) {
                Some(ty) => TsType::string_index(ty),
                None => TsType::keyword(TsKeyword::Any),
            },
        ),
    }
}
