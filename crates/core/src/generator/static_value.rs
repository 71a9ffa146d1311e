//! Compile-time constants (`{"name": "MAX_ITEMS", "value": 16}`).

use serde_json::Value;

use super::{Context, Generated, doc_for};
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{DeclKind, TsDecl, TsLiteral, TsMember, TsProp, TsType};

/// Literal type for a constant; only strings, numbers and booleans are representable.
pub fn literal_type(value: &Value) -> Result<TsType, GenerateError> {
    let literal = match value {
        Value::String(s) => TsLiteral::String(s.clone()),
        Value::Bool(b) => TsLiteral::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => TsLiteral::Int(i),
            (None, Some(f)) => TsLiteral::Number(f),
            (None, None) => {
                return Err(GenerateError::InvalidStaticValue {
                    value: n.to_string(),
                });
            }
        },
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(GenerateError::InvalidStaticValue {
                value: value.to_string(),
            });
        }
    };
    Ok(TsType::Literal(literal))
}

pub fn generate_static_value(
    desc: &Descriptor,
    value: &Value,
    context: Context,
) -> Result<Option<Generated>, GenerateError> {
    let ty = literal_type(value)?;
    if context == Context::Inline {
        return Ok(Some(Generated::Type(ty)));
    }

    let name = desc
        .identifier()
        .ok_or(GenerateError::MissingIdentifier {
            variant: "static-value",
            context,
        })?
        .to_string();

    Ok(Some(match context {
        Context::Namespace => {
            Generated::Decl(TsDecl::exported(name, DeclKind::Const { ty }).with_doc(doc_for(desc)))
        }
        _ => Generated::Member(TsMember::Property(TsProp {
            name,
            ty,
            optional: desc.is_optional(),
            doc: doc_for(desc),
        })),
    }))
}
