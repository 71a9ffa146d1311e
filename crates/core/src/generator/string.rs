//! Plain strings and string enums.

use super::static_value::literal_type;
use super::{Context, Generated, named_alias};
use crate::error::GenerateError;
use crate::schema::{Descriptor, EnumChoice};
use crate::ts::{JsDoc, TsKeyword, TsLiteral, TsType};

pub fn generate_string(desc: &Descriptor, context: Context) -> Result<Option<Generated>, GenerateError> {
    let ty = TsType::keyword(TsKeyword::String);
    match context {
        Context::Inline => Ok(Some(Generated::Type(ty))),
        Context::Namespace | Context::Interface => named_alias(desc, ty, "string", context),
    }
}

/// Union of literals; `never` when there are no representable choices.
pub fn enum_type(choices: &[EnumChoice]) -> TsType {
    let literals: Vec<TsType> = choices
        .iter()
        .filter_map(|choice| {
            let literal = match choice {
                EnumChoice::Other(value) => literal_type(value).ok()?,
                EnumChoice::Plain(value) | EnumChoice::Named { name: value, .. } => {
                    TsType::Literal(TsLiteral::String(value.clone()))
                }
            };
            Some(match choice.description() {
                Some(description) => TsType::Documented {
                    doc: JsDoc {
                        description: Some(description.to_string()),
                        ..JsDoc::default()
                    },
                    ty: Box::new(literal),
                },
                None => literal,
            })
        })
        .collect();

    if literals.is_empty() {
        return TsType::keyword(TsKeyword::Never);
    }
    TsType::Union(literals)
}

pub fn generate_enum(
    desc: &Descriptor,
    choices: &[EnumChoice],
    context: Context,
) -> Result<Option<Generated>, GenerateError> {
    let ty = enum_type(choices);
    match context {
        Context::Inline => Ok(Some(Generated::Type(ty))),
        Context::Namespace | Context::Interface => named_alias(desc, ty, "enum-string", context),
    }
}
