//! Any, boolean, integer, number and null.

use super::{Context, Generated, named_alias};
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{TsKeyword, TsType};

/// Keyword-typed variants: the bare keyword inline, a named alias otherwise.
pub fn generate_keyword(
    desc: &Descriptor,
    keyword: TsKeyword,
    variant: &'static str,
    context: Context,
) -> Result<Option<Generated>, GenerateError> {
    let ty = TsType::keyword(keyword);
    match context {
        Context::Inline => Ok(Some(Generated::Type(ty))),
        Context::Namespace | Context::Interface => named_alias(desc, ty, variant, context),
    }
}

/// `null` only ever appears inline.
pub fn generate_null(context: Context) -> Result<Option<Generated>, GenerateError> {
    match context {
        Context::Inline => Ok(Some(Generated::Type(TsType::keyword(TsKeyword::Null)))),
        Context::Namespace | Context::Interface => Err(GenerateError::InvalidContext {
            variant: "null",
            context,
        }),
    }
}
