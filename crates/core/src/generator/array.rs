//! Array types. Items are always generated inline.

use super::{Context, Generated, Scope, dispatch_inline, named_alias};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{TsKeyword, TsType};

pub fn generate_array(
    desc: &Descriptor,
    items: &Descriptor,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let item_type = dispatch_inline(items, scope, diagnostics)
        .unwrap_or_else(|| TsType::keyword(TsKeyword::Any));
    let ty = TsType::Array(Box::new(item_type));

    match context {
        Context::Inline => Ok(Some(Generated::Type(ty))),
        Context::Namespace | Context::Interface => named_alias(desc, ty, "array", context),
    }
}
