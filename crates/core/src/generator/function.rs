//! Function signatures.
//!
//! The `callback` parameter is consumed in every context: when it takes exactly one
//! parameter, that parameter's type becomes the return type. Signatures that are themselves
//! callbacks (the type of a `callback` parameter, event listeners) keep their parameters
//! verbatim.

use super::{Context, Generated, Scope, dispatch_inline};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::Descriptor;
use crate::ts::{
    DeclKind, JsDoc, TsDecl, TsFunctionType, TsKeyword, TsMember, TsMethod, TsParam, TsType,
};

/// How a signature treats a parameter named `callback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackHandling {
    /// Drop the parameter and derive the return type from it
    Consume,
    /// Keep every parameter as declared
    Keep,
}

pub fn generate_function(
    desc: &Descriptor,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Generated>, GenerateError> {
    let handling = if desc.is_callback_param() {
        CallbackHandling::Keep
    } else {
        CallbackHandling::Consume
    };
    generate_signature(desc, desc.params(), handling, scope, context, diagnostics).map(Some)
}

/// Generate `desc` with an explicit parameter list in place of its own.
pub fn generate_signature(
    desc: &Descriptor,
    params: &[Descriptor],
    handling: CallbackHandling,
    scope: &Scope<'_>,
    context: Context,
    diagnostics: &mut Diagnostics,
) -> Result<Generated, GenerateError> {
    let name = match context {
        Context::Inline => None,
        Context::Namespace | Context::Interface => Some(
            desc.identifier()
                .ok_or(GenerateError::MissingIdentifier {
                    variant: "function",
                    context,
                })?
                .to_string(),
        ),
    };

    let consume_callback = handling == CallbackHandling::Consume;
    let return_type = return_type(desc, params, consume_callback, scope, diagnostics);
    let visible: Vec<&Descriptor> = params
        .iter()
        .filter(|p| !(consume_callback && p.is_callback_param()))
        .collect();
    let (ts_params, param_docs) = build_params(&visible, scope, diagnostics);

    let doc = JsDoc {
        description: desc.description.clone(),
        params: param_docs,
        deprecated: desc.deprecation_message().map(str::to_string),
    };

    Ok(match (context, name) {
        (Context::Namespace, Some(name)) => Generated::Decl(
            TsDecl::exported(
                name,
                DeclKind::Function {
                    params: ts_params,
                    return_type,
                },
            )
            .with_doc(doc),
        ),
        (Context::Interface, Some(name)) => Generated::Member(TsMember::Method(TsMethod {
            name,
            params: ts_params,
            return_type,
            doc,
        })),
        _ => Generated::Type(TsType::Function(TsFunctionType {
            params: ts_params,
            return_type: Box::new(return_type),
        })),
    })
}

/// Callback result, then `returns`, then void; wrapped in `Promise` for async functions.
fn return_type(
    desc: &Descriptor,
    params: &[Descriptor],
    consume_callback: bool,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> TsType {
    let mut ty = TsType::keyword(TsKeyword::Void);

    if consume_callback
        && let Some(callback) = params.iter().find(|p| p.is_callback_param())
        && let [result] = callback.params()
        && let Some(result_type) = dispatch_inline(result, scope, diagnostics)
    {
        ty = result_type;
    }

    if ty.is_void()
        && let Some(returns) = &desc.returns
        && let Some(returns_type) = dispatch_inline(returns, scope, diagnostics)
    {
        ty = returns_type;
    }

    if desc.is_async() {
        ty = TsType::generic("Promise", vec![ty]);
    }
    ty
}

/// Parameters and their `@param` docs. Unnamed parameters become `param{i}`; a parameter
/// whose type cannot be generated becomes `any`.
pub(crate) fn build_params(
    params: &[&Descriptor],
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> (Vec<TsParam>, Vec<(String, String)>) {
    let mut ts_params = Vec::with_capacity(params.len());
    let mut docs = Vec::new();

    for (index, param) in params.iter().enumerate() {
        let name = param
            .name
            .clone()
            .unwrap_or_else(|| format!("param{index}"));
        let ty = dispatch_inline(param, scope, diagnostics)
            .unwrap_or_else(|| TsType::keyword(TsKeyword::Any));
        if let Some(description) = &param.description {
            docs.push((name.clone(), description.clone()));
        }
        ts_params.push(TsParam {
            name,
            ty,
            optional: param.is_optional(),
            rest: false,
        });
    }

    (ts_params, docs)
}
