//! Overload expansion for infix optional parameters.
//!
//! TypeScript only accepts optional parameters at the end of a list. A schema function like
//! `update(tabId?: integer, props: object)` is therefore emitted as one overload per
//! combination of its infix optional parameters: every such parameter is independently
//! left out or kept as mandatory. For `k` infix optional parameters this gives `2^k`
//! signatures: the baseline (all kept) plus patterns `0..2^k - 1`.
//!
//! Inline object parameters of an expanded function are hoisted into named interfaces
//! (`<Function><Param>`) so the overloads share one declaration. Hoisting belongs to the
//! expansion: a function without infix optional parameters has a single signature, repeats
//! nothing and keeps its object literals inline.
//!
//! Events solve the same problem with a union of listener signatures instead, see
//! [`generate_event`].

use std::borrow::Cow;

use super::{
    Context, Generated, Scope, apply_overrides, dispatch, doc_for,
    function::{CallbackHandling, build_params, generate_signature},
};
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::schema::{Descriptor, DescriptorKind, classify};
use crate::ts::utils::{is_reserved_word, pascal_case};
use crate::ts::{DeclKind, JsDoc, TsDecl, TsKeyword, TsMember, TsMethod, TsParam, TsType};

/// Above this many infix optional parameters only the baseline signature is emitted.
pub const MAX_INFIX_OPTIONAL: usize = 12;

/// Positions of optional parameters followed by a mandatory one. The `callback`
/// parameter is consumed as the return type and takes no part.
pub fn infix_optional_positions(params: &[Descriptor]) -> Vec<usize> {
    params
        .iter()
        .enumerate()
        .filter(|(index, param)| {
            !param.is_callback_param()
                && param.is_optional()
                && params[index + 1..]
                    .iter()
                    .any(|later| !later.is_callback_param() && !later.is_optional())
        })
        .map(|(index, _)| index)
        .collect()
}

/// All parameter lists to emit, baseline first.
pub fn parameter_variants(params: &[Descriptor]) -> Vec<Vec<Descriptor>> {
    let infix = infix_optional_positions(params);
    let baseline: Vec<Descriptor> = params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            if infix.contains(&index) {
                param.with_optional(false)
            } else {
                param.clone()
            }
        })
        .collect();

    let k = infix.len();
    if k == 0 || k > MAX_INFIX_OPTIONAL {
        return vec![baseline];
    }

    let all_kept = (1usize << k) - 1;
    let mut variants = Vec::with_capacity(all_kept + 1);
    variants.push(baseline);
    for pattern in 0..all_kept {
        let variant = params
            .iter()
            .enumerate()
            .filter_map(|(index, param)| match infix.iter().position(|&p| p == index) {
                None => Some(param.clone()),
                Some(bit) if pattern & (1 << bit) != 0 => Some(param.with_optional(false)),
                Some(_) => None,
            })
            .collect();
        variants.push(variant);
    }
    variants
}

/// Extract inline object parameters into named interfaces (`create` + `alarmInfo` →
/// `CreateAlarmInfo`) and rewrite the parameters to reference them.
fn hoist_object_params(
    function_name: &str,
    params: &[Descriptor],
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
    hoisted: &mut Vec<TsDecl>,
) -> Vec<Descriptor> {
    params
        .iter()
        .map(|param| {
            let Some(param_name) = param.name.as_deref() else {
                return param.clone();
            };
            let is_object = matches!(classify(param), Some(DescriptorKind::Object));
            let has_members = param.properties.as_ref().is_some_and(|p| !p.is_empty());
            if param.is_callback_param() || !is_object || !has_members {
                return param.clone();
            }

            let interface_name = pascal_case(&[function_name, param_name]);
            let already_defined = scope.is_defined(&interface_name)
                || hoisted.iter().any(|d| d.name == interface_name);
            if !already_defined {
                let named = Descriptor {
                    id: Some(interface_name.clone()),
                    name: None,
                    optional: None,
                    ..param.clone()
                };
                match dispatch(&named, scope, Context::Namespace, diagnostics)
                    .and_then(Generated::into_decl)
                {
                    Some(decl) => hoisted.push(decl),
                    None => return param.clone(),
                }
            }
            param.as_reference_to(&interface_name)
        })
        .collect()
}

/// Expand a namespace function into its overload declarations.
///
/// Hoisted parameter interfaces come first. A function named after a reserved word is
/// declared as `__name` and re-exported once under its own name.
pub fn expand_function(desc: &Descriptor, scope: &Scope<'_>, diagnostics: &mut Diagnostics) -> Vec<TsDecl> {
    let Some(desc) = apply_overrides(desc) else {
        return Vec::new();
    };
    let Some(name) = desc.identifier().map(str::to_string) else {
        diagnostics.error(
            Some(scope.namespace),
            GenerateError::MissingIdentifier {
                variant: "function",
                context: Context::Namespace,
            }
            .to_string(),
        );
        return Vec::new();
    };

    let infix = infix_optional_positions(desc.params());
    if infix.len() > MAX_INFIX_OPTIONAL {
        diagnostics.warn(
            Some(scope.namespace),
            format!(
                "function {name} has {} infix optional parameters, emitting only the full signature",
                infix.len()
            ),
        );
    }

    let mut output = Vec::new();
    let params: Cow<'_, [Descriptor]> = if infix.is_empty() {
        Cow::Borrowed(desc.params())
    } else {
        Cow::Owned(hoist_object_params(&name, desc.params(), scope, diagnostics, &mut output))
    };

    let extended: Vec<TsDecl>;
    let inner_scope = if output.is_empty() {
        *scope
    } else {
        extended = scope.defined.iter().chain(output.iter()).cloned().collect();
        Scope {
            defined: &extended,
            ..*scope
        }
    };

    let reserved = is_reserved_word(&name);
    let local_name = format!("__{name}");
    let mut overloads = 0usize;
    for variant in parameter_variants(&params) {
        match generate_signature(
            &desc,
            &variant,
            CallbackHandling::Consume,
            &inner_scope,
            Context::Namespace,
            diagnostics,
        ) {
            Ok(Generated::Decl(mut decl)) => {
                if reserved {
                    decl.name.clone_from(&local_name);
                    decl.export = false;
                }
                output.push(decl);
                overloads += 1;
            }
            Ok(_) => {}
            Err(err) => diagnostics.error(
                Some(scope.namespace),
                format!("failed to create function {name}: {err}"),
            ),
        }
    }

    if reserved && overloads > 0 {
        output.push(TsDecl::exported(name, DeclKind::ExportAlias { local: local_name }));
    }
    output
}

/// Expand an object method into its method signatures.
pub fn expand_method(desc: &Descriptor, scope: &Scope<'_>, diagnostics: &mut Diagnostics) -> Vec<TsMember> {
    let Some(desc) = apply_overrides(desc) else {
        return Vec::new();
    };

    parameter_variants(desc.params())
        .into_iter()
        .filter_map(|variant| {
            match generate_signature(
                &desc,
                &variant,
                CallbackHandling::Consume,
                scope,
                Context::Interface,
                diagnostics,
            ) {
                Ok(generated) => generated.into_member(),
                Err(err) => {
                    diagnostics.error(
                        Some(scope.namespace),
                        format!("failed to create method {}: {err}", desc.label()),
                    );
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// Events
// =============================================================================

fn listener_signature(
    event: &Descriptor,
    params: &[Descriptor],
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<TsType, GenerateError> {
    let generated = generate_signature(
        event,
        params,
        CallbackHandling::Keep,
        scope,
        Context::Inline,
        diagnostics,
    )?;
    Ok(generated
        .into_type()
        .unwrap_or_else(|| TsType::keyword(TsKeyword::Any)))
}

/// Listener type of an event. With a leading optional parameter before the first mandatory
/// one, this is a union of signatures, one per split point from the first optional to the
/// first mandatory position.
fn listener_type(
    event: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<TsType, GenerateError> {
    let params = event.params();
    let first_optional = params.iter().position(Descriptor::is_optional);
    let first_mandatory = params.iter().position(|p| !p.is_optional());

    let (start, end) = match (first_optional, first_mandatory) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return listener_signature(event, params, scope, diagnostics),
    };

    if event.has_extra_parameters() {
        return Err(GenerateError::ConflictingEventShapes {
            name: event.label(),
        });
    }

    let mut signatures = Vec::with_capacity(end - start + 1);
    for split in start..=end {
        let shifted: Vec<Descriptor> = params[split..end]
            .iter()
            .map(|p| p.with_optional(false))
            .chain(params[end..].iter().cloned())
            .collect();
        signatures.push(listener_signature(event, &shifted, scope, diagnostics)?);
    }
    Ok(TsType::Union(signatures))
}

fn listener_param(callback: &TsType) -> TsParam {
    TsParam::new("cb", callback.clone())
}

fn listener_method(name: &str, params: Vec<TsParam>, return_type: TsKeyword) -> TsMember {
    TsMember::Method(TsMethod {
        name: name.to_string(),
        params,
        return_type: TsType::keyword(return_type),
        doc: JsDoc::default(),
    })
}

/// `export const onX: WebExtEvent<Listener>`, or an inline listener object when the event
/// declares extra `addListener` parameters.
pub fn event_declaration(
    event: &Descriptor,
    scope: &Scope<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<TsDecl, GenerateError> {
    let name = event
        .identifier()
        .ok_or(GenerateError::MissingIdentifier {
            variant: "event",
            context: Context::Namespace,
        })?
        .to_string();

    let callback = listener_type(event, scope, diagnostics)?;

    let ty = match event.extra_parameters.as_deref() {
        Some(extra) if !extra.is_empty() => {
            let extra: Vec<&Descriptor> = extra.iter().collect();
            let (extra_params, _) = build_params(&extra, scope, diagnostics);
            let mut add_params = vec![listener_param(&callback)];
            add_params.extend(extra_params);
            TsType::Object(vec![
                listener_method("addListener", add_params, TsKeyword::Void),
                listener_method("removeListener", vec![listener_param(&callback)], TsKeyword::Void),
                listener_method("hasListener", vec![listener_param(&callback)], TsKeyword::Boolean),
            ])
        }
        _ => TsType::generic("WebExtEvent", vec![callback]),
    };

    Ok(TsDecl::exported(name, DeclKind::Const { ty }).with_doc(doc_for(event)))
}

/// Generate an event declaration, reporting failures. Overrides apply first.
pub fn generate_event(event: &Descriptor, scope: &Scope<'_>, diagnostics: &mut Diagnostics) -> Option<TsDecl> {
    let event = apply_overrides(event)?;
    match event_declaration(&event, scope, diagnostics) {
        Ok(decl) => Some(decl),
        Err(err) => {
            diagnostics.error(
                Some(scope.namespace),
                format!("error creating event typing for {}.{}: {err}", scope.namespace, event.label()),
            );
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::generator::test_support::{catalog_with, descriptor, scope};
    use crate::ts::Emit;

    fn params(value: Value) -> Vec<Descriptor> {
        serde_json::from_value(value).unwrap()
    }

    fn emit_all(decls: &[TsDecl]) -> String {
        decls.iter().map(|d| d.emit()).collect()
    }

    #[test]
    fn test_infix_positions() {
        let list = params(json!([
            {"name": "a", "optional": true},
            {"name": "b"},
            {"name": "c", "optional": true},
            {"name": "d"},
            {"name": "e", "optional": true}
        ]));
        assert_eq!(infix_optional_positions(&list), vec![0, 2]);
    }

    #[test]
    fn test_callback_is_not_a_later_mandatory_parameter() {
        let list = params(json!([
            {"name": "name", "optional": true},
            {"name": "callback", "type": "function"}
        ]));
        assert!(infix_optional_positions(&list).is_empty());
        assert_eq!(parameter_variants(&list).len(), 1);
    }

    #[test]
    fn test_variant_count_is_power_of_two() {
        for k in 0..5usize {
            let mut list = Vec::new();
            for i in 0..k {
                list.push(json!({"name": format!("opt{i}"), "type": "string", "optional": true}));
            }
            list.push(json!({"name": "last", "type": "string"}));
            let list = params(Value::Array(list));
            assert_eq!(parameter_variants(&list).len(), 1 << k);
        }
    }

    #[test]
    fn test_variants_cover_present_and_absent() {
        let list = params(json!([
            {"name": "a", "optional": true},
            {"name": "b", "optional": true},
            {"name": "c"},
            {"name": "d", "optional": true}
        ]));
        let shapes: Vec<Vec<(String, bool)>> = parameter_variants(&list)
            .iter()
            .map(|v| {
                v.iter()
                    .map(|p| (p.name.clone().unwrap(), p.is_optional()))
                    .collect()
            })
            .collect();

        let shape = |items: &[(&str, bool)]| -> Vec<(String, bool)> {
            items.iter().map(|(n, o)| ((*n).to_string(), *o)).collect()
        };
        assert_eq!(
            shapes,
            vec![
                shape(&[("a", false), ("b", false), ("c", false), ("d", true)]),
                shape(&[("c", false), ("d", true)]),
                shape(&[("a", false), ("c", false), ("d", true)]),
                shape(&[("b", false), ("c", false), ("d", true)]),
            ]
        );
    }

    #[test]
    fn test_expand_function_hoists_object_params() {
        let catalog = catalog_with(json!({"namespace": "windows"}));
        let scope = scope(&catalog, "windows", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({
            "name": "update",
            "type": "function",
            "async": true,
            "parameters": [
                {"name": "windowId", "type": "integer", "optional": true},
                {"name": "updateInfo", "type": "object", "properties": {"focused": {"type": "boolean", "optional": true}}}
            ]
        }));

        let decls = expand_function(&desc, &scope, &mut diagnostics);
        assert_eq!(
            emit_all(&decls),
            "export interface UpdateUpdateInfo {\n  focused?: boolean;\n}\n\
             export function update(windowId: number, updateInfo: UpdateUpdateInfo): Promise<void>;\n\
             export function update(updateInfo: UpdateUpdateInfo): Promise<void>;\n"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_no_hoisting_without_infix_optional() {
        let catalog = catalog_with(json!({"namespace": "alarms"}));
        let scope = scope(&catalog, "alarms", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({
            "name": "create",
            "type": "function",
            "parameters": [
                {"name": "name", "type": "string"},
                {"name": "alarmInfo", "type": "object", "properties": {"when": {"type": "number"}}}
            ]
        }));

        let decls = expand_function(&desc, &scope, &mut diagnostics);
        assert_eq!(decls.len(), 1);
        assert_eq!(
            decls[0].emit(),
            "export function create(name: string, alarmInfo: { when: number }): void;\n"
        );
    }

    #[test]
    fn test_reserved_word_function() {
        let catalog = catalog_with(json!({"namespace": "bookmarks"}));
        let scope = scope(&catalog, "bookmarks", &[]);
        let mut diagnostics = Diagnostics::new();
        let desc = descriptor(json!({
            "name": "delete",
            "type": "function",
            "parameters": [
                {"name": "options", "type": "string", "optional": true},
                {"name": "id", "type": "string"}
            ]
        }));

        let decls = expand_function(&desc, &scope, &mut diagnostics);
        assert_eq!(
            emit_all(&decls),
            "function __delete(options: string, id: string): void;\n\
             function __delete(id: string): void;\n\
             export { __delete as delete };\n"
        );
    }

    #[test]
    fn test_event_union_of_listeners() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let event = descriptor(json!({
            "name": "onThing",
            "type": "function",
            "parameters": [
                {"name": "info", "type": "string", "optional": true},
                {"name": "tabId", "type": "integer"}
            ]
        }));

        let decl = generate_event(&event, &scope, &mut diagnostics).unwrap();
        assert_eq!(
            decl.emit(),
            "export const onThing: WebExtEvent<((info: string, tabId: number) => void) | ((tabId: number) => void)>;\n"
        );
    }

    #[test]
    fn test_event_extra_parameters() {
        let catalog = catalog_with(json!({"namespace": "webRequest"}));
        let scope = scope(&catalog, "webRequest", &[]);
        let mut diagnostics = Diagnostics::new();
        let event = descriptor(json!({
            "name": "onCompleted",
            "type": "function",
            "parameters": [{"name": "details", "type": "object"}],
            "extraParameters": [{"name": "filter", "type": "string"}, {"name": "extra", "type": "string", "optional": true}]
        }));

        let decl = generate_event(&event, &scope, &mut diagnostics).unwrap();
        assert_eq!(
            decl.emit(),
            "export const onCompleted: { addListener(cb: (details: { [key: string]: any }) => void, filter: string, extra?: string): void; \
             removeListener(cb: (details: { [key: string]: any }) => void): void; \
             hasListener(cb: (details: { [key: string]: any }) => void): boolean };\n"
        );
    }

    #[test]
    fn test_event_conflicting_shapes_rejected() {
        let catalog = catalog_with(json!({"namespace": "tabs"}));
        let scope = scope(&catalog, "tabs", &[]);
        let mut diagnostics = Diagnostics::new();
        let event = descriptor(json!({
            "name": "onBoth",
            "type": "function",
            "parameters": [{"name": "a", "type": "string", "optional": true}, {"name": "b", "type": "string"}],
            "extraParameters": [{"name": "filter", "type": "string"}]
        }));

        assert!(generate_event(&event, &scope, &mut diagnostics).is_none());
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.entries()[0].message.contains("onBoth"));
    }

    #[test]
    fn test_on_message_external_send_response() {
        let catalog = catalog_with(json!({"namespace": "runtime"}));
        let scope = scope(&catalog, "runtime", &[]);
        let mut diagnostics = Diagnostics::new();
        let event = descriptor(json!({
            "name": "onMessageExternal",
            "type": "function",
            "parameters": [
                {"name": "message", "type": "any"},
                {"name": "sendResponse", "type": "function"}
            ]
        }));

        let decl = generate_event(&event, &scope, &mut diagnostics).unwrap();
        assert_eq!(
            decl.emit(),
            "export const onMessageExternal: WebExtEvent<(message: any, sendResponse: (response?: any) => void) => void>;\n"
        );
    }
}
