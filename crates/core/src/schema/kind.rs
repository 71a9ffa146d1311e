//! Variant classification.
//!
//! Several predicates can hold for one descriptor at once (an enum string with an id, a
//! function with a `value`), so classification walks a fixed priority list and the first
//! match wins.

use std::fmt;

use serde_json::Value;

use super::descriptor::{Descriptor, EnumChoice};

/// The variant a descriptor resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescriptorKind<'a> {
    /// `type: "null"`
    Null,
    /// `type: "any"`
    Any,
    /// `type: "function"`
    Function,
    /// `type: "array"` with its item type
    Array(&'a Descriptor),
    /// `choices`
    Union(&'a [Descriptor]),
    /// `$ref`, possibly dotted
    Reference(&'a str),
    /// `type: "string"` without `enum`
    String,
    /// `type: "string"` with `enum`
    EnumString(&'a [EnumChoice]),
    /// `type: "boolean"`
    Boolean,
    /// `type: "object"`
    Object,
    /// `type: "integer"`
    Integer,
    /// `type: "number"`
    Number,
    /// Untyped node carrying a `value`
    StaticValue(&'a Value),
}

impl DescriptorKind<'_> {
    /// Variant name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Null => "null",
            DescriptorKind::Any => "any",
            DescriptorKind::Function => "function",
            DescriptorKind::Array(_) => "array",
            DescriptorKind::Union(_) => "union",
            DescriptorKind::Reference(_) => "reference",
            DescriptorKind::String => "string",
            DescriptorKind::EnumString(_) => "enum-string",
            DescriptorKind::Boolean => "boolean",
            DescriptorKind::Object => "object",
            DescriptorKind::Integer => "integer",
            DescriptorKind::Number => "number",
            DescriptorKind::StaticValue(_) => "static-value",
        }
    }

    /// Variants a namespace-level property may take.
    pub fn is_constant_like(&self) -> bool {
        matches!(
            self,
            DescriptorKind::Array(_)
                | DescriptorKind::Boolean
                | DescriptorKind::EnumString(_)
                | DescriptorKind::Integer
                | DescriptorKind::Number
                | DescriptorKind::Object
                | DescriptorKind::Reference(_)
                | DescriptorKind::StaticValue(_)
                | DescriptorKind::String
        )
    }
}

impl fmt::Display for DescriptorKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a descriptor: null, any, function, array, union, reference, string, boolean,
/// object, integer/number, static value. `None` when nothing matches.
pub fn classify(desc: &Descriptor) -> Option<DescriptorKind<'_>> {
    let kind = desc.kind.as_deref();

    if kind == Some("null") {
        return Some(DescriptorKind::Null);
    }
    if kind == Some("any") {
        return Some(DescriptorKind::Any);
    }
    if kind == Some("function") {
        return Some(DescriptorKind::Function);
    }
    if kind == Some("array")
        && let Some(items) = &desc.items
    {
        return Some(DescriptorKind::Array(items));
    }
    if let Some(choices) = &desc.choices {
        return Some(DescriptorKind::Union(choices));
    }
    if let Some(reference) = &desc.reference {
        return Some(DescriptorKind::Reference(reference));
    }
    if kind == Some("string") {
        return Some(match &desc.enum_choices {
            Some(choices) => DescriptorKind::EnumString(choices),
            None => DescriptorKind::String,
        });
    }
    if kind == Some("boolean") {
        return Some(DescriptorKind::Boolean);
    }
    if kind == Some("object") {
        return Some(DescriptorKind::Object);
    }
    if kind == Some("integer") {
        return Some(DescriptorKind::Integer);
    }
    if kind == Some("number") {
        return Some(DescriptorKind::Number);
    }
    desc.value.as_ref().map(DescriptorKind::StaticValue)
}
