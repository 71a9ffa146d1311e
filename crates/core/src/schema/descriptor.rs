//! Schema descriptor structs for serde deserialization.
//!
//! A descriptor is one node of a WebExtension API schema: a type, a function, an event, a
//! parameter or a property. The same struct covers every variant; which variant a node is
//! gets decided by [`super::kind::classify`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `optional` marker used by the schema for "present but may be left out".
pub const OMIT_KEY_IF_MISSING: &str = "omit-key-if-missing";

/// Name of the parameter that the schema uses for completion callbacks.
pub const CALLBACK_PARAM: &str = "callback";

/// A single schema type node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// The type marker (`string`, `object`, `function`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Type name, for entries of a `types` list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Function, event, parameter or property name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Documentation, with schema markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Deprecation flag or note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,

    /// Not implemented by the browser; such nodes are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<bool>,

    /// Whether the node may be left out; see [`Descriptor::is_optional`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<Optionality>,

    /// Reference to another type, dotted for cross-namespace references.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Union choices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Descriptor>>,

    /// Compile-time constant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Enum choices. Only a string type turns them into a literal union.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_choices: Option<Vec<EnumChoice>>,

    /// Item type of an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Descriptor>>,

    /// Declared members of an object, in schema order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Descriptor>>,

    /// Members keyed by a regular expression over property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<IndexMap<String, Descriptor>>,

    /// Type of properties not otherwise declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    /// Methods of an object type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<Descriptor>>,

    /// Host class an object is an instance of (`Blob`, `ImageData`).
    #[serde(alias = "instanceOf", skip_serializing_if = "Option::is_none")]
    pub is_instance_of: Option<String>,

    /// Parameters of a function or event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Descriptor>>,

    /// Extra `addListener` parameters of an event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_parameters: Option<Vec<Descriptor>>,

    /// Synchronous return type of a function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<Box<Descriptor>>,

    /// Whether the function completes asynchronously.
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub asynchronous: Option<Asynchrony>,

    /// Every other key (`postprocess`, `allowedContexts`, `minimum`, ...), kept for override matching.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `deprecated` is either a flag or a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deprecation {
    /// `deprecated: true`
    Flag(bool),
    /// A note pointing at the replacement
    Message(String),
}

/// `optional` is a flag or the `"omit-key-if-missing"` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Optionality {
    /// `optional: true` or `false`
    Flag(bool),
    /// A string marker, usually `"omit-key-if-missing"`
    Marker(String),
}

/// `async` is a flag or the name of the parameter that receives the result (`"callback"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asynchrony {
    /// `async: true`
    Flag(bool),
    /// `async: "callback"`
    Named(String),
}

/// An enum choice is a bare string or a documented `{name, description}` pair. Integer
/// enums and other odd values land in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumChoice {
    /// `"normal"`
    Plain(String),
    /// `{"name": "popup", "description": "..."}`
    Named {
        /// The string value
        name: String,
        /// Documentation of this choice
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Anything else, e.g. `0` in an integer enum
    Other(Value),
}

impl EnumChoice {
    /// The string value, `None` for a non-string choice.
    pub fn value(&self) -> Option<&str> {
        match self {
            EnumChoice::Plain(value) => Some(value),
            EnumChoice::Named { name, .. } => Some(name),
            EnumChoice::Other(_) => None,
        }
    }

    /// Documentation of a `Named` choice.
    pub fn description(&self) -> Option<&str> {
        match self {
            EnumChoice::Named { description, .. } => description.as_deref(),
            EnumChoice::Plain(_) | EnumChoice::Other(_) => None,
        }
    }
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows any value, `false` none
    Bool(bool),
    /// Every extra property has this type
    Schema(Box<Descriptor>),
}

// =============================================================================
// Trait predicates
// =============================================================================

impl Descriptor {
    /// Whether an `id` is present.
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Whether a `name` is present.
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Whether a `description` is present.
    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }

    /// Both `true` and `"omit-key-if-missing"` count as optional.
    pub fn is_optional(&self) -> bool {
        match &self.optional {
            Some(Optionality::Flag(flag)) => *flag,
            Some(Optionality::Marker(marker)) => marker == OMIT_KEY_IF_MISSING,
            None => false,
        }
    }

    /// `deprecated: true` or a deprecation message.
    pub fn is_deprecated(&self) -> bool {
        matches!(
            self.deprecated,
            Some(Deprecation::Flag(true) | Deprecation::Message(_))
        )
    }

    /// Only an explicit `unsupported: true` counts.
    pub fn is_unsupported(&self) -> bool {
        self.unsupported == Some(true)
    }

    /// Whether a parameter list is declared, even an empty one.
    pub fn has_parameters(&self) -> bool {
        self.parameters.is_some()
    }

    /// Whether at least one extra listener parameter is declared.
    pub fn has_extra_parameters(&self) -> bool {
        self.extra_parameters.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Whether a `returns` descriptor is declared.
    pub fn has_return(&self) -> bool {
        self.returns.is_some()
    }

    /// `async: true` or `async: "callback"`.
    pub fn is_async(&self) -> bool {
        match &self.asynchronous {
            Some(Asynchrony::Flag(flag)) => *flag,
            Some(Asynchrony::Named(name)) => name == CALLBACK_PARAM,
            None => false,
        }
    }

    /// Whether this is the completion callback parameter of a function.
    pub fn is_callback_param(&self) -> bool {
        self.name.as_deref() == Some(CALLBACK_PARAM)
    }

    /// The declaration name: `name` when present, otherwise `id`.
    pub fn identifier(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    /// The deprecation note; an empty string for a bare `deprecated: true`.
    pub fn deprecation_message(&self) -> Option<&str> {
        match &self.deprecated {
            Some(Deprecation::Flag(true)) => Some(""),
            Some(Deprecation::Message(message)) => Some(message),
            _ => None,
        }
    }

    /// The declared parameters, empty when absent.
    pub fn params(&self) -> &[Descriptor] {
        self.parameters.as_deref().unwrap_or_default()
    }

    /// A copy of this descriptor with a different `optional` flag.
    pub fn with_optional(&self, optional: bool) -> Descriptor {
        Descriptor {
            optional: Some(Optionality::Flag(optional)),
            ..self.clone()
        }
    }

    /// A reference descriptor pointing at `target`, keeping this node's name and traits.
    pub fn as_reference_to(&self, target: &str) -> Descriptor {
        Descriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            deprecated: self.deprecated.clone(),
            optional: self.optional.clone(),
            reference: Some(target.to_string()),
            ..Descriptor::default()
        }
    }

    /// Short human-readable label used in diagnostics.
    pub fn label(&self) -> String {
        if let Some(ident) = self.identifier() {
            return ident.to_string();
        }
        match serde_json::to_string(self) {
            Ok(json) if json.len() > 80 => format!("{}...", json.chars().take(77).collect::<String>()),
            Ok(json) => json,
            Err(_) => "<unknown>".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
