//! Namespace catalog built by merging schema fragments.
//!
//! Fragments that declare the same namespace are concatenated into one entry, in the order
//! they are merged. Namespaces keep the order of their first appearance.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::schema::Descriptor;

/// One namespace entry of a schema file, with every entry already deserialized.
#[derive(Debug, Clone, Default)]
pub struct NamespaceFragment {
    /// Namespace the entries belong to; a fragment without one is rejected.
    pub namespace: Option<String>,
    /// Namespace documentation.
    pub description: Option<String>,
    /// Type declarations.
    pub types: Vec<Descriptor>,
    /// Namespace functions.
    pub functions: Vec<Descriptor>,
    /// Namespace events.
    pub events: Vec<Descriptor>,
    /// Namespace-level properties, keyed by name.
    pub properties: IndexMap<String, Descriptor>,
    /// Manifest permissions guarding the namespace.
    pub permissions: Vec<String>,
}

/// A fragment as written on disk. Entries stay raw JSON until [`SchemaCatalog::merge_value`]
/// converts them one at a time.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFragment {
    namespace: Option<String>,
    description: Option<String>,
    #[serde(default)]
    types: Vec<Value>,
    #[serde(default)]
    functions: Vec<Value>,
    #[serde(default)]
    events: Vec<Value>,
    #[serde(default)]
    properties: IndexMap<String, Value>,
    #[serde(default)]
    permissions: Vec<String>,
}

/// Deserialize each entry of one fragment section, skipping the ones that do not fit the
/// descriptor model.
fn convert_entries(
    entries: Vec<Value>,
    section: &str,
    namespace: &str,
    source_file: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<Descriptor> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let label = entry_label(&entry, index);
            convert_entry(entry, section, &label, namespace, source_file, diagnostics)
        })
        .collect()
}

fn convert_entry(
    entry: Value,
    section: &str,
    label: &str,
    namespace: &str,
    source_file: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Descriptor> {
    match serde_json::from_value(entry) {
        Ok(desc) => Some(desc),
        Err(err) => {
            diagnostics.error(
                Some(namespace),
                format!("skipping invalid {section} entry {label} in {source_file}: {err}"),
            );
            None
        }
    }
}

fn entry_label(entry: &Value, index: usize) -> String {
    entry
        .get("id")
        .or_else(|| entry.get("name"))
        .and_then(Value::as_str)
        .map_or_else(|| format!("#{index}"), |ident| format!("'{ident}'"))
}

fn missing_namespace(source_file: &str, diagnostics: &mut Diagnostics) -> bool {
    diagnostics.error(None, format!("schema in {source_file} does not have a namespace"));
    false
}

/// Merged view of one namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceSchema {
    /// Namespace name, possibly dotted (`devtools.panels`).
    pub name: String,
    /// Description of the first fragment that had one.
    pub description: Option<String>,
    /// Type declarations of every fragment, in merge order.
    pub types: Vec<Descriptor>,
    /// Functions of every fragment, in merge order.
    pub functions: Vec<Descriptor>,
    /// Events of every fragment, in merge order.
    pub events: Vec<Descriptor>,
    /// Properties; the first definition of a key wins.
    pub properties: IndexMap<String, Descriptor>,
    /// Manifest permissions of every fragment.
    pub permissions: Vec<String>,
    /// File that first declared the namespace.
    pub source_file: Option<String>,
}

impl NamespaceSchema {
    /// Find a declared type by id.
    pub fn find_type(&self, id: &str) -> Option<&Descriptor> {
        self.types.iter().find(|t| t.id.as_deref() == Some(id))
    }

    /// Whether a type with this id is declared.
    pub fn has_type(&self, id: &str) -> bool {
        self.find_type(id).is_some()
    }
}

/// Mapping from namespace name to its merged schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    namespaces: IndexMap<String, NamespaceSchema>,
}

impl SchemaCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize and merge one raw fragment. Returns whether it was accepted.
    ///
    /// A fragment whose outer shape is wrong is rejected whole. An entry that does not fit
    /// the descriptor model is reported and skipped, and its siblings are kept.
    pub fn merge_value(&mut self, value: Value, source_file: &str, diagnostics: &mut Diagnostics) -> bool {
        let raw = match serde_json::from_value::<RawFragment>(value) {
            Ok(raw) => raw,
            Err(err) => {
                diagnostics.error(None, format!("invalid schema fragment in {source_file}: {err}"));
                return false;
            }
        };
        let Some(namespace) = raw.namespace else {
            return missing_namespace(source_file, diagnostics);
        };

        let types = convert_entries(raw.types, "type", &namespace, source_file, diagnostics);
        let functions = convert_entries(raw.functions, "function", &namespace, source_file, diagnostics);
        let events = convert_entries(raw.events, "event", &namespace, source_file, diagnostics);
        let mut properties = IndexMap::with_capacity(raw.properties.len());
        for (key, entry) in raw.properties {
            let label = format!("'{key}'");
            if let Some(desc) = convert_entry(entry, "property", &label, &namespace, source_file, diagnostics) {
                properties.insert(key, desc);
            }
        }

        let fragment = NamespaceFragment {
            namespace: Some(namespace),
            description: raw.description,
            types,
            functions,
            events,
            properties,
            permissions: raw.permissions,
        };
        self.merge_fragment(fragment, source_file, diagnostics)
    }

    /// Merge a fragment into the catalog. Returns whether it was accepted.
    pub fn merge_fragment(
        &mut self,
        fragment: NamespaceFragment,
        source_file: &str,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let Some(name) = fragment.namespace else {
            return missing_namespace(source_file, diagnostics);
        };

        match self.namespaces.entry(name.clone()) {
            Entry::Vacant(slot) => {
                debug!(namespace = %name, source_file, "Adding namespace");
                slot.insert(NamespaceSchema {
                    name,
                    description: fragment.description,
                    types: fragment.types,
                    functions: fragment.functions,
                    events: fragment.events,
                    properties: fragment.properties,
                    permissions: fragment.permissions,
                    source_file: Some(source_file.to_string()),
                });
            }
            Entry::Occupied(mut slot) => {
                debug!(namespace = %name, source_file, "Merging namespace");
                let entry = slot.get_mut();
                entry.types.extend(fragment.types);
                entry.functions.extend(fragment.functions);
                entry.events.extend(fragment.events);
                entry.permissions.extend(fragment.permissions);
                if entry.description.is_none() {
                    entry.description = fragment.description;
                }
                for (key, property) in fragment.properties {
                    if entry.properties.contains_key(&key) {
                        diagnostics.warn(
                            Some(&name),
                            format!("duplicate property '{key}' in {source_file}, keeping the first definition"),
                        );
                    } else {
                        entry.properties.insert(key, property);
                    }
                }
            }
        }
        true
    }

    /// The merged schema of a namespace.
    pub fn get(&self, namespace: &str) -> Option<&NamespaceSchema> {
        self.namespaces.get(namespace)
    }

    /// Whether any fragment declared this namespace.
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Namespaces in first-appearance order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceSchema> {
        self.namespaces.values()
    }

    /// Namespace names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Number of namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Whether no namespace was merged.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Whether `namespace` declares a type with this id.
    pub fn has_type(&self, namespace: &str, id: &str) -> bool {
        self.get(namespace).is_some_and(|ns| ns.has_type(id))
    }
}
