//! Common utilities for declaration generation.
//!
//! Identifier rules, the reserved-word table and doc-comment sanitizing shared by the
//! generators and the printer.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// TypeScript reserved words that cannot be used as declaration names.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
    ]
    .into_iter()
    .collect()
});

/// Check whether a name collides with a reserved word.
pub fn is_reserved_word(name: &str) -> bool {
    TS_RESERVED_WORDS.contains(name)
}

/// How a schema-provided name can be written as a property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierTreatment {
    /// Usable verbatim: `^[A-Za-z_$][A-Za-z0-9_$]*$`
    Valid,
    /// Needs quoting: `"foo-bar"`
    Quoted,
}

/// Classify a property name.
pub fn identifier_treatment(name: &str) -> IdentifierTreatment {
    if needs_bracket_notation(name) {
        IdentifierTreatment::Quoted
    } else {
        IdentifierTreatment::Valid
    }
}

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes, double quotes and line breaks.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Quote a string if needed for use as a property key.
pub fn quote_if_needed(name: &str) -> String {
    match identifier_treatment(name) {
        IdentifierTreatment::Valid => name.to_string(),
        IdentifierTreatment::Quoted => format!("\"{}\"", escape_js_string(name)),
    }
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Join words, capitalizing each: `("create", "alarmInfo")` -> `CreateAlarmInfo`.
pub fn pascal_case(words: &[&str]) -> String {
    words.iter().map(|w| capitalize_first(w)).collect()
}

static VAR_OR_CODE_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"</?(?:var|code)>").ok());
static EM_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"</?em>").ok());
static REF_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\(ref:([a-zA-Z.0-9]+)\)").ok());
static ANCHOR_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"<a href=['"]?(https://[a-zA-Z0-9./\-_#]+)['"]?[^>]*>([^<]*)</a>"#).ok()
});

fn replace_markup(pattern: &Option<Regex>, text: &str, replacement: &str) -> String {
    match pattern {
        Some(re) => re.replace_all(text, replacement).into_owned(),
        None => text.to_string(),
    }
}

/// Turn schema description markup into JSDoc-friendly text.
pub fn sanitize_description(description: &str) -> String {
    let text = replace_markup(&VAR_OR_CODE_TAG, description, "`");
    let text = replace_markup(&EM_TAG, &text, "_");
    let text = replace_markup(&REF_MARKER, &text, "{@link $1}");
    let text = replace_markup(&ANCHOR_TAG, &text, "{@link $1|$2}");
    text.replace("*/", "*\\/")
}
