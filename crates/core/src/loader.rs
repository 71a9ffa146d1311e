//! Schema directory reader.
//!
//! Reads every `*.json` file directly inside a directory (no recursion) in file-name order
//! and merges the namespace fragments it contains into a [`SchemaCatalog`].

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::catalog::SchemaCatalog;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;

/// Drop `//` comment lines, which upstream schema files use for license headers.
pub fn strip_line_comments(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse one schema file's contents and merge its fragments.
///
/// Returns the number of accepted fragments. Malformed files are reported and contribute
/// nothing.
pub fn merge_schema_source(
    catalog: &mut SchemaCatalog,
    source: &str,
    file_name: &str,
    diagnostics: &mut Diagnostics,
) -> usize {
    let parsed: Value = match serde_json::from_str(&strip_line_comments(source)) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.error(None, format!("failed to parse schema {file_name}: {err}"));
            return 0;
        }
    };

    let Value::Array(fragments) = parsed else {
        diagnostics.error(None, format!("schema in {file_name} is not an array"));
        return 0;
    };

    fragments
        .into_iter()
        .map(|fragment| catalog.merge_value(fragment, file_name, diagnostics))
        .filter(|accepted| *accepted)
        .count()
}

/// Load and merge every schema file of a directory.
pub fn load_schema_dir(dir: &Path, diagnostics: &mut Diagnostics) -> Result<SchemaCatalog, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.to_path_buf()));
    }

    let mut catalog = SchemaCatalog::new();
    let mut files = 0usize;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name().to_string_lossy();
        let accepted = merge_schema_source(&mut catalog, &source, &file_name, diagnostics);
        debug!(file = %file_name, fragments = accepted, "Loaded schema file");
        files += 1;
    }

    info!(
        files,
        namespaces = catalog.len(),
        dir = %dir.display(),
        "Loaded schema catalog"
    );
    Ok(catalog)
}
