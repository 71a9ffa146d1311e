use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use webext_typings_core::{Diagnostics, GenerateOptions, Severity, generate_from_dir};

/// Exit code when `--strict` is set and error diagnostics were produced.
pub const STRICT_FAILURE: i32 = 2;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Directory holding the schema JSON files
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dir: PathBuf,
    /// Declaration file to write
    #[arg(long = "outfile", value_name = "FILE")]
    pub outfile: PathBuf,
    /// Create missing output directories
    #[arg(long)]
    pub force: bool,
    /// Ambient namespace holding every API
    #[arg(long = "root-namespace", default_value = "messenger")]
    pub root_namespace: String,
    /// Second global re-exporting every API, e.g. `browser`
    #[arg(long = "alias-namespace")]
    pub alias_namespace: Option<String>,
    /// Schema namespace to leave out (repeatable)
    #[arg(long = "ignore-namespace", value_name = "NAMESPACE")]
    pub ignore_namespace: Vec<String>,
    /// Exit with a failure code when any error diagnostic was reported
    #[arg(long)]
    pub strict: bool,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            root_namespace: self.root_namespace.clone(),
            alias_namespace: self.alias_namespace.clone(),
            ignored_namespaces: self.ignore_namespace.clone(),
            ..GenerateOptions::default()
        }
    }
}

pub fn run(args: GenerateArgs) -> i32 {
    match generate_declarations(&args) {
        Ok(diagnostics) => {
            println!("{}", summary(&args.outfile, &diagnostics));
            if args.strict && diagnostics.has_errors() {
                STRICT_FAILURE
            } else {
                0
            }
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn generate_declarations(args: &GenerateArgs) -> Result<Diagnostics, String> {
    ensure_output_dir(&args.outfile, args.force)?;

    let generation = generate_from_dir(&args.schema_dir, &args.options()).map_err(|err| err.to_string())?;
    let declarations = generation.render();

    fs::write(&args.outfile, &declarations).map_err(|err| {
        format!(
            "Failed to write declarations to {}: {err}",
            args.outfile.display()
        )
    })?;

    info!(
        outfile = %args.outfile.display(),
        bytes = declarations.len(),
        "Declarations written."
    );
    Ok(generation.diagnostics)
}

fn ensure_output_dir(outfile: &Path, force: bool) -> Result<(), String> {
    let Some(parent) = outfile.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    if !force {
        return Err(format!(
            "Output directory {} does not exist, use --force to create it",
            parent.display()
        ));
    }

    debug!(dir = %parent.display(), "Creating output directory.");
    fs::create_dir_all(parent)
        .map_err(|err| format!("Failed to create output directory {}: {err}", parent.display()))
}

fn summary(outfile: &Path, diagnostics: &Diagnostics) -> String {
    let warnings = diagnostics.warning_count();
    let errors = diagnostics.error_count();
    let mut line = format!(
        "Wrote {} ({warnings} warning{}, {errors} error{})",
        outfile.display(),
        if warnings == 1 { "" } else { "s" },
        if errors == 1 { "" } else { "s" },
    );
    if let Some(first) = diagnostics.iter().find(|d| d.severity == Severity::Error) {
        line.push_str(&format!("\nfirst error: {first}"));
    }
    line
}
