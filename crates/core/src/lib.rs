//! TypeScript declarations for WebExtension API schemas.
//!
//! The pipeline has three stages:
//!
//! 1. [`loader`] reads a directory of schema files and merges their namespace fragments into a
//!    [`SchemaCatalog`].
//! 2. [`assembler`] walks every namespace and maps each descriptor through the
//!    [`generator`] dispatcher into the declaration AST of [`ts`].
//! 3. [`ts::Emit`] prints the AST as a `.d.ts` file.
//!
//! Problems with individual nodes never abort a run. They are collected in [`Diagnostics`]
//! and returned next to the generated module.
//!
//! ```no_run
//! use std::path::Path;
//! use webext_typings_core::{GenerateOptions, generate_from_dir};
//!
//! let generation = generate_from_dir(Path::new("schemas"), &GenerateOptions::default())?;
//! println!("{}", generation.render());
//! # Ok::<(), webext_typings_core::LoadError>(())
//! ```

pub mod assembler;
pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod loader;
pub mod schema;
pub mod ts;

use std::path::Path;

pub use assembler::GenerateOptions;
pub use catalog::{NamespaceSchema, SchemaCatalog};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{GenerateError, LoadError};
pub use schema::Descriptor;
pub use ts::Emit;

use ts::TsModule;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The declaration file.
    pub module: TsModule,
    /// Everything reported while producing it.
    pub diagnostics: Diagnostics,
}

impl Generation {
    /// The declaration file text.
    pub fn render(&self) -> String {
        self.module.emit()
    }
}

/// Generate declarations for an already merged catalog.
pub fn generate(catalog: &SchemaCatalog, options: &GenerateOptions) -> Generation {
    let mut diagnostics = Diagnostics::new();
    let module = assembler::assemble(catalog, options, &mut diagnostics);
    Generation {
        module,
        diagnostics,
    }
}

/// Load a schema directory and generate declarations for it.
///
/// Diagnostics from loading come first in the returned collector.
pub fn generate_from_dir(dir: &Path, options: &GenerateOptions) -> Result<Generation, LoadError> {
    let mut diagnostics = Diagnostics::new();
    let catalog = loader::load_schema_dir(dir, &mut diagnostics)?;
    let mut generation = generate(&catalog, options);
    diagnostics.extend(generation.diagnostics);
    generation.diagnostics = diagnostics;
    Ok(generation)
}
