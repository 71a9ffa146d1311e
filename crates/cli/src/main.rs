//! `webext-typings`: write a TypeScript declaration file for a directory of WebExtension schemas.

#![forbid(unsafe_code)]

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod generate;

#[derive(Parser, Debug)]
#[command(
    name = "webext-typings",
    version,
    about = "Generate TypeScript declarations from WebExtension API schemas"
)]
struct Cli {
    #[command(flatten)]
    generate: generate::GenerateArgs,
}

fn main() {
    init_tracing();
    let code = match Cli::try_parse() {
        Ok(cli) => generate::run(cli.generate),
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    };
    std::process::exit(code);
}

/// Crate targets that a plain level such as `debug` applies to.
const LOG_TARGETS: [&str; 2] = ["webext_typings", "webext_typings_core"];

fn init_tracing() {
    // WEBEXT_TYPINGS_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "webext_typings_core::loader=debug"
    let filter = match std::env::var("WEBEXT_TYPINGS_LOG") {
        Ok(level) if is_plain_level(&level) => scoped_filter(&level),
        Ok(spec) => spec,
        Err(_) => scoped_filter("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn scoped_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
