//! Generate Rust code from descriptions

use anyhow::{Context, Result};
use fsmgen_codegen::{CompileOptions, CompiledMachine, Compiler};
use fsmgen_core::Config;
use std::path::{Path, PathBuf};

/// Run the compile command
pub async fn run(
    config_path: &str,
    input: Option<&str>,
    output: Option<&str>,
    package: Option<&str>,
    force: bool,
) -> Result<()> {
    // A single input can be compiled outside a project
    let config = match Config::load(config_path) {
        Ok(config) => Some(config),
        Err(fsmgen_core::Error::ConfigNotFound { path }) if input.is_some() => {
            tracing::debug!("No configuration at {}, using defaults", path);
            None
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    let mut options = CompileOptions {
        package: package.map(String::from),
        force,
        ..Default::default()
    };
    if let Some(config) = &config {
        options.output_dir = config.output_dir();
        options.default_package = config.project.package.clone();
        options.runtime_crate = config.project.runtime_crate.clone();
    }

    match input {
        Some(input) => {
            let input = Path::new(input);
            let compiler = Compiler::new(options);
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(|| compiler.output_path_for(input));

            let compiled = compiler
                .compile_file(input, &output)
                .await
                .with_context(|| format!("Failed to compile {}", input.display()))?;
            report(&compiled);
        }
        None => {
            let Some(config) = config else {
                anyhow::bail!("No project configuration found");
            };
            if let Some(output) = output {
                options.output_dir = PathBuf::from(output);
            }
            let compiler = Compiler::new(options);
            let descriptions_dir = config.descriptions_dir();

            tracing::info!("Compiling all descriptions in {}", descriptions_dir.display());

            let results = compiler
                .compile_all(&descriptions_dir)
                .await
                .context("Failed to compile descriptions")?;

            tracing::info!("Compiled {} descriptions:", results.len());
            for compiled in &results {
                report(compiled);
            }
        }
    }

    tracing::info!("Compilation complete");
    Ok(())
}

fn report(compiled: &CompiledMachine) {
    let status = if compiled.was_written() {
        "written"
    } else {
        "unchanged"
    };
    tracing::info!(
        "  ✓ {} → {} ({}, hash: {}...)",
        compiled.name,
        compiled.output.display(),
        status,
        &compiled.hash[..8]
    );
}
