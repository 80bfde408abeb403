//! Validate descriptions command

use anyhow::{Context, Result};
use fsmgen_codegen::compiler::discover;
use fsmgen_codegen::{GenerateOptions, Generator, Parser};
use fsmgen_core::{Config, validate};
use std::path::PathBuf;

/// Run the validate command
pub async fn run(config_path: &str, input: Option<&str>) -> Result<()> {
    // A single input can be validated outside a project
    let config = match Config::load(config_path) {
        Ok(config) => Some(config),
        Err(fsmgen_core::Error::ConfigNotFound { path }) if input.is_some() => {
            tracing::debug!("No configuration at {}, using defaults", path);
            None
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    let inputs = match (input, &config) {
        (Some(input), _) => vec![PathBuf::from(input)],
        (None, Some(config)) => {
            tracing::info!("Validating project: {}", config_path);
            let dir = config.descriptions_dir();
            discover(&dir)
                .with_context(|| format!("Failed to read descriptions in {}", dir.display()))?
        }
        (None, None) => anyhow::bail!("No project configuration found"),
    };

    // Run the generator too, so validate rejects whatever compile would
    let mut options = GenerateOptions::default();
    if let Some(config) = &config {
        options.default_package = config.project.package.clone();
        options.runtime_crate = config.project.runtime_crate.clone();
    }
    let generator = Generator::with_options(options);

    let parser = Parser::new();
    let mut failed = 0;

    for path in &inputs {
        let desc = match parser.parse_file(path) {
            Ok(desc) => desc,
            Err(e) => {
                failed += 1;
                tracing::error!("✗ {}: {}", path.display(), e);
                continue;
            }
        };

        let machine = match validate(&desc) {
            Ok(machine) => machine,
            Err(diagnostics) => {
                failed += 1;
                tracing::error!("✗ {} ({}): {} problems", desc.name, path.display(), diagnostics.len());
                for diagnostic in &diagnostics {
                    tracing::error!("  - {}", diagnostic);
                }
                continue;
            }
        };

        if let Err(e) = generator.generate(&machine) {
            failed += 1;
            tracing::error!("✗ {} ({}): {}", machine.name, path.display(), e);
            continue;
        }

        tracing::info!(
            "✓ {} ({} states, {} events, {} transitions)",
            machine.name,
            machine.states.len(),
            machine.events.len(),
            machine.transition_count()
        );
    }

    if failed > 0 {
        anyhow::bail!("{} of {} descriptions failed validation", failed, inputs.len());
    }

    tracing::info!("✓ {} descriptions are valid", inputs.len());
    Ok(())
}
