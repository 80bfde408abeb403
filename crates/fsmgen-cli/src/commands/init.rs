//! Initialize a new fsmgen project

use anyhow::Result;
use fsmgen_core::config::CONFIG_FILE;
use std::fs;
use std::path::Path;

const EXAMPLE_MACHINE: &str = r#"# Example state machine
#
# Callbacks without an `iface` are free functions in the module that
# includes the generated code:
#
#   fn onRunning(event: Event, state: State) -> Result<(), fsmgen_runtime::BoxError>
name: Runner
init: idle
states:
  - name: idle
    transitions:
      - event: start
        to: running
  - name: running
    on: onRunning
    transitions:
      - event: stop
        to: idle
"#;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    // Get absolute path for deriving name
    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new fsmgen project: {}", project_name);

    fs::create_dir_all(project_dir.join("machines"))?;

    let config = format!(
        r#"# fsmgen project configuration
name: {project_name}

# Where descriptions are read from and generated code is written to
descriptions: machines
output: src/generated

# Module wrapping generated code for descriptions that name no package
# package: machines

# Crate path generated code uses for runtime types
runtime_crate: fsmgen_runtime
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;
    fs::write(project_dir.join("machines/example.yaml"), EXAMPLE_MACHINE)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  fsmgen validate    # Check descriptions");
    tracing::info!("  fsmgen compile     # Generate Rust code");

    Ok(())
}
