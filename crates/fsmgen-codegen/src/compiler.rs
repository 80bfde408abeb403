//! Description compiler
//!
//! Drives parse → validate → generate for files and directories, and writes
//! the generated Rust next to a hash of its inputs so unchanged descriptions
//! are not rewritten.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use fsmgen_core::{Description, validate};

use crate::error::{Error, Result};
use crate::generator::{DEFAULT_RUNTIME_CRATE, GenerateOptions, Generator, HASH_MARKER};
use crate::parser::{Format, Parser};

/// Options for the compiler
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Output directory for generated files
    pub output_dir: PathBuf,

    /// Package overriding the one in each description
    pub package: Option<String>,

    /// Package for descriptions that do not name one
    pub default_package: Option<String>,

    /// Crate path generated code uses for runtime types
    pub runtime_crate: String,

    /// Whether to skip the hash check and always rewrite
    pub force: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("src/generated"),
            package: None,
            default_package: None,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            force: false,
        }
    }
}

/// Description compiler
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompileOptions,
    parser: Parser,
}

impl Compiler {
    /// Create a new compiler with the given options
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            parser: Parser::new(),
        }
    }

    /// The options in use
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Validate a description and generate its source, without touching disk
    pub fn compile_description(&self, desc: &Description) -> Result<String> {
        self.generate(desc, None)
    }

    /// Hash identifying a description together with the options that shape
    /// its output
    pub fn content_hash(&self, desc: &Description) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
        hasher.update([0]);
        hasher.update(serde_json::to_vec(desc)?);
        hasher.update([0]);
        hasher.update(self.options.package.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0]);
        hasher.update(self.options.default_package.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0]);
        hasher.update(self.options.runtime_crate.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Where [`Compiler::compile_all`] writes the output for `input`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "machine".to_string());
        self.options.output_dir.join(format!("{}.rs", stem))
    }

    /// Compile one description file to `output`
    pub async fn compile_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CompiledMachine> {
        let input = input.as_ref();
        let output = output.as_ref();
        tracing::info!("Compiling description: {}", input.display());

        let format = Parser::format_of(input)?;
        let content = tokio::fs::read_to_string(input).await?;
        let desc = self.parser.parse_str(&content, format)?;

        let hash = self.content_hash(&desc)?;

        if !self.options.force {
            if let Some(existing) = read_source_hash(output).await {
                if existing == hash {
                    tracing::debug!("Up to date: {}", output.display());
                    return Ok(CompiledMachine {
                        name: desc.name,
                        input: input.to_path_buf(),
                        output: output.to_path_buf(),
                        hash,
                        status: CompileStatus::Unchanged,
                    });
                }
            }
        }

        let source = self.generate(&desc, Some(hash.clone()))?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, &source).await?;

        tracing::info!("Wrote {} ({} bytes)", output.display(), source.len());

        Ok(CompiledMachine {
            name: desc.name,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            hash,
            status: CompileStatus::Written,
        })
    }

    /// Compile every description in a directory into the output directory
    pub async fn compile_all(&self, descriptions_dir: impl AsRef<Path>) -> Result<Vec<CompiledMachine>> {
        let inputs = discover(descriptions_dir.as_ref())?;

        let mut outputs = BTreeSet::new();
        for input in &inputs {
            let output = self.output_path_for(input);
            if !outputs.insert(output.clone()) {
                return Err(Error::GenerationError(format!(
                    "more than one description compiles to {}",
                    output.display()
                )));
            }
        }

        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let output = self.output_path_for(&input);
            results.push(self.compile_file(&input, &output).await?);
        }

        Ok(results)
    }

    fn generate(&self, desc: &Description, source_hash: Option<String>) -> Result<String> {
        let machine = validate(desc).map_err(|diagnostics| Error::InvalidDescription {
            machine: desc.name.clone(),
            diagnostics,
        })?;

        let generator = Generator::with_options(GenerateOptions {
            package: self.options.package.clone(),
            default_package: self.options.default_package.clone(),
            runtime_crate: self.options.runtime_crate.clone(),
            source_hash,
        });
        generator.generate(&machine)
    }
}

/// Description files under `dir`, sorted by path
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && Format::from_path(entry.path()).is_some() {
            inputs.push(entry.into_path());
        }
    }
    inputs.sort();
    Ok(inputs)
}

async fn read_source_hash(path: &Path) -> Option<String> {
    let existing = tokio::fs::read_to_string(path).await.ok()?;
    existing
        .lines()
        .take(3)
        .find_map(|line| line.strip_prefix(HASH_MARKER))
        .map(|hash| hash.trim().to_string())
}

/// Whether a compile wrote its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    /// Output was generated and written
    Written,
    /// Output already carried the same source hash
    Unchanged,
}

/// Result of compiling one description file
#[derive(Debug, Clone)]
pub struct CompiledMachine {
    /// Machine name
    pub name: String,

    /// Description file
    pub input: PathBuf,

    /// Generated file
    pub output: PathBuf,

    /// Source hash recorded in the output header
    pub hash: String,

    /// Whether the output was rewritten
    pub status: CompileStatus,
}

impl CompiledMachine {
    /// Whether the output was rewritten
    pub fn was_written(&self) -> bool {
        self.status == CompileStatus::Written
    }
}
