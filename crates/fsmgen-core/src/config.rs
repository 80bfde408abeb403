//! Project configuration
//!
//! A project is a directory with an `fsmgen.yaml` file naming where the
//! state machine descriptions live and where generated code goes.
//!
//! ```yaml
//! name: my-project
//! descriptions: machines
//! output: src/generated
//! package: ~
//! runtime_crate: fsmgen_runtime
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ident::is_valid_identifier;

/// File name looked up when a directory is given to [`Config::load`]
pub const CONFIG_FILE: &str = "fsmgen.yaml";

/// Root project configuration from `fsmgen.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Directory holding description files, relative to the project
    #[serde(default = "default_descriptions")]
    pub descriptions: String,

    /// Directory generated code is written to, relative to the project
    #[serde(default = "default_output")]
    pub output: String,

    /// Package applied to descriptions that do not name one
    #[serde(default)]
    pub package: Option<String>,

    /// Crate path generated code uses for runtime types
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,
}

fn default_descriptions() -> String {
    "machines".to_string()
}

fn default_output() -> String {
    "src/generated".to_string()
}

fn default_runtime_crate() -> String {
    "fsmgen_runtime".to_string()
}

impl ProjectConfig {
    /// Configuration with every default filled in
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptions: default_descriptions(),
            output: default_output(),
            package: None,
            runtime_crate: default_runtime_crate(),
        }
    }

    /// Check values that end up in generated source
    pub fn validate(&self) -> Result<()> {
        if let Some(package) = &self.package {
            if !is_valid_identifier(package) {
                return Err(Error::ConfigInvalid {
                    message: format!("package '{}' is not a valid module name", package),
                });
            }
        }

        let segments = self
            .runtime_crate
            .strip_prefix("::")
            .unwrap_or(&self.runtime_crate);
        if segments.split("::").any(|s| !is_valid_identifier(s)) {
            return Err(Error::ConfigInvalid {
                message: format!("runtime_crate '{}' is not a valid path", self.runtime_crate),
            });
        }

        Ok(())
    }
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or fsmgen.yaml file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;
        project.validate()?;

        tracing::debug!(project = %project.name, path = %config_path.display(), "loaded configuration");

        Ok(Self { project, base_path })
    }

    /// Absolute-or-relative path of the descriptions directory
    pub fn descriptions_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.descriptions)
    }

    /// Absolute-or-relative path of the output directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.output)
    }
}
