//! Resolver configuration: the ordered list of sibling modules whose documentation
//! artifacts links may resolve into, supplied by the surrounding build layer.

use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use crate::error::FoliaError;

/// One sibling module: where its independently-built output lives on disk, and where it
/// sits relative to the merged output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescription {
    pub name: String,
    /// Directory of the module's own build output; scanned (bounded depth) for its
    /// manifest.
    pub output_dir: PathBuf,
    /// Path of the module's documentation inside the merged output tree.
    pub relative_path_to_output: PathBuf,
}

/// Full resolver configuration. Module order is significant: it is the artifact iteration
/// order during link resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// The already-merged final output root.
    pub output_root: PathBuf,
    /// Subdirectory of each module's `output_dir` holding its partial (pre-merge) build
    /// output. Defaults to `partial`.
    #[serde(default)]
    pub partial_subdir: Option<PathBuf>,
    #[serde(default)]
    pub modules: Vec<ModuleDescription>,
}

impl ResolverConfig {
    pub fn from_toml_str(content: &str) -> Result<ResolverConfig, FoliaError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ResolverConfig, FoliaError> {
        tracing::debug!("Reading resolver configuration from: {:?}", path.as_ref());
        let content = read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleDescription> {
        self.modules.iter().find(|m| m.name == name)
    }
}
