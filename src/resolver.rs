//! Cross-artifact link resolution.
//!
//! Sibling modules build their documentation independently; at render time a link to a
//! declarable documented in another module must be turned into a relative path into that
//! module's already-built output tree. [ModuleLinkResolver] discovers each configured
//! module's manifest once per session, maps identifiers to candidate paths, and probes
//! the filesystem through a fallback chain of known layouts before giving up.
//!
//! The fallback chain exists because sibling outputs may be only partially materialized
//! when a module's pages are generated: the partial (pre-merge) layout is probed before
//! the merged output root. This is heuristic by design; an unresolved identifier is a
//! soft failure and the renderer keeps plain text.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::{
    collections::BTreeSet,
    fs::read_to_string,
    path::{Path, PathBuf},
};
use url::Url;
use walkdir::WalkDir;

use crate::{
    config::{ModuleDescription, ResolverConfig},
    error::FoliaError,
    model::DeclId,
};

/// Fixed manifest filename written into every artifact's output.
pub const PACKAGE_LIST_NAME: &str = "package-list";

/// Manifest scan depth below a module's output directory.
const PACKAGE_LIST_SCAN_DEPTH: usize = 3;

const DEFAULT_PARTIAL_SUBDIR: &str = "partial";

/// Link format an artifact's manifest declares for its pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkFormat {
    Html,
    Markdown,
}

impl LinkFormat {
    pub fn link_extension(&self) -> &'static str {
        match self {
            LinkFormat::Html => "html",
            LinkFormat::Markdown => "md",
        }
    }

    fn from_name(name: &str) -> Option<LinkFormat> {
        match name {
            "html" => Some(LinkFormat::Html),
            "md" | "markdown" => Some(LinkFormat::Markdown),
            _ => None,
        }
    }
}

/// A loaded artifact manifest: schema version, declared link format, and the packages the
/// artifact documents.
///
/// The syntax is the minimal schema the resolver needs: `$`-prefixed `key:value` metadata
/// lines (`$format:html`, `$version:1`) followed by one package name per line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageList {
    pub version: Option<u8>,
    pub format: Option<LinkFormat>,
    pub packages: BTreeSet<String>,
}

impl PackageList {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PackageList, FoliaError> {
        let content = read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<PackageList, FoliaError> {
        let mut list = PackageList::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(metadata) = line.strip_prefix('$') {
                let Some((key, value)) = metadata.split_once(':') else {
                    return Err(FoliaError::Manifest(format!(
                        "Malformed metadata line '{line}': expected '$key:value'"
                    )));
                };
                match key {
                    "format" => list.format = LinkFormat::from_name(value.trim()),
                    "version" => {
                        let version = value.trim().parse::<u8>().map_err(|e| {
                            FoliaError::Manifest(format!("Invalid manifest version '{value}': {e}"))
                        })?;
                        list.version = Some(version);
                    }
                    // Unknown metadata keys are forward-compatible noise.
                    _ => {}
                }
            } else {
                list.packages.insert(line.to_string());
            }
        }
        Ok(list)
    }
}

/// One sibling build output, discovered once per session: its manifest plus the locations
/// needed to turn an identifier into candidate paths.
#[derive(Clone, Debug)]
pub struct ExternalArtifact {
    pub module_name: String,
    /// The module's path inside the merged output tree, forward-slash form.
    relative_output: String,
    /// Root of the module's partial (pre-merge) build output.
    partial_root: PathBuf,
    pub package_list: PackageList,
}

impl ExternalArtifact {
    /// Artifact-relative link for `id`, or `None` when this artifact does not document
    /// the identifier's package. The layout is fixed: one directory per package, one
    /// directory per classlike, `index` leaves for containers.
    fn location_of(&self, id: &DeclId) -> Option<String> {
        let package = id.package_name.as_deref()?;
        if !self.package_list.packages.contains(package) {
            return None;
        }
        let ext = self
            .package_list
            .format
            .map(|f| f.link_extension())
            .unwrap_or("html");
        let leaf = match (id.class_names.as_deref(), id.callable.as_deref()) {
            (None, None) => format!("{package}/index.{ext}"),
            (Some(class), None) => format!("{package}/{class}/index.{ext}"),
            (Some(class), Some(callable)) => format!("{package}/{class}/{callable}.{ext}"),
            (None, Some(callable)) => format!("{package}/{callable}.{ext}"),
        };
        if self.relative_output.is_empty() {
            Some(leaf)
        } else {
            Some(format!("{}/{leaf}", self.relative_output))
        }
    }
}

/// Session-scoped resolver over all configured sibling artifacts.
///
/// The artifact list is built at most once (guarded for concurrent callers); manifest
/// loading is the only filesystem read outside of the existence probes in [Self::resolve].
/// Configuration errors are reported once per module and the module contributes no links
/// afterwards.
pub struct ModuleLinkResolver {
    config: ResolverConfig,
    artifacts: OnceCell<Vec<ExternalArtifact>>,
    reported: Mutex<BTreeSet<String>>,
}

impl ModuleLinkResolver {
    pub fn new(config: ResolverConfig) -> Self {
        ModuleLinkResolver {
            config,
            artifacts: OnceCell::new(),
            reported: Mutex::new(BTreeSet::new()),
        }
    }

    fn partial_subdir(&self) -> &Path {
        self.config
            .partial_subdir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_PARTIAL_SUBDIR))
    }

    fn artifacts(&self) -> &[ExternalArtifact] {
        self.artifacts
            .get_or_init(|| {
                self.config
                    .modules
                    .iter()
                    .filter_map(|module| self.artifact_for(module))
                    .collect()
            })
            .as_slice()
    }

    fn artifact_for(&self, module: &ModuleDescription) -> Option<ExternalArtifact> {
        let Some(manifest_path) = find_package_list(&module.output_dir) else {
            tracing::warn!(
                "No {PACKAGE_LIST_NAME} found under {:?} for module '{}', it contributes no links",
                module.output_dir,
                module.name
            );
            return None;
        };
        match PackageList::load(&manifest_path) {
            Ok(package_list) => Some(ExternalArtifact {
                module_name: module.name.clone(),
                relative_output: forward_slashed(&module.relative_path_to_output),
                partial_root: module.output_dir.join(self.partial_subdir()),
                package_list,
            }),
            Err(err) => {
                self.report_once(&module.name, &manifest_path, err);
                None
            }
        }
    }

    fn report_once(&self, module_name: &str, manifest_path: &Path, err: FoliaError) {
        let mut reported = self.reported.lock();
        if reported.insert(module_name.to_string()) {
            tracing::error!(
                "Failed to load manifest {manifest_path:?} for module '{module_name}': {err}. \
                 The module contributes no links for this session"
            );
        }
    }

    /// Resolve `id` to a path relative to `requesting`, the absolute location of the page
    /// the link appears on. Returns `None` (soft failure) when no candidate exists on
    /// disk; the renderer keeps the plain-text label.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, id: &DeclId, requesting: &Path) -> Option<String> {
        for artifact in self.artifacts() {
            let Some(link) = artifact.location_of(id) else {
                continue;
            };
            let link = strip_file_scheme(&link);
            for candidate in self.candidates(artifact, link) {
                if candidate.is_file() {
                    return Some(relative_link(requesting, &candidate));
                }
            }
        }
        tracing::warn!("No sibling artifact resolves identifier '{id}', omitting hyperlink");
        None
    }

    /// Candidate absolute paths for an artifact-relative link, probed in order: the
    /// module's declared partial-build layout first, then the merged output root.
    fn candidates(&self, artifact: &ExternalArtifact, link: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(2);
        let module_local = link
            .strip_prefix(&artifact.relative_output)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|rest| !rest.is_empty());
        if let Some(rest) = module_local {
            candidates.push(artifact.partial_root.join(split_link(rest)));
        }
        candidates.push(self.config.output_root.join(split_link(link)));
        candidates
    }

    /// Relative link to the configured module's index page, with the extension the
    /// module's manifest declares (no extension when it declares none). `None` when the
    /// module is unconfigured or its manifest is absent or unreadable.
    pub fn resolve_index_link(&self, module_name: &str) -> Option<String> {
        let module = self.config.module(module_name)?;
        let manifest_path = find_package_list(&module.output_dir)?;
        let package_list = match PackageList::load(&manifest_path) {
            Ok(package_list) => package_list,
            Err(err) => {
                self.report_once(&module.name, &manifest_path, err);
                return None;
            }
        };
        let extension = package_list
            .format
            .map(|f| format!(".{}", f.link_extension()))
            .unwrap_or_default();
        Some(format!(
            "{}/index{extension}",
            forward_slashed(&module.relative_path_to_output)
        ))
    }
}

/// Bounded-depth scan for an artifact's manifest file. Entries are visited in file-name
/// order so the result is stable when multiple manifests exist.
fn find_package_list(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .max_depth(PACKAGE_LIST_SCAN_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == PACKAGE_LIST_NAME)
        .map(|entry| entry.into_path())
}

fn strip_file_scheme(link: &str) -> &str {
    link.strip_prefix("file:").unwrap_or(link)
}

fn forward_slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn split_link(link: &str) -> PathBuf {
    link.split('/').collect()
}

/// Relative path from `requesting` (a file) to `target` (a file): longest common
/// path-segment prefix, one `..` per remaining requesting-side segment minus one, then
/// the remaining target-side segments, forward-slash joined.
pub fn relative_link(requesting: &Path, target: &Path) -> String {
    let from: Vec<String> = segments(requesting);
    let to: Vec<String> = segments(target);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from.len().saturating_sub(common + 1);
    let mut parts: Vec<String> = vec!["..".to_string(); ups];
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// Join a resolved relative link onto an origin URL, producing an absolute href.
pub fn absolute_href(origin: &str, relative: &str) -> Result<String, FoliaError> {
    let origin = Url::parse(origin)?;
    Ok(origin.join(relative)?.as_str().to_string())
}
