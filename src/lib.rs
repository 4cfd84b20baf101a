//! # folia-core
//!
//! A Rust library for turning a semantic model of a codebase's declarations and their
//! parsed doc comments into a tree of renderable pages, and for resolving links between
//! declarations that live in independently built documentation artifacts.
//!
//! ## Overview
//!
//! folia-core sits between a language front-end (which produces the declaration model)
//! and a renderer (which consumes the page tree). It owns three tightly coupled pieces:
//!
//! - **Target-aware content**: declarations in a multiplatform build may be documented
//!   differently per compilation target. The content builder evaluates each
//!   documentation block once per target and collapses structurally identical results
//!   into shared platform groups, surfacing only genuine divergence.
//! - **Tag aggregation**: per-declaration documentation tags are grouped by kind and, for
//!   named tags, by name, into read-only lookup tables the page builder assembles its
//!   comment sections from.
//! - **Cross-artifact link resolution**: given only a semantic identifier and the
//!   requesting page's location, the resolver finds the target page inside a sibling
//!   module's already-built output tree, probing a partial-build layout before the merged
//!   output root, and computes a correct relative path.
//!
//! ## Architecture
//!
//! - **[`model`]**: the immutable declaration model (`ModuleDecl`, `DeclId`, `Target`,
//!   documentation tags)
//! - **[`tags`]**: tag aggregation (`GroupedTags`)
//! - **[`content`]**: the abstract content tree and its scoped builder, including the
//!   platform-merge rule
//! - **[`signature`]**: the signature-rendering seam (`SignatureProvider`)
//! - **[`pages`]**: page tree construction (`PageTreeBuilder`, `PageNode`)
//! - **[`config`]** / **[`resolver`]**: module configuration and the cross-artifact link
//!   resolver (`ModuleLinkResolver`)
//!
//! ## Quick Start
//!
//! ```rust
//! use folia_core::{
//!     model::{DeclId, ModuleDecl, Target},
//!     pages::PageTreeBuilder,
//!     signature::PlainSignatureProvider,
//! };
//!
//! let module = ModuleDecl {
//!     name: "my-library".to_string(),
//!     id: DeclId::default(),
//!     targets: vec![Target::new("jvm"), Target::new("js")],
//!     documentation: Default::default(),
//!     packages: vec![],
//! };
//!
//! let signatures = PlainSignatureProvider;
//! let builder = PageTreeBuilder::new(&signatures);
//! let page = builder.page_for_module(&module);
//! assert_eq!(page.title, "my-library");
//! ```
//!
//! Link resolution runs at render time, once each page's final location is known:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use folia_core::{config::ResolverConfig, model::DeclId, resolver::ModuleLinkResolver};
//!
//! let config = ResolverConfig::load("folia.toml")?;
//! let resolver = ModuleLinkResolver::new(config);
//! let id = DeclId::classlike("com.example", "Widget");
//! if let Some(href) = resolver.resolve(&id, Path::new("/site/docs/app/index.html")) {
//!     println!("{href}");
//! }
//! # Ok::<(), folia_core::FoliaError>(())
//! ```
//!
//! ## Error model
//!
//! Missing doc comments, unresolvable cross-artifact links and absent manifests are
//! expected gaps: the affected content degrades (plain label, omitted hyperlink) and a
//! single warning is logged. Configuration errors are reported once and the affected
//! artifact contributes no links for the rest of the session. Nothing in this crate
//! retries I/O.

pub mod config;
pub mod content;
pub mod error;
pub mod model;
pub mod pages;
pub mod resolver;
pub mod signature;
pub mod tags;
#[cfg(test)]
mod tests;

pub use error::*;
