//! The abstract, renderer-agnostic content tree.
//!
//! Pages carry [ContentNode] trees rather than any concrete output format. Target
//! variance is expressed with [ContentNode::PlatformGroup]: a subtree tagged with the
//! targets it applies to. The derived `PartialEq` on [ContentNode] is the total,
//! recursive structural equality the platform-merge rule in
//! [builder::ContentScope::platform_hint] groups by; it must stay derived (field-wise)
//! so grouping never depends on identity or hashing.

use serde::{Deserialize, Serialize};

use crate::model::{DeclId, Target};

pub mod builder;

/// Semantic discriminator for groups and tables, carried through to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Main,
    Cover,
    Packages,
    Classlikes,
    Functions,
    Properties,
    Constructors,
    Entries,
    TypeAliases,
    Parameters,
    Comment,
    BriefComment,
    Symbol,
    Inheritors,
}

/// Where a link points: another declarable (resolved later, possibly across artifacts via
/// [crate::resolver::ModuleLinkResolver]) or a literal URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkAddress {
    Decl(DeclId),
    Url(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentNode {
    Group {
        kind: ContentKind,
        children: Vec<ContentNode>,
    },
    Header {
        level: u8,
        children: Vec<ContentNode>,
    },
    /// Rows are typically [ContentNode::Group]s or [ContentNode::PlatformGroup]s.
    Table {
        kind: ContentKind,
        rows: Vec<ContentNode>,
    },
    Text(String),
    Link {
        label: String,
        address: LinkAddress,
    },
    /// A subtree applying to a specific set of targets. `targets` preserves the
    /// declarable's canonical target order so emission stays deterministic.
    PlatformGroup {
        targets: Vec<Target>,
        children: Vec<ContentNode>,
    },
}

impl ContentNode {
    /// True when the node renders to nothing: no text, no link, and no non-empty child.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentNode::Text(text) => text.is_empty(),
            ContentNode::Link { .. } => false,
            ContentNode::Group { children, .. }
            | ContentNode::Header { children, .. }
            | ContentNode::PlatformGroup { children, .. } => {
                children.iter().all(ContentNode::is_empty)
            }
            ContentNode::Table { rows, .. } => rows.iter().all(ContentNode::is_empty),
        }
    }

    /// Immediate children, empty for leaves.
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Group { children, .. }
            | ContentNode::Header { children, .. }
            | ContentNode::PlatformGroup { children, .. } => children,
            ContentNode::Table { rows, .. } => rows,
            ContentNode::Text(_) | ContentNode::Link { .. } => &[],
        }
    }
}
