//! Scoped construction of [ContentNode] trees.
//!
//! A [ContentScope] accumulates nodes for exactly one declarable. Scopes nest through
//! closures (`group`, `build_group`), so unbalanced nesting cannot be expressed, and
//! [ContentScope::finish] consumes the scope, so a finished builder cannot be mutated
//! again. The one non-trivial operation is [ContentScope::platform_hint], the
//! merge/fork rule that collapses target-identical content into shared
//! [ContentNode::PlatformGroup]s.

use crate::{
    content::{ContentKind, ContentNode, LinkAddress},
    model::{DeclId, DocNode, DocRoot, Target},
};

/// Accumulates content nodes in call order for one open scope.
#[derive(Debug, Default)]
pub struct ContentScope {
    nodes: Vec<ContentNode>,
}

impl ContentScope {
    pub fn new() -> Self {
        ContentScope { nodes: Vec::new() }
    }

    /// Build a full content tree for one declarable and seal it. The scope passed to
    /// `build` is dropped when the closure returns; there is no way to keep mutating the
    /// produced tree through it.
    pub fn content_for(build: impl FnOnce(&mut ContentScope)) -> ContentNode {
        let mut scope = ContentScope::new();
        build(&mut scope);
        scope.finish(ContentKind::Main)
    }

    /// Seal this scope into a group node, consuming the scope.
    pub fn finish(self, kind: ContentKind) -> ContentNode {
        ContentNode::Group {
            kind,
            children: self.nodes,
        }
    }

    fn into_nodes(self) -> Vec<ContentNode> {
        self.nodes
    }

    /// Open a nested group scope.
    pub fn group(&mut self, kind: ContentKind, build: impl FnOnce(&mut ContentScope)) {
        let mut inner = ContentScope::new();
        build(&mut inner);
        self.nodes.push(inner.finish(kind));
    }

    /// Build a group without appending it, for callers assembling table rows.
    pub fn build_group(
        &self,
        kind: ContentKind,
        build: impl FnOnce(&mut ContentScope),
    ) -> ContentNode {
        let mut inner = ContentScope::new();
        build(&mut inner);
        inner.finish(kind)
    }

    pub fn header(&mut self, level: u8, text: &str) {
        self.nodes.push(ContentNode::Header {
            level,
            children: vec![ContentNode::Text(text.to_string())],
        });
    }

    pub fn text<S: Into<String>>(&mut self, text: S) {
        self.nodes.push(ContentNode::Text(text.into()));
    }

    pub fn link<S: Into<String>>(&mut self, label: S, id: DeclId) {
        self.nodes.push(ContentNode::Link {
            label: label.into(),
            address: LinkAddress::Decl(id),
        });
    }

    pub fn url_link<S: Into<String>, U: Into<String>>(&mut self, label: S, url: U) {
        self.nodes.push(ContentNode::Link {
            label: label.into(),
            address: LinkAddress::Url(url.into()),
        });
    }

    pub fn table(&mut self, kind: ContentKind, rows: Vec<ContentNode>) {
        self.nodes.push(ContentNode::Table { kind, rows });
    }

    /// Append an already-built node.
    pub fn append(&mut self, node: ContentNode) {
        self.nodes.push(node);
    }

    /// Convert a parsed doc-comment markup tree into content nodes in place.
    pub fn comment(&mut self, root: &DocRoot) {
        for node in &root.children {
            self.nodes.push(doc_to_content(node));
        }
    }

    /// The platform-dependent hint: evaluate `block` once per target in canonical order,
    /// then merge targets whose produced subtrees are structurally identical into one
    /// [ContentNode::PlatformGroup] each.
    ///
    /// Grouping walks the equivalence classes in first-occurrence order, comparing with
    /// the content tree's derived structural equality, so the emission order is fully
    /// determined by the input. Targets whose block produces nothing (or only empty
    /// nodes) are dropped, not merged into an empty group.
    pub fn platform_hint(
        &mut self,
        targets: &[Target],
        block: impl Fn(&mut ContentScope, &Target),
    ) {
        let mut classes: Vec<(Vec<ContentNode>, Vec<Target>)> = Vec::new();
        for target in targets {
            let mut candidate_scope = ContentScope::new();
            block(&mut candidate_scope, target);
            let candidate = candidate_scope.into_nodes();
            if candidate.iter().all(ContentNode::is_empty) {
                continue;
            }
            match classes.iter_mut().find(|class| class.0 == candidate) {
                Some(class) => class.1.push(target.clone()),
                None => classes.push((candidate, vec![target.clone()])),
            }
        }
        for (children, class_targets) in classes {
            self.nodes.push(ContentNode::PlatformGroup {
                targets: class_targets,
                children,
            });
        }
    }
}

fn doc_to_content(node: &DocNode) -> ContentNode {
    match node {
        DocNode::Text(text) | DocNode::Code(text) => ContentNode::Text(text.clone()),
        DocNode::Paragraph(children) => ContentNode::Group {
            kind: ContentKind::Comment,
            children: children.iter().map(doc_to_content).collect(),
        },
        DocNode::Link { label, id } => ContentNode::Link {
            label: label.clone(),
            address: LinkAddress::Decl(id.clone()),
        },
    }
}
