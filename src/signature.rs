//! Signature rendering seam.
//!
//! Signatures are a front-end concern; the page builder only needs *some* per-target
//! content nodes for each declarable's signature slot. Hosts with a language-aware
//! signature renderer implement [SignatureProvider]; [PlainSignatureProvider] is the
//! fallback used when none is supplied.

use crate::{
    content::ContentNode,
    model::{ClasslikeKind, DeclRef, Target},
};

pub trait SignatureProvider: Sync {
    /// Content nodes for `decl`'s signature as seen under `target`. Called once per
    /// target inside a platform hint, so target-identical signatures merge.
    fn signature(&self, decl: DeclRef<'_>, target: &Target) -> Vec<ContentNode>;
}

/// Keyword-and-name signatures with no type information.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainSignatureProvider;

impl SignatureProvider for PlainSignatureProvider {
    fn signature(&self, decl: DeclRef<'_>, _target: &Target) -> Vec<ContentNode> {
        let keyword = match decl {
            DeclRef::Module(_) => "module",
            DeclRef::Package(_) => "package",
            DeclRef::Classlike(c) => match c.kind {
                ClasslikeKind::Class => "class",
                ClasslikeKind::Interface => "interface",
                ClasslikeKind::Object => "object",
                ClasslikeKind::Annotation => "annotation",
                ClasslikeKind::Enum => "enum",
            },
            DeclRef::Function(f) if f.primary_constructor => "constructor",
            DeclRef::Function(_) => "fun",
            DeclRef::Property(_) => "val",
            DeclRef::TypeAlias(_) => "typealias",
            DeclRef::EnumEntry(_) => "entry",
        };
        let name = decl.name();
        if name.is_empty() {
            vec![ContentNode::Text(keyword.to_string())]
        } else {
            vec![ContentNode::Text(format!("{keyword} {name}"))]
        }
    }
}
