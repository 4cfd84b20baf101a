//! The declaration model: an immutable tree of documentable entities produced by an
//! external front-end.
//!
//! Every entity carries the set of [Target]s it is visible under and a per-target map of
//! parsed documentation ([DocumentationNode]). The model never stores documentation for a
//! target the entity is not visible under; see [ModuleDecl::built_in_test].
//!
//! The containment rules are fixed: a [ModuleDecl] holds [PackageDecl]s, a package holds
//! classlikes, functions, properties and type aliases, and a [ClasslikeDecl] additionally
//! holds constructors, enum entries and nested classlikes. [crate::pages::PageTreeBuilder]
//! mirrors (a subset of) this tree when it assembles pages.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

/// One compilation context (a platform variant of a multiplatform build) a declaration may
/// be documented under. Opaque to this crate beyond identity and ordering.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target(String);

impl Target {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Target(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target(name.to_string())
    }
}

/// Values keyed by the target they apply to. Iteration order is the target's `Ord` order;
/// consumers that need the declarable's canonical target order must iterate the
/// declarable's target list and index into the map.
pub type PerTarget<T> = BTreeMap<Target, T>;

/// A stable, unique reference to a declarable, usable across independently built
/// documentation artifacts.
///
/// Segments are optional from the outside in: a package-level identifier has only
/// `package_name`, a classlike adds `class_names` (dotted for nested classes), a member
/// adds `callable`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId {
    pub package_name: Option<String>,
    pub class_names: Option<String>,
    pub callable: Option<String>,
}

impl DeclId {
    pub fn package<S: Into<String>>(package: S) -> Self {
        DeclId {
            package_name: Some(package.into()),
            ..Default::default()
        }
    }

    pub fn classlike<P: Into<String>, C: Into<String>>(package: P, class_names: C) -> Self {
        DeclId {
            package_name: Some(package.into()),
            class_names: Some(class_names.into()),
            callable: None,
        }
    }

    pub fn callable<P: Into<String>, N: Into<String>>(
        package: P,
        class_names: Option<String>,
        name: N,
    ) -> Self {
        DeclId {
            package_name: Some(package.into()),
            class_names,
            callable: Some(name.into()),
        }
    }

    /// Display name for an identifier referenced without a resolvable declarable, e.g. in
    /// an inheritors table. Uses the outermost class name when one is present.
    pub fn class_display_name(&self) -> Option<String> {
        self.class_names
            .as_ref()
            .map(|names| match names.rfind('.') {
                Some(idx) => names[..idx].to_string(),
                None => names.clone(),
            })
            .filter(|name| !name.is_empty())
    }
}

impl Display for DeclId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let segments = [
            self.package_name.as_deref(),
            self.class_names.as_deref(),
            self.callable.as_deref(),
        ];
        let joined = segments.into_iter().flatten().collect::<Vec<_>>().join("/");
        write!(f, "{joined}")
    }
}

/// Root of one parsed doc-comment markup tree. Opaque to the tag aggregator; the content
/// builder converts it into content nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRoot {
    pub children: Vec<DocNode>,
}

impl DocRoot {
    pub fn text<S: Into<String>>(text: S) -> Self {
        DocRoot {
            children: vec![DocNode::Text(text.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First plain text run in document order. Used for one-line briefs in listing blocks.
    pub fn first_text(&self) -> Option<&str> {
        fn descend(nodes: &[DocNode]) -> Option<&str> {
            for node in nodes {
                match node {
                    DocNode::Text(text) if !text.trim().is_empty() => return Some(text),
                    DocNode::Paragraph(children) => {
                        if let Some(found) = descend(children) {
                            return Some(found);
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        descend(&self.children)
    }
}

/// Inline/block markup. Deliberately small: the core never parses doc-comment syntax, it
/// only carries what the front-end produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocNode {
    Text(String),
    Code(String),
    Paragraph(Vec<DocNode>),
    Link { label: String, id: DeclId },
}

/// One structured annotation from a parsed doc comment.
///
/// `Description`, `Receiver` and `Constructor` are singleton kinds: at most one per
/// documentation node. `Param` and `See` repeat, identified by name. The `Other*` variants
/// carry extension tags the core has no semantics for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagWrapper {
    Description(DocRoot),
    Param {
        name: String,
        root: DocRoot,
    },
    Receiver(DocRoot),
    See {
        name: String,
        address: Option<DeclId>,
        root: DocRoot,
    },
    Constructor(DocRoot),
    OtherNamed {
        name: String,
        root: DocRoot,
    },
    OtherUnnamed {
        root: DocRoot,
    },
}

impl TagWrapper {
    pub fn root(&self) -> &DocRoot {
        match self {
            TagWrapper::Description(root)
            | TagWrapper::Receiver(root)
            | TagWrapper::Constructor(root)
            | TagWrapper::Param { root, .. }
            | TagWrapper::See { root, .. }
            | TagWrapper::OtherNamed { root, .. }
            | TagWrapper::OtherUnnamed { root } => root,
        }
    }
}

/// The parsed doc comment attached to a declarable for one target: an ordered sequence of
/// tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationNode {
    pub tags: Vec<TagWrapper>,
}

impl DocumentationNode {
    pub fn new(tags: Vec<TagWrapper>) -> Self {
        DocumentationNode { tags }
    }
}

/// Which inheriting types each target reports for a classlike. The page builder inverts
/// this into one table row per inheriting type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritorsInfo(pub PerTarget<Vec<DeclId>>);

impl InheritorsInfo {
    /// Group by inheriting type, preserving first-occurrence order across the map and
    /// collecting the targets that report each relationship.
    pub fn by_inheritor(&self) -> Vec<(DeclId, Vec<Target>)> {
        let mut grouped: Vec<(DeclId, Vec<Target>)> = Vec::new();
        for (target, inheritors) in &self.0 {
            for id in inheritors {
                match grouped.iter_mut().find(|entry| &entry.0 == id) {
                    Some(entry) => entry.1.push(target.clone()),
                    None => grouped.push((id.clone(), vec![target.clone()])),
                }
            }
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClasslikeKind {
    Class,
    Interface,
    Object,
    Annotation,
    Enum,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    pub packages: Vec<PackageDecl>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    pub classlikes: Vec<ClasslikeDecl>,
    pub functions: Vec<FunctionDecl>,
    pub properties: Vec<PropertyDecl>,
    pub typealiases: Vec<TypeAliasDecl>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClasslikeDecl {
    /// Anonymous classlikes have no name; their pages render with an empty title.
    pub name: Option<String>,
    pub id: DeclId,
    pub kind: ClasslikeKind,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    pub constructors: Vec<FunctionDecl>,
    /// Enum entries; only populated when `kind` is [ClasslikeKind::Enum].
    pub entries: Vec<EnumEntryDecl>,
    pub classlikes: Vec<ClasslikeDecl>,
    pub functions: Vec<FunctionDecl>,
    pub properties: Vec<PropertyDecl>,
    /// Inheritance metadata supplied by the front-end, when it exposes any.
    pub inheritors: Option<InheritorsInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    /// True iff the member is present only through supertype inheritance and is not
    /// re-declared here. Listing blocks skip such members; the model keeps them.
    pub inherited: bool,
    /// Marks a classlike's implicit constructor, excluded from constructor listings.
    pub primary_constructor: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    pub inherited: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumEntryDecl {
    pub name: String,
    pub id: DeclId,
    pub targets: Vec<Target>,
    pub documentation: PerTarget<DocumentationNode>,
    pub classlikes: Vec<ClasslikeDecl>,
    pub functions: Vec<FunctionDecl>,
}

/// A borrowed view over any declarable kind. Lets the signature provider and the listing
/// blocks treat members uniformly without cloning the model.
#[derive(Clone, Copy, Debug)]
pub enum DeclRef<'a> {
    Module(&'a ModuleDecl),
    Package(&'a PackageDecl),
    Classlike(&'a ClasslikeDecl),
    Function(&'a FunctionDecl),
    Property(&'a PropertyDecl),
    TypeAlias(&'a TypeAliasDecl),
    EnumEntry(&'a EnumEntryDecl),
}

impl<'a> DeclRef<'a> {
    pub fn id(&self) -> &'a DeclId {
        match self {
            DeclRef::Module(d) => &d.id,
            DeclRef::Package(d) => &d.id,
            DeclRef::Classlike(d) => &d.id,
            DeclRef::Function(d) => &d.id,
            DeclRef::Property(d) => &d.id,
            DeclRef::TypeAlias(d) => &d.id,
            DeclRef::EnumEntry(d) => &d.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            DeclRef::Module(d) => &d.name,
            DeclRef::Package(d) => &d.name,
            DeclRef::Classlike(d) => d.name.as_deref().unwrap_or(""),
            DeclRef::Function(d) => &d.name,
            DeclRef::Property(d) => &d.name,
            DeclRef::TypeAlias(d) => &d.name,
            DeclRef::EnumEntry(d) => &d.name,
        }
    }

    pub fn targets(&self) -> &'a [Target] {
        match self {
            DeclRef::Module(d) => &d.targets,
            DeclRef::Package(d) => &d.targets,
            DeclRef::Classlike(d) => &d.targets,
            DeclRef::Function(d) => &d.targets,
            DeclRef::Property(d) => &d.targets,
            DeclRef::TypeAlias(d) => &d.targets,
            DeclRef::EnumEntry(d) => &d.targets,
        }
    }

    pub fn documentation(&self) -> &'a PerTarget<DocumentationNode> {
        match self {
            DeclRef::Module(d) => &d.documentation,
            DeclRef::Package(d) => &d.documentation,
            DeclRef::Classlike(d) => &d.documentation,
            DeclRef::Function(d) => &d.documentation,
            DeclRef::Property(d) => &d.documentation,
            DeclRef::TypeAlias(d) => &d.documentation,
            DeclRef::EnumEntry(d) => &d.documentation,
        }
    }

    /// One-line brief: the first description text of the first (canonical-order) target
    /// that carries a description, empty when none do.
    pub fn brief(&self) -> String {
        for target in self.targets() {
            let Some(doc) = self.documentation().get(target) else {
                continue;
            };
            for tag in &doc.tags {
                if let TagWrapper::Description(root) = tag {
                    if let Some(text) = root.first_text() {
                        return text.to_string();
                    }
                }
            }
        }
        String::new()
    }
}

impl ModuleDecl {
    /// Walk the model and report invariant violations as human-readable strings. Empty
    /// means consistent. Checks that every documented target is also a visible target,
    /// for every declarable in the tree.
    pub fn built_in_test(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_doc_targets(DeclRef::Module(self), &mut errors);
        for package in &self.packages {
            check_doc_targets(DeclRef::Package(package), &mut errors);
            for classlike in &package.classlikes {
                check_classlike(classlike, &mut errors);
            }
            for function in &package.functions {
                check_doc_targets(DeclRef::Function(function), &mut errors);
            }
            for property in &package.properties {
                check_doc_targets(DeclRef::Property(property), &mut errors);
            }
            for alias in &package.typealiases {
                check_doc_targets(DeclRef::TypeAlias(alias), &mut errors);
            }
        }
        errors
    }
}

fn check_classlike(classlike: &ClasslikeDecl, errors: &mut Vec<String>) {
    check_doc_targets(DeclRef::Classlike(classlike), errors);
    for function in classlike.constructors.iter().chain(&classlike.functions) {
        check_doc_targets(DeclRef::Function(function), errors);
    }
    for property in &classlike.properties {
        check_doc_targets(DeclRef::Property(property), errors);
    }
    for entry in &classlike.entries {
        check_doc_targets(DeclRef::EnumEntry(entry), errors);
    }
    for nested in &classlike.classlikes {
        check_classlike(nested, errors);
    }
}

fn check_doc_targets(decl: DeclRef<'_>, errors: &mut Vec<String>) {
    for target in decl.documentation().keys() {
        if !decl.targets().contains(target) {
            errors.push(format!(
                "{}: documented under target '{target}' but not visible under it",
                decl.id()
            ));
        }
    }
}
