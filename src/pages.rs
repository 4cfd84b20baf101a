//! Page tree construction.
//!
//! [PageTreeBuilder] walks the declaration model and produces one [PageNode] per
//! declarable, assembling each page's content through the tag aggregator and the scoped
//! content builder. The page tree is a strict tree mirroring (a subset of) the
//! declaration tree; link resolution is deliberately deferred to render time because it
//! depends on the requesting page's final on-disk location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    content::{builder::ContentScope, ContentKind, ContentNode},
    error::FoliaError,
    model::{
        ClasslikeDecl, ClasslikeKind, DeclId, DeclRef, EnumEntryDecl, FunctionDecl, ModuleDecl,
        PackageDecl, PerTarget, PropertyDecl, Target, TypeAliasDecl,
    },
    signature::SignatureProvider,
    tags::GroupedTags,
};

/// Sentinel title for a module whose name is empty.
pub const ROOT_MODULE_TITLE: &str = "<root>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Module,
    Package,
    Classlike,
    Member,
}

/// One unit of output documentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    pub title: String,
    pub kind: PageKind,
    /// The semantic identifiers this page documents. Normally one; merged pages carry
    /// several.
    pub ids: BTreeSet<DeclId>,
    pub content: ContentNode,
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Serialize the page tree for an external renderer.
    pub fn to_json(&self) -> Result<String, FoliaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of pages in this subtree, itself included.
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(PageNode::page_count).sum::<usize>()
    }
}

/// Translates declarables into pages. One instance may be shared across declarations;
/// all state lives in the per-call scopes.
pub struct PageTreeBuilder<'a> {
    signatures: &'a dyn SignatureProvider,
}

impl<'a> PageTreeBuilder<'a> {
    pub fn new(signatures: &'a dyn SignatureProvider) -> Self {
        PageTreeBuilder { signatures }
    }

    pub fn page_for_module(&self, module: &ModuleDecl) -> PageNode {
        let title = if module.name.is_empty() {
            ROOT_MODULE_TITLE.to_string()
        } else {
            module.name.clone()
        };
        PageNode {
            title,
            kind: PageKind::Module,
            ids: BTreeSet::from([module.id.clone()]),
            content: self.content_for_module(module),
            children: module
                .packages
                .iter()
                .map(|p| self.page_for_package(p))
                .collect(),
        }
    }

    pub fn page_for_package(&self, package: &PackageDecl) -> PageNode {
        let mut children: Vec<PageNode> = package
            .classlikes
            .iter()
            .map(|c| self.page_for_classlike(c))
            .collect();
        children.extend(package.functions.iter().map(|f| self.page_for_function(f)));
        children.extend(
            package
                .typealiases
                .iter()
                .map(|t| self.page_for_type_alias(t)),
        );
        PageNode {
            title: package.name.clone(),
            kind: PageKind::Package,
            ids: BTreeSet::from([package.id.clone()]),
            content: self.content_for_package(package),
            children,
        }
    }

    pub fn page_for_classlike(&self, classlike: &ClasslikeDecl) -> PageNode {
        let mut children: Vec<PageNode> = classlike
            .constructors
            .iter()
            .map(|c| self.page_for_function(c))
            .collect();
        children.extend(
            classlike
                .classlikes
                .iter()
                .map(|c| self.page_for_classlike(c)),
        );
        children.extend(
            filtered_functions(&classlike.functions).map(|f| self.page_for_function(f)),
        );
        if classlike.kind == ClasslikeKind::Enum {
            children.extend(classlike.entries.iter().map(|e| self.page_for_enum_entry(e)));
        }
        PageNode {
            title: classlike.name.clone().unwrap_or_default(),
            kind: PageKind::Classlike,
            ids: BTreeSet::from([classlike.id.clone()]),
            content: self.content_for_classlike(classlike),
            children,
        }
    }

    pub fn page_for_enum_entry(&self, entry: &EnumEntryDecl) -> PageNode {
        PageNode {
            title: entry.name.clone(),
            kind: PageKind::Classlike,
            ids: BTreeSet::from([entry.id.clone()]),
            content: self.content_for_enum_entry(entry),
            children: entry
                .classlikes
                .iter()
                .map(|c| self.page_for_classlike(c))
                .collect(),
        }
    }

    pub fn page_for_function(&self, function: &FunctionDecl) -> PageNode {
        PageNode {
            title: function.name.clone(),
            kind: PageKind::Member,
            ids: BTreeSet::from([function.id.clone()]),
            content: self.content_for_member(DeclRef::Function(function)),
            children: Vec::new(),
        }
    }

    pub fn page_for_type_alias(&self, alias: &TypeAliasDecl) -> PageNode {
        PageNode {
            title: alias.name.clone(),
            kind: PageKind::Member,
            ids: BTreeSet::from([alias.id.clone()]),
            content: self.content_for_member(DeclRef::TypeAlias(alias)),
            children: Vec::new(),
        }
    }

    fn content_for_module(&self, module: &ModuleDecl) -> ContentNode {
        ContentScope::content_for(|s| {
            s.group(ContentKind::Cover, |s| {
                let title = if module.name.is_empty() {
                    ROOT_MODULE_TITLE
                } else {
                    &module.name
                };
                s.header(1, title);
            });
            for node in self.content_for_comments(&module.targets, &module.documentation) {
                s.append(node);
            }
            if !module.packages.is_empty() {
                s.group(ContentKind::Packages, |s| {
                    s.header(2, "Packages");
                    for package in &module.packages {
                        s.group(ContentKind::Main, |s| {
                            s.link(package.name.clone(), package.id.clone());
                        });
                    }
                });
            }
        })
    }

    fn content_for_package(&self, package: &PackageDecl) -> ContentNode {
        ContentScope::content_for(|s| {
            s.group(ContentKind::Cover, |s| {
                s.header(1, &format!("Package {}", package.name));
            });
            for node in self.content_for_comments(&package.targets, &package.documentation) {
                s.append(node);
            }
            self.content_for_scope(
                s,
                &package.id,
                &package.targets,
                &package.classlikes,
                &package.functions,
                &package.properties,
                None,
            );
            let aliases: Vec<DeclRef<'_>> =
                package.typealiases.iter().map(DeclRef::TypeAlias).collect();
            self.member_block(s, "Type aliases", ContentKind::TypeAliases, aliases);
        })
    }

    fn content_for_classlike(&self, classlike: &ClasslikeDecl) -> ContentNode {
        ContentScope::content_for(|s| {
            s.group(ContentKind::Cover, |s| {
                s.header(1, classlike.name.as_deref().unwrap_or_default());
                s.platform_hint(&classlike.targets, |s, target| {
                    for node in self
                        .signatures
                        .signature(DeclRef::Classlike(classlike), target)
                    {
                        s.append(node);
                    }
                });
            });
            for node in self.content_for_comments(&classlike.targets, &classlike.documentation) {
                s.append(node);
            }
            let constructors: Vec<DeclRef<'_>> = classlike
                .constructors
                .iter()
                .filter(|c| !c.primary_constructor)
                .map(DeclRef::Function)
                .collect();
            self.member_block(s, "Constructors", ContentKind::Constructors, constructors);
            if classlike.kind == ClasslikeKind::Enum {
                let entries: Vec<DeclRef<'_>> =
                    classlike.entries.iter().map(DeclRef::EnumEntry).collect();
                self.member_block(s, "Entries", ContentKind::Entries, entries);
            }
            self.content_for_scope(
                s,
                &classlike.id,
                &classlike.targets,
                &classlike.classlikes,
                &classlike.functions,
                &classlike.properties,
                classlike.inheritors.as_ref(),
            );
        })
    }

    fn content_for_enum_entry(&self, entry: &EnumEntryDecl) -> ContentNode {
        ContentScope::content_for(|s| {
            s.group(ContentKind::Cover, |s| {
                s.header(1, &entry.name);
                s.platform_hint(&entry.targets, |s, target| {
                    for node in self.signatures.signature(DeclRef::EnumEntry(entry), target) {
                        s.append(node);
                    }
                });
            });
            for node in self.content_for_comments(&entry.targets, &entry.documentation) {
                s.append(node);
            }
            self.content_for_scope(
                s,
                &entry.id,
                &entry.targets,
                &entry.classlikes,
                &entry.functions,
                &[],
                None,
            );
        })
    }

    fn content_for_member(&self, decl: DeclRef<'_>) -> ContentNode {
        ContentScope::content_for(|s| {
            s.group(ContentKind::Cover, |s| {
                s.header(1, decl.name());
                s.platform_hint(decl.targets(), |s, target| {
                    for node in self.signatures.signature(decl, target) {
                        s.append(node);
                    }
                });
            });
            for node in self.content_for_comments(decl.targets(), decl.documentation()) {
                s.append(node);
            }
        })
    }

    /// The three member listing blocks shared by packages and classlikes, plus the
    /// inheritors table when inheritance metadata is available.
    #[allow(clippy::too_many_arguments)]
    fn content_for_scope(
        &self,
        s: &mut ContentScope,
        id: &DeclId,
        targets: &[Target],
        classlikes: &[ClasslikeDecl],
        functions: &[FunctionDecl],
        properties: &[PropertyDecl],
        inheritors: Option<&crate::model::InheritorsInfo>,
    ) {
        let types: Vec<DeclRef<'_>> = classlikes.iter().map(DeclRef::Classlike).collect();
        self.member_block(s, "Types", ContentKind::Classlikes, types);
        let functions: Vec<DeclRef<'_>> =
            filtered_functions(functions).map(DeclRef::Function).collect();
        self.member_block(s, "Functions", ContentKind::Functions, functions);
        let properties: Vec<DeclRef<'_>> = properties
            .iter()
            .filter(|p| !p.inherited)
            .map(DeclRef::Property)
            .collect();
        self.member_block(s, "Properties", ContentKind::Properties, properties);

        if let Some(info) = inheritors {
            let grouped = info.by_inheritor();
            if !grouped.is_empty() {
                s.header(2, "Inheritors");
                let rows = grouped
                    .into_iter()
                    .map(|(inheritor, reporting_targets)| {
                        let label = inheritor.class_display_name().unwrap_or_else(|| {
                            tracing::warn!("No class name found for identifier {inheritor} (inheritor of {id})");
                            inheritor.to_string()
                        });
                        let row = s.build_group(ContentKind::Inheritors, |s| {
                            s.link(label, inheritor.clone());
                        });
                        ContentNode::PlatformGroup {
                            targets: canonical_order(targets, &reporting_targets),
                            children: vec![row],
                        }
                    })
                    .collect();
                s.table(ContentKind::Inheritors, rows);
            }
        }
    }

    /// One listing block: header, then per member a link, a platform-hinted signature and
    /// a one-line brief. Skipped entirely when `members` is empty.
    fn member_block(
        &self,
        s: &mut ContentScope,
        title: &str,
        kind: ContentKind,
        members: Vec<DeclRef<'_>>,
    ) {
        if members.is_empty() {
            return;
        }
        s.group(kind, |s| {
            s.header(2, title);
            for member in members {
                s.group(ContentKind::Main, |s| {
                    s.link(member.name(), member.id().clone());
                    s.platform_hint(member.targets(), |s, target| {
                        s.group(ContentKind::Symbol, |s| {
                            for node in self.signatures.signature(member, target) {
                                s.append(node);
                            }
                        });
                    });
                    let brief = member.brief();
                    if !brief.is_empty() {
                        s.group(ContentKind::BriefComment, |s| s.text(brief.clone()));
                    }
                });
            }
        });
    }

    /// The aggregated comment sections: description, parameter table (with receiver row),
    /// custom-tag blocks, see-also table. Each section runs through its own platform
    /// hint, so a description identical across targets merges even when the parameter
    /// docs fork.
    fn content_for_comments(
        &self,
        targets: &[Target],
        documentation: &PerTarget<crate::model::DocumentationNode>,
    ) -> Vec<ContentNode> {
        let tags = GroupedTags::aggregate(documentation);
        if tags.is_empty() {
            return Vec::new();
        }
        let group = ContentScope::content_for(|s| {
            s.header(3, "Description");
            self.content_for_description(s, targets, &tags);
            self.content_for_params(s, targets, &tags);
            self.content_for_other_tags(s, targets, &tags);
            self.content_for_see_also(s, targets, &tags);
        });
        group.children().to_vec()
    }

    fn content_for_description(&self, s: &mut ContentScope, targets: &[Target], tags: &GroupedTags) {
        if !tags.has_description() {
            return;
        }
        s.platform_hint(targets, |s, target| {
            if let Some(root) = tags.description(target) {
                if !root.is_empty() {
                    s.group(ContentKind::Comment, |s| s.comment(root));
                }
            }
        });
    }

    fn content_for_params(&self, s: &mut ContentScope, targets: &[Target], tags: &GroupedTags) {
        if !tags.has_params() && !tags.has_receiver() {
            return;
        }
        s.platform_hint(targets, |s, target| {
            let mut rows = Vec::new();
            if let Some(receiver) = tags.receiver(target) {
                rows.push(s.build_group(ContentKind::Parameters, |s| {
                    s.text("<receiver>");
                    s.comment(receiver);
                }));
            }
            for (name, per_target) in tags.params() {
                if let Some(root) = per_target.get(target) {
                    rows.push(s.build_group(ContentKind::Parameters, |s| {
                        s.text(name.clone());
                        s.comment(root);
                    }));
                }
            }
            if !rows.is_empty() {
                s.header(4, "Parameters");
                s.table(ContentKind::Parameters, rows);
            }
        });
    }

    fn content_for_other_tags(&self, s: &mut ContentScope, targets: &[Target], tags: &GroupedTags) {
        if !tags.has_other() {
            return;
        }
        s.platform_hint(targets, |s, target| {
            for (name, per_target) in tags.other_named() {
                if let Some(root) = per_target.get(target) {
                    s.group(ContentKind::Comment, |s| {
                        s.header(4, name);
                        s.comment(root);
                    });
                }
            }
            for root in tags.other_unnamed(target) {
                s.group(ContentKind::Comment, |s| s.comment(root));
            }
        });
    }

    fn content_for_see_also(&self, s: &mut ContentScope, targets: &[Target], tags: &GroupedTags) {
        if !tags.has_see_also() {
            return;
        }
        s.platform_hint(targets, |s, target| {
            let mut rows = Vec::new();
            for (name, per_target) in tags.see_also() {
                if let Some(see) = per_target.get(target) {
                    rows.push(s.build_group(ContentKind::Comment, |s| {
                        match &see.address {
                            Some(address) => s.link(name.clone(), address.clone()),
                            None => s.text(name.clone()),
                        }
                        s.comment(&see.root);
                    }));
                }
            }
            if !rows.is_empty() {
                s.header(4, "See also");
                s.table(ContentKind::Comment, rows);
            }
        });
    }
}

fn filtered_functions(functions: &[FunctionDecl]) -> impl Iterator<Item = &FunctionDecl> {
    functions.iter().filter(|f| !f.inherited)
}

/// Reorder `subset` to follow the canonical order of `targets`; targets the declarable
/// does not know about keep their reported order at the tail.
fn canonical_order(targets: &[Target], subset: &[Target]) -> Vec<Target> {
    let mut ordered: Vec<Target> = targets
        .iter()
        .filter(|t| subset.contains(*t))
        .cloned()
        .collect();
    for target in subset {
        if !ordered.contains(target) {
            ordered.push(target.clone());
        }
    }
    ordered
}
