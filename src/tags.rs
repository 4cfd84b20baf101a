//! Tag aggregation: groups a declarable's per-target documentation by tag kind so the page
//! builder can assemble each comment section (description, parameters, see-also, custom
//! tags) from one precomputed, read-only lookup.
//!
//! Aggregation is a single pass over all (target, tag) pairs. Singleton kinds key by
//! target alone; repeatable named kinds key by declared name first, then by target, so a
//! renderer can present one row per name with one fork per target.

use std::collections::BTreeMap;

use crate::model::{DocRoot, DocumentationNode, PerTarget, TagWrapper, Target};

/// A `See` tag after aggregation: the optional link address plus its content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeeTag {
    pub address: Option<crate::model::DeclId>,
    pub root: DocRoot,
}

/// Grouped documentation tags for one declarable. Built once per declarable via
/// [GroupedTags::aggregate] and shared read-only across every content section built from
/// it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedTags {
    descriptions: PerTarget<DocRoot>,
    receivers: PerTarget<DocRoot>,
    constructors: PerTarget<DocRoot>,
    params: BTreeMap<String, PerTarget<DocRoot>>,
    see_also: BTreeMap<String, PerTarget<SeeTag>>,
    other_named: BTreeMap<String, PerTarget<DocRoot>>,
    other_unnamed: PerTarget<Vec<DocRoot>>,
}

impl GroupedTags {
    /// Classify every (target, tag) pair in `documentation`.
    ///
    /// Two same-kind singleton tags under one target are a defect in the input: the later
    /// one is discarded and the collision logged, never escalated.
    pub fn aggregate(documentation: &PerTarget<DocumentationNode>) -> GroupedTags {
        let mut grouped = GroupedTags::default();
        for (target, node) in documentation {
            for tag in &node.tags {
                match tag {
                    TagWrapper::Description(root) => {
                        insert_singleton(&mut grouped.descriptions, target, root, "Description");
                    }
                    TagWrapper::Receiver(root) => {
                        insert_singleton(&mut grouped.receivers, target, root, "Receiver");
                    }
                    TagWrapper::Constructor(root) => {
                        insert_singleton(&mut grouped.constructors, target, root, "Constructor");
                    }
                    TagWrapper::Param { name, root } => {
                        insert_named(&mut grouped.params, name, target, root.clone(), "Param");
                    }
                    TagWrapper::See {
                        name,
                        address,
                        root,
                    } => {
                        insert_named(
                            &mut grouped.see_also,
                            name,
                            target,
                            SeeTag {
                                address: address.clone(),
                                root: root.clone(),
                            },
                            "See",
                        );
                    }
                    TagWrapper::OtherNamed { name, root } => {
                        insert_named(
                            &mut grouped.other_named,
                            name,
                            target,
                            root.clone(),
                            "custom",
                        );
                    }
                    TagWrapper::OtherUnnamed { root } => {
                        grouped
                            .other_unnamed
                            .entry(target.clone())
                            .or_default()
                            .push(root.clone());
                    }
                }
            }
        }
        grouped
    }

    pub fn description(&self, target: &Target) -> Option<&DocRoot> {
        self.descriptions.get(target)
    }

    pub fn receiver(&self, target: &Target) -> Option<&DocRoot> {
        self.receivers.get(target)
    }

    pub fn constructor(&self, target: &Target) -> Option<&DocRoot> {
        self.constructors.get(target)
    }

    /// Parameter docs grouped by declared name, then by target.
    pub fn params(&self) -> &BTreeMap<String, PerTarget<DocRoot>> {
        &self.params
    }

    /// See-also entries grouped by declared name, then by target.
    pub fn see_also(&self) -> &BTreeMap<String, PerTarget<SeeTag>> {
        &self.see_also
    }

    pub fn other_named(&self) -> &BTreeMap<String, PerTarget<DocRoot>> {
        &self.other_named
    }

    pub fn other_unnamed(&self, target: &Target) -> &[DocRoot] {
        self.other_unnamed
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_description(&self) -> bool {
        !self.descriptions.is_empty()
    }

    pub fn has_receiver(&self) -> bool {
        !self.receivers.is_empty()
    }

    pub fn has_constructor(&self) -> bool {
        !self.constructors.is_empty()
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn has_see_also(&self) -> bool {
        !self.see_also.is_empty()
    }

    pub fn has_other(&self) -> bool {
        !self.other_named.is_empty() || !self.other_unnamed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
            && self.receivers.is_empty()
            && self.constructors.is_empty()
            && self.params.is_empty()
            && self.see_also.is_empty()
            && self.other_named.is_empty()
            && self.other_unnamed.is_empty()
    }
}

fn insert_singleton(map: &mut PerTarget<DocRoot>, target: &Target, root: &DocRoot, kind: &str) {
    if map.contains_key(target) {
        tracing::warn!(
            "Duplicate {kind} tag under target '{target}', discarding the later one"
        );
        return;
    }
    map.insert(target.clone(), root.clone());
}

fn insert_named<T>(
    map: &mut BTreeMap<String, PerTarget<T>>,
    name: &str,
    target: &Target,
    value: T,
    kind: &str,
) {
    let per_target = map.entry(name.to_string()).or_default();
    if per_target.contains_key(target) {
        tracing::warn!(
            "Duplicate {kind} tag '{name}' under target '{target}', discarding the later one"
        );
        return;
    }
    per_target.insert(target.clone(), value);
}
