//! Tests for page tree construction policy.

use super::helpers::*;
use crate::{
    content::{ContentKind, ContentNode},
    model::{
        ClasslikeKind, DeclId, EnumEntryDecl, InheritorsInfo, ModuleDecl, Target,
    },
    pages::{PageKind, PageTreeBuilder, ROOT_MODULE_TITLE},
    signature::PlainSignatureProvider,
};
use std::collections::BTreeMap;
use test_log::test;

fn builder() -> PageTreeBuilder<'static> {
    static SIGNATURES: PlainSignatureProvider = PlainSignatureProvider;
    PageTreeBuilder::new(&SIGNATURES)
}

fn find_all<'a>(node: &'a ContentNode, pred: &dyn Fn(&ContentNode) -> bool) -> Vec<&'a ContentNode> {
    fn walk<'a>(
        node: &'a ContentNode,
        pred: &dyn Fn(&ContentNode) -> bool,
        out: &mut Vec<&'a ContentNode>,
    ) {
        if pred(node) {
            out.push(node);
        }
        for child in node.children() {
            walk(child, pred, out);
        }
    }
    let mut out = Vec::new();
    walk(node, pred, &mut out);
    out
}

fn contains_text(node: &ContentNode, text: &str) -> bool {
    match node {
        ContentNode::Text(t) => t == text,
        _ => node.children().iter().any(|c| contains_text(c, text)),
    }
}

fn link_labels(node: &ContentNode) -> Vec<String> {
    find_all(node, &|n| matches!(n, ContentNode::Link { .. }))
        .into_iter()
        .filter_map(|n| match n {
            ContentNode::Link { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_module_page_shape() {
    let module = scenario_module();
    let page = builder().page_for_module(&module);

    assert_eq!(page.title, "sample");
    assert_eq!(page.kind, PageKind::Module);
    assert_eq!(page.children.len(), 1);
    assert_eq!(page.children[0].title, "com.example");
    assert_eq!(page.children[0].kind, PageKind::Package);
    // The packages listing links to each package.
    let packages = find_all(&page.content, &|n| {
        matches!(n, ContentNode::Group { kind: ContentKind::Packages, .. })
    });
    assert_eq!(packages.len(), 1);
    assert_eq!(link_labels(packages[0]), vec!["com.example".to_string()]);
}

#[test]
fn test_empty_module_name_uses_sentinel_title() {
    let module = ModuleDecl {
        name: String::new(),
        id: DeclId::default(),
        targets: vec![jvm()],
        documentation: BTreeMap::new(),
        packages: vec![],
    };
    let page = builder().page_for_module(&module);
    assert_eq!(page.title, ROOT_MODULE_TITLE);
}

#[test]
fn test_scenario_merged_description_forked_params() {
    let module = scenario_module();
    let page = builder().page_for_module(&module);
    let function_page = &page.children[0].children[0];
    assert_eq!(function_page.title, "doX");

    let groups = find_all(&function_page.content, &|n| {
        matches!(n, ContentNode::PlatformGroup { .. })
    });

    // Exactly one platform group carries the shared description, covering both targets.
    let description_groups: Vec<_> = groups
        .iter()
        .filter(|g| contains_text(g, "Does X"))
        .collect();
    assert_eq!(description_groups.len(), 1);
    match description_groups[0] {
        ContentNode::PlatformGroup { targets, .. } => {
            assert_eq!(targets, &[jvm(), js()]);
        }
        _ => unreachable!(),
    }

    // The parameter table forks: one singleton platform group per target.
    let param_groups: Vec<_> = groups
        .iter()
        .filter(|g| {
            !find_all(g, &|n| {
                matches!(n, ContentNode::Table { kind: ContentKind::Parameters, .. })
            })
            .is_empty()
        })
        .collect();
    assert_eq!(param_groups.len(), 2);
    assert!(contains_text(param_groups[0], "jvm: int"));
    assert!(contains_text(param_groups[1], "js: number"));
    for group in param_groups {
        match group {
            ContentNode::PlatformGroup { targets, .. } => assert_eq!(targets.len(), 1),
            _ => unreachable!(),
        }
    }
}

#[test]
fn test_undocumented_target_contributes_no_platform_group() {
    let mut module = scenario_module();
    // native is visible but carries no documentation node anywhere.
    module.targets.push(native());
    module.packages[0].targets.push(native());
    module.packages[0].functions[0].targets.push(native());

    let page = builder().page_for_module(&module);
    let function_page = &page.children[0].children[0];
    let groups = find_all(&function_page.content, &|n| {
        matches!(n, ContentNode::PlatformGroup { .. })
    });
    for group in groups {
        if let ContentNode::PlatformGroup { targets, children } = group {
            // Signature hints may cover native; comment-derived groups must not.
            if children.iter().any(|c| contains_text(c, "Does X"))
                || children
                    .iter()
                    .any(|c| contains_text(c, "jvm: int") || contains_text(c, "js: number"))
            {
                assert!(!targets.contains(&native()));
            }
        }
    }
}

#[test]
fn test_inherited_members_filtered_from_listings() {
    let targets = vec![jvm()];
    let mut container = classlike("Widget", "com.example", targets.clone());
    let mut own = function("a", "com.example", targets.clone());
    own.id = DeclId::callable("com.example", Some("Widget".to_string()), "a");
    let mut inherited = function("b", "com.example", targets.clone());
    inherited.id = DeclId::callable("com.example", Some("Widget".to_string()), "b");
    inherited.inherited = true;
    let mut overridden = function("c", "com.example", targets.clone());
    overridden.id = DeclId::callable("com.example", Some("Widget".to_string()), "c");
    // Re-declared here: inherited-but-overridden members list normally.
    overridden.inherited = false;
    container.functions = vec![own, inherited, overridden];

    let page = builder().page_for_classlike(&container);
    let functions_block = find_all(&page.content, &|n| {
        matches!(n, ContentNode::Group { kind: ContentKind::Functions, .. })
    });
    assert_eq!(functions_block.len(), 1);
    assert_eq!(
        link_labels(functions_block[0]),
        vec!["a".to_string(), "c".to_string()]
    );
    // Filtering applies to pages below the container as well.
    let titles: Vec<&str> = page.children.iter().map(|c| c.title.as_str()).collect();
    assert!(titles.contains(&"a"));
    assert!(!titles.contains(&"b"));
    assert!(titles.contains(&"c"));
}

#[test]
fn test_primary_constructor_excluded_from_listing() {
    let targets = vec![jvm()];
    let mut container = classlike("Widget", "com.example", targets.clone());
    let mut primary = function("Widget", "com.example", targets.clone());
    primary.primary_constructor = true;
    let secondary = function("Widget", "com.example", targets.clone());
    container.constructors = vec![primary, secondary];

    let page = builder().page_for_classlike(&container);
    let constructors_block = find_all(&page.content, &|n| {
        matches!(n, ContentNode::Group { kind: ContentKind::Constructors, .. })
    });
    assert_eq!(constructors_block.len(), 1);
    assert_eq!(link_labels(constructors_block[0]).len(), 1);
    // Both constructors still get pages.
    assert_eq!(page.children.len(), 2);
}

#[test]
fn test_enum_page_lists_entries() {
    let targets = vec![jvm()];
    let mut decl = classlike("Direction", "com.example", targets.clone());
    decl.kind = ClasslikeKind::Enum;
    decl.entries = vec![EnumEntryDecl {
        name: "NORTH".to_string(),
        id: DeclId::classlike("com.example", "Direction.NORTH"),
        targets,
        documentation: BTreeMap::new(),
        classlikes: vec![],
        functions: vec![],
    }];

    let page = builder().page_for_classlike(&decl);
    let entries_block = find_all(&page.content, &|n| {
        matches!(n, ContentNode::Group { kind: ContentKind::Entries, .. })
    });
    assert_eq!(entries_block.len(), 1);
    assert_eq!(link_labels(entries_block[0]), vec!["NORTH".to_string()]);
    assert_eq!(page.children.len(), 1);
    assert_eq!(page.children[0].title, "NORTH");
}

#[test]
fn test_inheritors_table_with_fallback_label() {
    let targets = vec![jvm(), js()];
    let mut decl = classlike("Base", "com.example", targets.clone());
    let named = DeclId::classlike("com.example", "Sub");
    // A reference with no class name falls back to its raw identifier form.
    let nameless = DeclId::callable("com.example", None, "mystery");
    let mut info: BTreeMap<Target, Vec<DeclId>> = BTreeMap::new();
    info.insert(jvm(), vec![named.clone(), nameless.clone()]);
    info.insert(js(), vec![named.clone()]);
    let info = InheritorsInfo(info);
    assert!(!info.is_empty());
    decl.inheritors = Some(info);

    let page = builder().page_for_classlike(&decl);
    let table = find_all(&page.content, &|n| {
        matches!(n, ContentNode::Table { kind: ContentKind::Inheritors, .. })
    });
    assert_eq!(table.len(), 1);
    let labels = link_labels(table[0]);
    assert!(labels.contains(&"Sub".to_string()));
    assert!(labels.contains(&"com.example/mystery".to_string()));

    // The named inheritor's row covers both reporting targets in canonical order.
    let rows = find_all(table[0], &|n| matches!(n, ContentNode::PlatformGroup { .. }));
    let sub_row = rows
        .iter()
        .find(|r| link_labels(r).contains(&"Sub".to_string()))
        .unwrap();
    match sub_row {
        ContentNode::PlatformGroup { targets, .. } => assert_eq!(targets, &[jvm(), js()]),
        _ => unreachable!(),
    }
}

#[test]
fn test_page_tree_serializes() {
    let module = scenario_module();
    let page = builder().page_for_module(&module);
    assert_eq!(page.page_count(), 3);
    let json = page.to_json().unwrap();
    assert!(json.contains("\"doX\""));
}

#[test]
fn test_model_built_in_test_flags_orphan_documentation() {
    let mut module = scenario_module();
    assert!(module.built_in_test().is_empty());
    // Documenting a target the function is not visible under violates the invariant.
    module.packages[0].functions[0]
        .documentation
        .insert(native(), doc(vec![description("stray")]));
    let errors = module.built_in_test();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("native"));
}
