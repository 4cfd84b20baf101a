//! Shared fixtures for unit tests.

use std::collections::BTreeMap;

use crate::model::{
    ClasslikeDecl, ClasslikeKind, DeclId, DocNode, DocRoot, DocumentationNode, FunctionDecl,
    ModuleDecl, PackageDecl, PerTarget, TagWrapper, Target,
};

pub fn jvm() -> Target {
    Target::from("jvm")
}

pub fn js() -> Target {
    Target::new("js")
}

pub fn native() -> Target {
    Target::new("native")
}

pub fn description(text: &str) -> TagWrapper {
    TagWrapper::Description(DocRoot {
        children: vec![DocNode::Paragraph(vec![DocNode::Text(text.to_string())])],
    })
}

pub fn param(name: &str, text: &str) -> TagWrapper {
    TagWrapper::Param {
        name: name.to_string(),
        root: DocRoot::text(text),
    }
}

pub fn doc(tags: Vec<TagWrapper>) -> DocumentationNode {
    DocumentationNode::new(tags)
}

pub fn function(name: &str, package: &str, targets: Vec<Target>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_string(),
        id: DeclId::callable(package, None, name),
        targets,
        documentation: BTreeMap::new(),
        inherited: false,
        primary_constructor: false,
    }
}

pub fn classlike(name: &str, package: &str, targets: Vec<Target>) -> ClasslikeDecl {
    ClasslikeDecl {
        name: Some(name.to_string()),
        id: DeclId::classlike(package, name),
        kind: ClasslikeKind::Class,
        targets,
        documentation: BTreeMap::new(),
        constructors: vec![],
        entries: vec![],
        classlikes: vec![],
        functions: vec![],
        properties: vec![],
        inheritors: None,
    }
}

/// One module, one package, one function visible under {jvm, js}: identical descriptions,
/// diverging docs for parameter `arg1`.
pub fn scenario_module() -> ModuleDecl {
    let targets = vec![jvm(), js()];
    let mut documentation: PerTarget<DocumentationNode> = BTreeMap::new();
    documentation.insert(
        jvm(),
        doc(vec![description("Does X"), param("arg1", "jvm: int")]),
    );
    documentation.insert(
        js(),
        doc(vec![description("Does X"), param("arg1", "js: number")]),
    );
    let mut function = function("doX", "com.example", targets.clone());
    function.documentation = documentation;

    ModuleDecl {
        name: "sample".to_string(),
        id: DeclId::default(),
        targets: targets.clone(),
        documentation: BTreeMap::new(),
        packages: vec![PackageDecl {
            name: "com.example".to_string(),
            id: DeclId::package("com.example"),
            targets,
            documentation: BTreeMap::new(),
            classlikes: vec![],
            functions: vec![function],
            properties: vec![],
            typealiases: vec![],
        }],
    }
}
