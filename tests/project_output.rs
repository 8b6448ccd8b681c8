//! End-to-end generation of a project decoded from JSON.

use adocgen::{AdocGen, Project, RenderOptions};
use std::fs;

const MODEL: &str = r#"{
  "name": "Geo",
  "brief": "Geometry kit",
  "main_page": {
    "kind": "page",
    "name": "index",
    "output_file_base": "index",
    "title": "Geo",
    "detailed": {"node": "root", "children": [
      {"node": "para", "children": [
        {"node": "word", "text": "Welcome"},
        {"node": "symbol", "name": "bogus"}
      ]}
    ]}
  },
  "compounds": [
    {
      "kind": "class",
      "name": "Shape",
      "output_file_base": "classShape",
      "language": "cpp",
      "brief": {"node": "root", "children": [
        {"node": "para", "children": [
          {"node": "word", "text": "Base"},
          {"node": "white_space", "chars": " "},
          {"node": "word", "text": "shape."}
        ]}
      ]},
      "member_lists": [
        {"list_type": "pub_methods", "members": [
          {"kind": "function", "name": "area", "anchor": "a1", "type": "double", "args": "() const",
           "detailed": {"node": "root", "children": [
             {"node": "para", "children": [{"node": "word", "text": "Computes."}]}
           ]}}
        ]}
      ],
      "graphs": [{"kind": "class", "source": "digraph { Shape }"}]
    },
    {
      "kind": "file",
      "name": "shape.h",
      "output_file_base": "shape_8h",
      "source": {"text": "class Shape;\n"},
      "source_file_base": "shape_8h_source"
    }
  ]
}"#;

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_generate_project_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::from_json(MODEL).unwrap();

    let options = RenderOptions::default()
        .with_output_dir(dir.path())
        .with_source_browser();
    let report = AdocGen::new()
        .with_options(options)
        .without_diagrams()
        .project(project)
        .generate()
        .unwrap();

    assert_eq!(
        file_names(&report.files),
        vec![
            "index.adoc",
            "mainpage.adoc",
            "annotated.adoc",
            "files.adoc",
            "classShape.adoc",
            "shape_8h.adoc",
            "shape_8h_source.adoc",
        ]
    );

    // the unknown entity on the main page is the only problem
    assert_eq!(report.error_count(), 1);
    assert!(report.diagnostics[0].message.contains("bogus"));

    let index = fs::read_to_string(dir.path().join("index.adoc")).unwrap();
    assert!(index.starts_with("= Geo: Geometry kit\n:toc: left\n"));
    assert!(index.contains("== Class Documentation\ninclude::classShape.adoc[leveloffset=+1]\n"));
    assert!(index.contains("include::shape_8h_source.adoc[leveloffset=+1]\n"));

    let class = fs::read_to_string(dir.path().join("classShape.adoc")).unwrap();
    assert!(class.starts_with("[[classShape]]\n== Shape Class Reference\n\nBase shape.\n"));
    assert!(class.contains("image::classShape_inherit_graph.png[classShape_inherit_graph]"));
    assert!(class.contains("=== Public Member Functions\ndouble <<classShape_1a1,area>>() const\n"));
    assert!(class.contains("[[classShape_1a1]]\n==== area()\n\n``double area() const``\n"));
    assert!(dir.path().join("classShape_inherit_graph.dot").is_file());

    let source = fs::read_to_string(dir.path().join("shape_8h_source.adoc")).unwrap();
    assert!(source.contains("----\nclass Shape;\n----\n"));
}

#[test]
fn test_invalid_model_is_rejected() {
    let result = Project::from_json(r#"{"name": "X", "compounds": [
        {"kind": "class", "name": "A", "output_file_base": ""}
    ]}"#);
    assert!(matches!(result, Err(adocgen::Error::InvalidModel(_))));
}

#[test]
fn test_without_source_browser_no_listing_pages() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::from_json(MODEL).unwrap();

    let report = AdocGen::new()
        .with_output_dir(dir.path())
        .without_diagrams()
        .project(project)
        .generate()
        .unwrap();

    assert!(!file_names(&report.files).contains(&"shape_8h_source.adoc".to_string()));
    let index = fs::read_to_string(dir.path().join("index.adoc")).unwrap();
    assert!(!index.contains("shape_8h_source"));
}

#[test]
fn test_file_bases_must_stay_in_output_dir() {
    for (output_base, source_base) in [
        ("../escaped", "a_8h_source"),
        ("sub/page", "a_8h_source"),
        ("C:\\\\page", "a_8h_source"),
        ("a_8h", "../escaped_source"),
    ] {
        let json = format!(
            r#"{{"name": "X", "compounds": [
                {{"kind": "file", "name": "a.h", "output_file_base": "{}", "source_file_base": "{}"}}
            ]}}"#,
            output_base, source_base
        );
        let result = Project::from_json(&json);
        assert!(
            matches!(result, Err(adocgen::Error::InvalidModel(_))),
            "{} / {} was accepted",
            output_base,
            source_base
        );
    }
}

#[test]
fn test_generate_rejects_escaping_base() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut project = Project::new("X");
    project.compounds.push(adocgen::Compound::new(
        adocgen::CompoundKind::Class,
        "Escaped",
        "../escaped",
    ));

    let result = AdocGen::new()
        .with_output_dir(&out)
        .without_diagrams()
        .project(project)
        .generate();

    assert!(matches!(result, Err(adocgen::Error::InvalidModel(_))));
    assert!(!dir.path().join("escaped.adoc").exists());
}
