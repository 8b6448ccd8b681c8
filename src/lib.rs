//! # adocgen
//!
//! An AsciiDoc output backend for source-code documentation.
//!
//! The input is a documentation model: compounds (classes, namespaces,
//! files, groups, pages) with their member lists, and documentation
//! comments parsed into an AST of [`DocNode`]s. The output is a set of
//! `.adoc` files tied together by a root `index.adoc` that includes them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use adocgen::{load_project, RenderOptions};
//!
//! fn main() -> adocgen::Result<()> {
//!     let project = load_project("model.json")?;
//!
//!     let options = RenderOptions::default().with_output_dir("asciidoc");
//!     let report = adocgen::generate_with_options(&project, &options)?;
//!
//!     println!("{} files written", report.files.len());
//!     Ok(())
//! }
//! ```
//!
//! Single documentation trees can be rendered with
//! [`render::render_doc`], single compound pages with
//! [`render::render_compound`].

pub mod entity;
pub mod error;
pub mod model;
pub mod output;
pub mod render;
pub mod text;

// Re-exports
pub use error::{Diagnostic, Error, Result, Severity};
pub use model::{
    Compound, CompoundKind, DocNode, MemberDef, MemberList, MemberListType, MemberType, Project,
};
pub use output::{generate, GenerationReport};
pub use render::{
    AsciidocGenerator, AsciidocVisitor, CodeParser, DiagramRenderer, GeneratedFile, RenderContext,
    RenderOptions, SkipDiagrams,
};

use std::path::{Path, PathBuf};

/// Loads a documentation model from a JSON file.
///
/// # Example
///
/// ```no_run
/// use adocgen::load_project;
///
/// let project = load_project("model.json")?;
/// println!("Compounds: {}", project.compounds.len());
/// # Ok::<(), adocgen::Error>(())
/// ```
pub fn load_project(path: impl AsRef<Path>) -> Result<Project> {
    Project::from_path(path)
}

/// Loads a single documentation tree from a JSON file.
pub fn load_doc(path: impl AsRef<Path>) -> Result<DocNode> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Renders a documentation tree to AsciiDoc with default options.
///
/// # Example
///
/// ```
/// use adocgen::{to_asciidoc, DocNode};
///
/// let doc = DocNode::root(vec![DocNode::text_para("Hello, world.")]);
/// assert_eq!(to_asciidoc(&doc), "\nHello, world.\n\n");
/// ```
pub fn to_asciidoc(doc: &DocNode) -> String {
    render::render_doc(doc, &RenderOptions::default())
}

/// Generates the documentation of a project with the given options.
pub fn generate_with_options(project: &Project, options: &RenderOptions) -> Result<GenerationReport> {
    output::generate(project, RenderContext::new(options.clone()))
}

/// Builder for loading and generating documentation.
///
/// Provides a fluent API for configuring a generation run.
///
/// # Example
///
/// ```no_run
/// use adocgen::AdocGen;
///
/// let report = AdocGen::new()
///     .with_output_dir("./docs/api")
///     .with_source_browser()
///     .without_diagrams()
///     .load("model.json")?
///     .generate()?;
/// # Ok::<(), adocgen::Error>(())
/// ```
pub struct AdocGen {
    options: RenderOptions,
    code_parser: Option<Box<dyn CodeParser>>,
    diagrams: Option<Box<dyn DiagramRenderer>>,
}

impl Default for AdocGen {
    fn default() -> Self {
        Self::new()
    }
}

impl AdocGen {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            code_parser: None,
            diagrams: None,
        }
    }

    /// Replaces all rendering options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_output_dir(dir);
        self
    }

    /// Enables source listing pages for files.
    pub fn with_source_browser(mut self) -> Self {
        self.options = self.options.with_source_browser();
        self
    }

    /// Shows member bodies in the member documentation.
    pub fn with_inline_sources(mut self) -> Self {
        self.options = self.options.with_inline_sources();
        self
    }

    /// Enables or disables pretty-printed program listings.
    pub fn with_program_listing(mut self, enabled: bool) -> Self {
        self.options = self.options.with_program_listing(enabled);
        self
    }

    /// Sets the source-code pretty-printer.
    pub fn with_code_parser(mut self, parser: Box<dyn CodeParser>) -> Self {
        self.code_parser = Some(parser);
        self
    }

    /// Sets the diagram renderer.
    pub fn with_diagram_renderer(mut self, renderer: Box<dyn DiagramRenderer>) -> Self {
        self.diagrams = Some(renderer);
        self
    }

    /// Names diagram images without running the external tools.
    pub fn without_diagrams(self) -> Self {
        self.with_diagram_renderer(Box::new(SkipDiagrams))
    }

    /// Builds the render context for this configuration.
    pub fn into_context(self) -> RenderContext {
        let mut ctx = RenderContext::new(self.options);
        if let Some(parser) = self.code_parser {
            ctx = ctx.with_code_parser(parser);
        }
        if let Some(renderer) = self.diagrams {
            ctx = ctx.with_diagram_renderer(renderer);
        }
        ctx
    }

    /// Loads a documentation model from a JSON file.
    pub fn load(self, path: impl AsRef<Path>) -> Result<LoadedProject> {
        let project = load_project(path)?;
        Ok(self.project(project))
    }

    /// Uses an already decoded project.
    pub fn project(self, project: Project) -> LoadedProject {
        LoadedProject {
            project,
            ctx: self.into_context(),
        }
    }
}

/// A loaded project ready for generation.
pub struct LoadedProject {
    project: Project,
    ctx: RenderContext,
}

impl LoadedProject {
    /// Returns a reference to the underlying project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Renders the page of one compound, looked up by name or file base.
    pub fn render_page(&mut self, name: &str) -> Result<GeneratedFile> {
        let compound = self
            .project
            .find(name)
            .ok_or_else(|| Error::CompoundNotFound(name.to_string()))?;
        let mut generator = AsciidocGenerator::new(std::mem::take(&mut self.ctx));
        let page = generator.write_compound(compound);
        self.ctx = generator.into_context();
        Ok(page)
    }

    /// Diagnostics collected by [`render_page`](Self::render_page) calls.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.ctx.diagnostics()
    }

    /// Writes the whole project into the output directory.
    pub fn generate(self) -> Result<GenerationReport> {
        output::generate(&self.project, self.ctx)
    }

    /// Returns the number of compounds in the project.
    pub fn compound_count(&self) -> usize {
        self.project.compounds.len()
    }

    /// Returns the number of members over all compounds.
    pub fn member_count(&self) -> usize {
        self.project.member_count()
    }

    /// Consumes self and returns the underlying project.
    pub fn into_project(self) -> Project {
        self.project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let mut project = Project::new("Geo");
        let mut shape = Compound::new(CompoundKind::Class, "Shape", "classShape");
        shape.member_lists.push(MemberList::new(
            MemberListType::PubMethods,
            vec![MemberDef::new(MemberType::Function, "area", "a1")
                .with_type("double")
                .with_args("()")],
        ));
        project.compounds.push(shape);
        project
    }

    #[test]
    fn test_load_project_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, serde_json::to_string(&sample_project()).unwrap()).unwrap();

        let project = load_project(&path).unwrap();
        assert_eq!(project.name, "Geo");
        assert_eq!(project.member_count(), 1);
    }

    #[test]
    fn test_load_project_missing_file() {
        let result = load_project("/nonexistent/model.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_doc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = DocNode::root(vec![DocNode::text_para("Hi")]);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        assert_eq!(to_asciidoc(&load_doc(&path).unwrap()), "\nHi\n\n");
    }

    #[test]
    fn test_builder_render_page() {
        let mut loaded = AdocGen::new().without_diagrams().project(sample_project());
        assert_eq!(loaded.compound_count(), 1);
        assert_eq!(loaded.member_count(), 1);

        let page = loaded.render_page("Shape").unwrap();
        assert_eq!(page.name, "classShape.adoc");
        assert!(page.content.contains("double <<classShape_1a1,area>>()"));
        assert!(loaded.diagnostics().is_empty());

        match loaded.render_page("Missing") {
            Err(Error::CompoundNotFound(name)) => assert_eq!(name, "Missing"),
            _ => panic!("expected CompoundNotFound"),
        }
    }

    #[test]
    fn test_render_page_with_graph_into_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fresh");
        let mut project = sample_project();
        project.compounds[0].graphs.push(model::DotGraph {
            kind: model::GraphKind::Class,
            source: "digraph { Shape }".to_string(),
        });

        let mut loaded = AdocGen::new()
            .with_output_dir(&out)
            .without_diagrams()
            .project(project.clone());
        let page = loaded.render_page("Shape").unwrap();
        assert!(page.content.contains("image::classShape_inherit_graph.png[classShape_inherit_graph]"));
        assert!(loaded.diagnostics().is_empty());
        assert!(out.join("classShape_inherit_graph.dot").is_file());

        let quiet = dir.path().join("quiet");
        let mut loaded = AdocGen::new()
            .with_options(RenderOptions::default().with_output_dir(&quiet).without_diagram_files())
            .project(project);
        let page = loaded.render_page("Shape").unwrap();
        assert!(page.content.contains("image::classShape_inherit_graph.png[classShape_inherit_graph]"));
        assert!(loaded.diagnostics().is_empty());
        assert!(!quiet.exists());
    }

    #[test]
    fn test_builder_generate() {
        let dir = tempfile::tempdir().unwrap();
        let report = AdocGen::new()
            .with_output_dir(dir.path())
            .with_program_listing(false)
            .project(sample_project())
            .generate()
            .unwrap();
        assert_eq!(report.files.len(), 3);
        assert!(dir.path().join("index.adoc").is_file());
        assert!(dir.path().join("classShape.adoc").is_file());
    }
}
