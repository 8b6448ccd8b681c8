//! AsciiDoc rendering of documentation trees and compound pages.

mod code;
mod context;
mod diagrams;
mod generator;
pub mod labels;
mod options;
mod pages;
mod stream;
mod visitor;

pub use code::{CodeFragment, CodeGenerator, CodeParser, CodeSink, PlainCodeParser, SourceLanguage};
pub use context::RenderContext;
pub use diagrams::{DiagramKind, DiagramRenderer, ExternalTools, SkipDiagrams};
pub use generator::{AsciidocGenerator, GeneratedFile};
pub use options::RenderOptions;
pub use pages::{class_hierarchy, compound_language, listed_compounds, MemberSection};
pub use stream::TextStream;
pub use visitor::AsciidocVisitor;

use crate::error::Result;
use crate::model::{Compound, DocNode};
use std::io::Write;
use std::path::Path;

/// Renders a documentation tree to AsciiDoc.
pub fn render_doc(doc: &DocNode, options: &RenderOptions) -> String {
    let mut ctx = RenderContext::new(options.clone());
    render_doc_with(doc, SourceLanguage::Unknown, &mut ctx)
}

/// Renders a documentation tree using an existing context.
///
/// Diagnostics are collected on `ctx`.
pub fn render_doc_with(doc: &DocNode, language: SourceLanguage, ctx: &mut RenderContext) -> String {
    let mut out = TextStream::new();
    AsciidocVisitor::new(&mut out, ctx, language).visit(doc);
    out.into_string()
}

/// Renders the page of a single compound.
pub fn render_compound(compound: &Compound, options: &RenderOptions) -> GeneratedFile {
    let mut generator = AsciidocGenerator::new(RenderContext::new(options.clone()));
    generator.write_compound(compound)
}

/// Renders a documentation tree to AsciiDoc and writes to a file.
pub fn render_to_file(doc: &DocNode, path: impl AsRef<Path>, options: &RenderOptions) -> Result<()> {
    let content = render_doc(doc, options);
    std::fs::write(path, content)?;
    Ok(())
}

/// Renders a documentation tree to AsciiDoc and writes to a writer.
pub fn render_to_writer<W: Write>(doc: &DocNode, writer: &mut W, options: &RenderOptions) -> Result<()> {
    let content = render_doc(doc, options);
    writer.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompoundKind, Style};

    fn bold_doc() -> DocNode {
        DocNode::root(vec![DocNode::para(vec![
            DocNode::style(Style::Bold, true),
            DocNode::word("important"),
            DocNode::style(Style::Bold, false),
        ])])
    }

    #[test]
    fn test_render_doc() {
        let text = render_doc(&bold_doc(), &RenderOptions::default());
        assert_eq!(text, "\n**important**\n\n");
    }

    #[test]
    fn test_render_to_writer() {
        let mut buf = Vec::new();
        render_to_writer(&bold_doc(), &mut buf, &RenderOptions::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\n**important**\n\n");
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.adoc");
        render_to_file(&bold_doc(), &path, &RenderOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "\n**important**\n\n");
    }

    #[test]
    fn test_render_compound() {
        let compound = Compound::new(CompoundKind::Struct, "Point", "structPoint");
        let page = render_compound(&compound, &RenderOptions::default());
        assert_eq!(page.name, "structPoint.adoc");
        assert_eq!(page.content, "[[structPoint]]\n== Point Struct Reference\n");
    }
}
