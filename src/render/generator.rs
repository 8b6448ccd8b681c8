//! AsciiDoc generator: section markup for compound pages.
//!
//! [`AsciidocGenerator`] owns the output stream of the page being written
//! and offers the small writing primitives the page writers in
//! [`pages`](super::pages) are assembled from: titles, member headers,
//! member items, anchors, description tables, code fragments and graphs.
//! Documentation trees are handed to an [`AsciidocVisitor`].

use super::code::{CodeFragment, CodeGenerator, CodeParser, PlainCodeParser, SourceLanguage};
use super::diagrams::DiagramKind;
use super::labels;
use super::visitor::AsciidocVisitor;
use super::{RenderContext, TextStream};
use crate::model::{DocNode, DotGraph};
use crate::text::{anchor_id, convert_to_asciidoc, sanitize_id, strip_path};
use std::path::PathBuf;

/// A finished output page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory, including `.adoc`.
    pub name: String,
    pub content: String,
}

/// Writes AsciiDoc pages one at a time.
pub struct AsciidocGenerator {
    out: TextStream,
    ctx: RenderContext,
    file_name: String,
    dense_text: bool,
    in_group: bool,
    /// One "item already written" flag per member list level.
    list_items: Vec<bool>,
    desc_table: bool,
    page_ref: bool,
}

impl AsciidocGenerator {
    pub fn new(ctx: RenderContext) -> Self {
        Self {
            out: TextStream::new(),
            ctx,
            file_name: String::new(),
            dense_text: false,
            in_group: false,
            list_items: vec![false],
            desc_table: false,
            page_ref: false,
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    pub fn into_context(self) -> RenderContext {
        self.ctx
    }

    /// Text written so far for the current page.
    pub fn output(&self) -> &str {
        self.out.as_str()
    }

    /// Name of the page being written.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // ---- files ----

    /// Starts a new page.
    ///
    /// `refman` is the root document and becomes `index.adoc`; `index` is
    /// the main page and becomes `mainpage.adoc`. Every page except the
    /// root opens with an anchor named after it.
    pub fn start_file(&mut self, name: &str) {
        let name = name.strip_suffix(".adoc").unwrap_or(name);
        let page = match name {
            "refman" => "index",
            "index" => "mainpage",
            other => other,
        };
        self.out = TextStream::new();
        self.file_name = format!("{}.adoc", page);
        self.list_items = vec![false];
        self.dense_text = false;
        self.in_group = false;
        self.desc_table = false;
        self.page_ref = false;
        tracing::debug!(file = %self.file_name, "start file");

        if page != "index" {
            self.out.push_str("[[");
            self.out.push_str(&sanitize_id(strip_path(page)));
            self.out.push_str("]]\n");
        }
    }

    /// Finishes the current page and returns it.
    pub fn finish_file(&mut self) -> GeneratedFile {
        self.out.ensure_newline();
        GeneratedFile {
            name: std::mem::take(&mut self.file_name),
            content: self.out.take(),
        }
    }

    // ---- text ----

    /// Writes text verbatim.
    pub fn write_string(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Ends the current paragraph unless a blank line is already there.
    pub fn ensure_blank_line(&mut self) {
        self.out.vspace();
    }

    /// Writes escaped text; suppressed inside a page reference.
    pub fn docify(&mut self, text: &str) {
        if self.page_ref {
            return;
        }
        self.out.push_str(&convert_to_asciidoc(text));
    }

    /// Writes a cross reference to `file` (and `anchor` inside it).
    pub fn write_object_link(&mut self, file: &str, anchor: Option<&str>, text: &str) {
        self.out.push_str("<<");
        self.out.push_str(&anchor_id(file, anchor.unwrap_or("")));
        self.out.push(',');
        self.docify(text);
        self.out.push_str(">>");
    }

    pub fn start_page_ref(&mut self) {
        self.page_ref = true;
    }

    pub fn end_page_ref(&mut self) {
        self.page_ref = false;
    }

    pub fn line_break(&mut self) {
        if self.dense_text {
            self.out.push_str(" +\n");
        } else {
            self.out.push_str("\n\n");
        }
    }

    pub fn write_non_breakable_space(&mut self, n: usize) {
        for _ in 0..n {
            self.out.push_str("{nbsp}");
        }
    }

    /// Opens a block of text; dense blocks are set in monospace.
    pub fn start_text_block(&mut self, dense: bool) {
        if dense {
            self.dense_text = true;
            self.out.push_str("``");
        }
    }

    pub fn end_text_block(&mut self) {
        if self.dense_text {
            self.dense_text = false;
            self.out.push_str("``\n\n");
        }
    }

    pub fn start_bold(&mut self) {
        self.out.push_str("**");
    }

    pub fn end_bold(&mut self) {
        self.out.push_str("**");
    }

    pub fn start_emphasis(&mut self) {
        if !self.dense_text {
            self.out.push_str("__");
        }
    }

    pub fn end_emphasis(&mut self) {
        if !self.dense_text {
            self.out.push_str("__");
        }
    }

    pub fn start_typewriter(&mut self) {
        if !self.dense_text {
            self.out.push_str("``");
        }
    }

    pub fn end_typewriter(&mut self) {
        if !self.dense_text {
            self.out.push_str("``");
        }
    }

    pub fn start_small(&mut self) {
        self.out.push_str("[.small]#");
    }

    pub fn end_small(&mut self) {
        self.out.push('#');
    }

    /// Writes one label of a label list (`inline`, `static`, ...).
    pub fn write_label(&mut self, label: &str, is_last: bool) {
        self.out.push_str(" [.small]#");
        self.docify(label);
        self.out.push('#');
        if !is_last {
            self.out.push(',');
        }
    }

    /// Writes all labels of an entity.
    pub fn write_labels(&mut self, labels: &[String]) {
        for (i, label) in labels.iter().enumerate() {
            self.write_label(label, i + 1 == labels.len());
        }
    }

    // ---- headings ----

    pub fn start_title_head(&mut self) {
        self.out.push_str("== ");
    }

    pub fn end_title_head(&mut self) {
        self.out.endl();
    }

    pub fn start_member_header(&mut self) {
        self.out.vspace();
        self.out.push_str("=== ");
    }

    pub fn end_member_header(&mut self) {
        self.out.endl();
    }

    pub fn start_group_header(&mut self) {
        self.out.vspace();
        self.out.push_str("=== ");
    }

    pub fn end_group_header(&mut self) {
        self.out.push_str("\n\n");
    }

    /// Separates member groups.
    pub fn write_ruler(&mut self) {
        if self.in_group {
            self.out.endl();
        }
        self.in_group = false;
    }

    pub fn start_examples(&mut self) {
        self.out.vspace();
        self.out.push_str("=== ");
        self.docify(labels::EXAMPLES);
    }

    pub fn end_examples(&mut self) {
        self.out.endl();
    }

    pub fn start_section(&mut self, label: &str) {
        self.out.push_str("[[");
        self.out.push_str(&sanitize_id(strip_path(label)));
        self.out.push_str("]] ");
    }

    pub fn start_subsection(&mut self) {
        self.out.push_str("== ");
    }

    pub fn end_subsection(&mut self) {
        self.out.endl();
    }

    pub fn start_subsubsection(&mut self) {
        self.out.push_str("=== ");
    }

    pub fn end_subsubsection(&mut self) {
        self.out.endl();
    }

    // ---- member lists ----

    /// Enters a (possibly nested) member list.
    pub fn start_member_list(&mut self) {
        self.list_items.push(false);
    }

    /// Leaves the current member list.
    pub fn end_member_list(&mut self) {
        if self.list_items.len() > 1 {
            self.list_items.pop();
        } else {
            self.list_items[0] = false;
        }
        self.out.endl();
    }

    /// Current member list nesting level.
    pub fn member_list_level(&self) -> usize {
        self.list_items.len() - 1
    }

    /// Starts a member line; items after the first are separated by a
    /// blank line.
    pub fn start_member_item(&mut self) {
        if let Some(written) = self.list_items.last_mut() {
            if *written {
                self.out.endl();
            }
            *written = true;
        }
    }

    /// Ends a member line; a hard line break is used when a description
    /// follows.
    pub fn end_member_item(&mut self, has_description: bool) {
        if has_description {
            self.out.push_str(" +\n");
        } else {
            self.out.endl();
        }
    }

    pub fn start_member_description(&mut self) {
        self.start_small();
    }

    pub fn end_member_description(&mut self) {
        self.end_small();
        self.out.endl();
    }

    /// Opens the documentation section of one member.
    ///
    /// Overloaded members are numbered `[n/total]`.
    pub fn start_member_doc(&mut self, title: &str, count: usize, total: usize) {
        self.out.push_str("==== ");
        self.docify(title);
        self.out.push_str("\n\n");
        if total > 1 {
            self.out.push_str(&format!("[.small]#[{}/{}]#\n", count, total));
        }
        self.out.push_str("``");
    }

    pub fn end_member_doc(&mut self) {
        self.out.push_str("``\n");
    }

    pub fn end_member_doc_list(&mut self) {
        self.in_group = true;
    }

    /// Writes the anchor of a documented entity.
    pub fn start_doxy_anchor(&mut self, file: &str, anchor: &str) {
        self.out.push_str("[[");
        self.out.push_str(&anchor_id(file, anchor));
        self.out.push_str("]]\n");
    }

    pub fn end_doxy_anchor(&mut self) {
        self.out.endl();
    }

    // ---- description tables ----

    pub fn start_desc_table(&mut self) {
        self.out.push_str("[cols=\"1,5\"]\n|===\n");
        self.desc_table = true;
    }

    pub fn end_desc_table(&mut self) {
        self.out.push_str("|===\n");
        self.desc_table = false;
    }

    /// Whether a description table is open.
    pub fn in_desc_table(&self) -> bool {
        self.desc_table
    }

    pub fn start_desc_table_row(&mut self) {
        self.out.push('|');
    }

    pub fn end_desc_table_title(&mut self) {
        self.out.endl();
    }

    pub fn start_desc_table_data(&mut self) {
        self.out.push_str("| ");
    }

    pub fn end_desc_table_data(&mut self) {
        self.out.endl();
    }

    // ---- constraint lists ----

    pub fn start_constraint_list(&mut self, header: &str) {
        self.out.push_str("==== ");
        self.docify(header);
        self.out.push_str("\n\n");
    }

    pub fn start_constraint_param(&mut self) {
        self.out.push_str("NOTE: ");
    }

    pub fn start_constraint_type(&mut self) {
        self.out.push_str(" : __");
    }

    pub fn end_constraint_type(&mut self) {
        self.out.push_str("__\n");
    }

    // ---- content ----

    /// Renders a documentation tree at the current position.
    pub fn write_doc(&mut self, doc: &DocNode, language: SourceLanguage) {
        AsciidocVisitor::new(&mut self.out, &mut self.ctx, language).visit(doc);
    }

    /// Renders a documentation tree onto a single line.
    pub fn inline_doc(&mut self, doc: &DocNode, language: SourceLanguage) -> String {
        let mut scratch = TextStream::new();
        AsciidocVisitor::new(&mut scratch, &mut self.ctx, language).visit(doc);
        scratch
            .as_str()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Writes a code listing.
    ///
    /// With program listings enabled the code goes through the context's
    /// pretty-printer; otherwise it is printed without links.
    pub fn write_code(&mut self, text: &str, language: SourceLanguage, line_numbers: Option<u32>) {
        let mut fragment = CodeFragment::new(text, language);
        if let Some(start) = line_numbers {
            fragment = fragment.with_line_numbers(start);
        }
        let mut code = CodeGenerator::new(&mut self.out, self.ctx.options().tab_size);
        code.start_code_fragment(&fragment);
        if self.ctx.options().program_listing {
            self.ctx.code_parser().parse_code(&mut code, &fragment);
        } else {
            PlainCodeParser.parse_code(&mut code, &fragment);
        }
        code.end_code_fragment();
    }

    /// Renders a dependency graph of `base` and references the image.
    pub fn write_graph(&mut self, graph: &DotGraph, base: &str, name: &str) {
        let file_base = format!("{}_{}", base, graph.kind.file_suffix());
        let source = format!("{}.dot", file_base);
        let source = if self.ctx.options().write_diagrams {
            match self.ctx.write_diagram_source(&source, &graph.source) {
                Some(path) => path,
                None => return,
            }
        } else {
            PathBuf::from(source)
        };
        let image = self.ctx.render_diagram(DiagramKind::Dot, &source, &file_base);

        self.out.vspace();
        self.docify(&labels::graph_caption(graph.kind, name));
        self.out.push_str("\n\n");
        let relative = self.ctx.options().relative_path.clone();
        self.out.push_str(&format!("image::{}{}[{}]\n\n", relative, image, file_base));
    }

    /// Writes an include line for another page.
    pub fn write_include(&mut self, base: &str) {
        self.out.push_str("include::");
        self.out.push_str(base);
        self.out.push_str(".adoc[leveloffset=+1]\n");
    }
}
