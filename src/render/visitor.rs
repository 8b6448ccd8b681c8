//! AsciiDoc visitor for the documentation AST.
//!
//! [`AsciidocVisitor`] walks a [`DocNode`] tree and prints the AsciiDoc markup
//! for every node kind into a [`TextStream`]. Markup that must wrap a
//! node's children (lists, table cells, parameter descriptions) is produced
//! by capturing the children into a scratch stream first.
//!
//! Output can be suppressed with the hidden stack: while hidden, nothing is
//! written and no side effects (image copies, diagram rendering,
//! diagnostics) take place.

use super::code::{CodeFragment, CodeGenerator, CodeSink, SourceLanguage};
use super::diagrams::DiagramKind;
use super::labels;
use super::{RenderContext, TextStream};
use crate::entity;
use crate::model::{
    DescListEntry, DiagramFile, DocNode, Formula, HtmlTable, Image, ImageKind, IncOperator,
    IncOperatorKind, Include, IncludeKind, ListItem, ParamDirection, ParamSect, Ref, SecRefItem,
    SimpleSectKind, Style, Verbatim, VerbatimKind,
};
use crate::text::{
    anchor_id, block_delimiter, convert_to_asciidoc, extract_block, line_block, strip_extension, strip_path,
    strip_formula_delimiters,
};
use std::path::{Path, PathBuf};

/// Characters of AsciiDoc block delimiter lines.
const BLOCK_DELIMITER_CHARS: [char; 5] = ['-', '.', '_', '=', '+'];

/// Delimiters of blocks whose content is taken verbatim.
const VERBATIM_DELIMITER_CHARS: [char; 3] = ['-', '.', '+'];

/// Prints AsciiDoc markup for documentation nodes.
pub struct AsciidocVisitor<'a> {
    out: &'a mut TextStream,
    ctx: &'a mut RenderContext,
    language: SourceLanguage,
    inside_pre: bool,
    inside_code: bool,
    hide: bool,
    hidden_stack: Vec<bool>,
    list_depth: usize,
}

impl<'a> AsciidocVisitor<'a> {
    /// Creates a visitor writing into `out`.
    ///
    /// `language` is used for code blocks that do not name their own
    /// language.
    pub fn new(out: &'a mut TextStream, ctx: &'a mut RenderContext, language: SourceLanguage) -> Self {
        Self {
            out,
            ctx,
            language,
            inside_pre: false,
            inside_code: false,
            hide: false,
            hidden_stack: Vec::new(),
            list_depth: 0,
        }
    }

    /// Whether output is currently suppressed.
    pub fn is_hidden(&self) -> bool {
        self.hide
    }

    /// Saves the hidden state and replaces it with `hide`.
    pub fn push_hidden(&mut self, hide: bool) {
        self.hidden_stack.push(self.hide);
        self.hide = hide;
    }

    /// Restores the hidden state saved by the matching [`push_hidden`](Self::push_hidden).
    pub fn pop_hidden(&mut self) {
        match self.hidden_stack.pop() {
            Some(hide) => self.hide = hide,
            None => self.ctx.error("internal error: hidden state stack is empty"),
        }
    }

    /// Current list nesting depth.
    pub fn list_depth(&self) -> usize {
        self.list_depth
    }

    /// Visits a sequence of nodes.
    pub fn visit_all(&mut self, nodes: &[DocNode]) {
        for node in nodes {
            self.visit(node);
        }
    }

    /// Prints the markup for `node` and its children.
    pub fn visit(&mut self, node: &DocNode) {
        match node {
            DocNode::Word { text } => self.filter(text),
            DocNode::LinkedWord { word, file, anchor } => {
                self.start_link(file, anchor);
                self.filter(word);
                self.end_link();
            }
            DocNode::WhiteSpace { chars } => {
                if self.inside_pre {
                    self.write(chars);
                } else if self.inside_code {
                    // inline code collapses runs of spaces
                    self.write(&"{nbsp}".repeat(chars.chars().count()));
                } else {
                    self.write(" ");
                }
            }
            DocNode::Symbol { name } => self.symbol(name),
            DocNode::Url { url, is_email } => self.url(url, *is_email),
            DocNode::LineBreak => {
                if self.inside_pre {
                    self.write("\n");
                } else {
                    self.write(" +\n");
                }
            }
            DocNode::HorRuler => self.write("\n\n'''\n\n"),
            DocNode::StyleChange { style, enable } => self.style_change(*style, *enable),
            DocNode::Verbatim(v) => self.verbatim(v),
            DocNode::Anchor { file, anchor } => {
                let id = anchor_id(file, anchor);
                self.write("[[");
                self.write(&id);
                self.write("]]");
            }
            DocNode::Include(inc) => self.include(inc),
            DocNode::IncOperator(op) => self.inc_operator(op),
            DocNode::Formula(f) => self.formula(f),
            DocNode::IndexEntry { entry } => {
                self.write("(((");
                self.filter(entry);
                self.write(")))");
            }
            DocNode::SimpleSectSep => {}
            DocNode::Cite { file, anchor, text } => {
                if file.is_empty() {
                    self.filter(text);
                } else {
                    self.start_link(file, anchor);
                    self.filter(text);
                    self.end_link();
                }
            }

            DocNode::Root { children } => {
                self.visit_all(children);
                self.write("\n");
            }
            DocNode::Para { children } => {
                self.write("\n");
                self.visit_all(children);
                self.write("\n");
            }
            DocNode::Text { children } => {
                self.visit_all(children);
                self.write("\n\n");
            }
            DocNode::AutoList { is_enum, items } => self.list(*is_enum, items),
            DocNode::SimpleList { items } => self.list(false, items),
            DocNode::HtmlList { ordered, items } => self.list(*ordered, items),
            DocNode::SimpleSect { kind, children } => self.simple_sect(*kind, children),
            DocNode::Title { children } => {
                if !children.is_empty() {
                    self.write("\n\n==== ");
                    self.visit_all(children);
                    self.write("\n");
                }
            }
            DocNode::Section {
                file,
                anchor,
                title,
                level,
                children,
            } => {
                let id = anchor_id(file, anchor);
                self.write("\n\n[[");
                self.write(&id);
                self.write("]]\n");
                self.write(&"=".repeat((*level as usize + 2).min(6)));
                self.write(" ");
                self.filter(title);
                self.write("\n");
                self.visit_all(children);
                self.write("\n");
            }
            DocNode::HtmlDescList { entries } => self.desc_list(entries),
            DocNode::HtmlTable(table) => self.table(table),
            DocNode::HtmlHeader { level, children } => {
                self.write("\n\n[discrete]\n");
                self.write(&"=".repeat(usize::from((*level).clamp(1, 5)) + 1));
                self.write(" ");
                self.visit_all(children);
                self.write("\n");
            }
            DocNode::HtmlBlockQuote { children } => {
                self.write("\n[quote]\n____\n");
                self.visit_all(children);
                self.new_line();
                self.write("____\n");
            }
            DocNode::HRef { url, children } => {
                self.write("link:++");
                self.write(url);
                self.write("++[");
                self.visit_all(children);
                self.write("]");
            }
            DocNode::Image(img) => self.image(img),
            DocNode::DotFile(f) => self.diagram_file(DiagramKind::Dot, f),
            DocNode::MscFile(f) => self.diagram_file(DiagramKind::Msc, f),
            DocNode::DiaFile(f) => self.diagram_file(DiagramKind::Dia, f),
            DocNode::Link {
                file,
                anchor,
                children,
            } => {
                self.start_link(file, anchor);
                self.visit_all(children);
                self.end_link();
            }
            DocNode::Ref(r) => self.reference(r),
            DocNode::SecRefList { items } => self.sec_ref_list(items),
            DocNode::ParamSect(sect) => self.param_sect(sect),
            DocNode::XRefItem {
                file,
                anchor,
                title,
                children,
            } => {
                if title.is_empty() {
                    self.visit_all(children);
                } else {
                    let id = anchor_id(file, anchor);
                    self.write("[[");
                    self.write(&id);
                    self.write(",");
                    self.filter(title);
                    self.write("]] ");
                    self.visit_all(children);
                    self.write("\n\n");
                }
            }
            DocNode::InternalRef {
                file,
                anchor,
                children,
            } => {
                self.start_link(file, anchor);
                self.visit_all(children);
                self.end_link();
                self.write(" ");
            }
            DocNode::Internal { children }
            | DocNode::Copy { children }
            | DocNode::VhdlFlow { children }
            | DocNode::ParBlock { children } => self.visit_all(children),
        }
    }

    // ---- output primitives ----

    fn write(&mut self, s: &str) {
        if !self.hide {
            self.out.push_str(s);
        }
    }

    /// Writes text, escaped unless inside a literal block.
    fn filter(&mut self, s: &str) {
        if self.hide {
            return;
        }
        if self.inside_pre {
            self.out.push_str(s);
        } else {
            self.out.push_str(&convert_to_asciidoc(s));
        }
    }

    fn new_line(&mut self) {
        if !self.hide {
            self.out.ensure_newline();
        }
    }

    fn blank_line(&mut self) {
        if !self.hide {
            self.out.vspace();
        }
    }

    /// Runs `f` with an empty output stream and returns what it wrote.
    fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut *self.out);
        f(self);
        std::mem::replace(&mut *self.out, saved).into_string()
    }

    fn start_link(&mut self, file: &str, anchor: &str) {
        let id = anchor_id(file, anchor);
        self.write("<<");
        self.write(&id);
        self.write(",");
    }

    fn end_link(&mut self) {
        self.write(">>");
    }

    fn language_for(&self, file: &str) -> SourceLanguage {
        match SourceLanguage::from_extension(file) {
            SourceLanguage::Unknown => self.language,
            language => language,
        }
    }

    // ---- leaves ----

    fn symbol(&mut self, name: &str) {
        if self.hide {
            return;
        }
        match entity::asciidoc(name) {
            Some(text) => self.out.push_str(text),
            None => self
                .ctx
                .error(format!("non supported HTML-entity found: &{};", name)),
        }
    }

    fn url(&mut self, url: &str, is_email: bool) {
        if is_email {
            self.write("mailto:");
            self.write(url);
        } else {
            self.write("link:++");
            self.write(url);
            self.write("++");
        }
        self.write("[");
        self.filter(url);
        self.write("]");
    }

    fn style_change(&mut self, style: Style, enable: bool) {
        if self.hide {
            return;
        }
        match style {
            Style::Bold => self.write("**"),
            Style::Italic => self.write("__"),
            Style::Code => {
                self.write("``");
                self.inside_code = enable;
            }
            Style::Subscript => self.write("~"),
            Style::Superscript => self.write("^"),
            Style::Small => self.write(if enable { "[.small]#" } else { "#" }),
            Style::Strike => self.write(if enable { "[.line-through]#" } else { "#" }),
            Style::Underline => self.write(if enable { "[.underline]#" } else { "#" }),
            Style::Center => {
                self.new_line();
                if enable {
                    self.write("[.text-center]\n");
                }
            }
            Style::Preformatted => {
                self.new_line();
                if enable {
                    self.write("\n[literal]\n....\n");
                } else {
                    self.write("....\n");
                }
                self.inside_pre = enable;
            }
            Style::Span | Style::Div => {}
        }
    }

    fn verbatim(&mut self, v: &Verbatim) {
        match v.kind {
            VerbatimKind::Code => {
                let language = match &v.language {
                    Some(ext) => self.language_for(ext),
                    None => self.language,
                };
                self.code_block(&v.text, language, None);
            }
            VerbatimKind::Verbatim => self.delimited_block("[source]", '-', &v.text),
            VerbatimKind::AsciidocOnly => self.write(&v.text),
            VerbatimKind::HtmlOnly
            | VerbatimKind::ManOnly
            | VerbatimKind::RtfOnly
            | VerbatimKind::LatexOnly
            | VerbatimKind::XmlOnly
            | VerbatimKind::DocbookOnly => {}
            VerbatimKind::Dot => self.inline_diagram(DiagramKind::Dot, v),
            VerbatimKind::Msc => self.inline_diagram(DiagramKind::Msc, v),
            VerbatimKind::PlantUml => self.inline_diagram(DiagramKind::PlantUml, v),
        }
    }

    /// Pretty-prints `text` as a listing block.
    fn code_block(&mut self, text: &str, language: SourceLanguage, line_numbers: Option<u32>) {
        if self.hide {
            return;
        }
        let mut fragment = CodeFragment::new(text, language);
        if let Some(start) = line_numbers {
            fragment = fragment.with_line_numbers(start);
        }
        let mut code = CodeGenerator::new(&mut *self.out, self.ctx.options().tab_size);
        code.start_code_fragment(&fragment);
        self.ctx.code_parser().parse_code(&mut code, &fragment);
        code.end_code_fragment();
    }

    fn include(&mut self, inc: &Include) {
        let language = self.language_for(&inc.file);
        match inc.kind {
            IncludeKind::Include => self.code_block(&inc.text, language, None),
            IncludeKind::IncWithLines => self.code_block(&inc.text, language, Some(1)),
            IncludeKind::DontInclude | IncludeKind::HtmlInclude | IncludeKind::LatexInclude => {}
            IncludeKind::VerbInclude => self.delimited_block("[literal]", '.', &inc.text),
            IncludeKind::Snippet => {
                let block = extract_block(&inc.text, &inc.block_id);
                self.code_block(&block, language, None);
            }
            IncludeKind::SnipWithLines => {
                let block = extract_block(&inc.text, &inc.block_id);
                let start = line_block(&inc.text, &inc.block_id);
                self.code_block(&block, language, Some(start));
            }
            IncludeKind::SnippetDoc | IncludeKind::IncludeDoc => {
                if !self.hide {
                    self.ctx.error(format!(
                        "internal inconsistency: found switch SnippetDoc / IncludeDoc in file: {}",
                        inc.file
                    ));
                }
            }
        }
    }

    /// Handles `\line`, `\skip`, `\skipline` and `\until` after `\dontinclude`.
    ///
    /// The listing is opened by the first operator and closed by the last;
    /// everything between two operators is hidden.
    fn inc_operator(&mut self, op: &IncOperator) {
        let language = self.language_for(&op.file);
        if op.is_first {
            if !self.hide {
                self.out.ensure_newline();
                self.out.endl();
                self.out.push_str(&language.source_attributes(None));
                self.out.push_str("\n----\n");
            }
            self.push_hidden(true);
        }
        if op.kind != IncOperatorKind::Skip {
            self.pop_hidden();
            if !self.hide {
                let fragment = CodeFragment::new(&op.text, language);
                let mut code = CodeGenerator::new(&mut *self.out, self.ctx.options().tab_size);
                self.ctx.code_parser().parse_code(&mut code, &fragment);
                code.finish();
            }
            self.push_hidden(true);
        }
        if op.is_last {
            self.pop_hidden();
            self.new_line();
            self.write("----\n");
        }
    }

    fn formula(&mut self, f: &Formula) {
        let tex = strip_formula_delimiters(&f.text).to_string();
        if f.inline {
            self.write("latexmath:[");
            self.write(&tex.replace(']', "\\]"));
            self.write("]");
        } else {
            self.delimited_block("[latexmath]", '+', &tex);
        }
    }

    /// Writes `text` verbatim inside a delimited block opened by `style`.
    fn delimited_block(&mut self, style: &str, c: char, text: &str) {
        let delimiter = block_delimiter(text, c);
        self.new_line();
        self.write(&format!("\n{}\n{}\n", style, delimiter));
        self.write(text);
        self.new_line();
        self.write(&delimiter);
        self.write("\n");
    }

    // ---- blocks ----

    fn list(&mut self, ordered: bool, items: &[ListItem]) {
        self.list_depth += 1;
        if self.list_depth == 1 {
            self.blank_line();
        } else {
            self.new_line();
        }
        let marker = (if ordered { "." } else { "*" }).repeat(self.list_depth);
        for item in items {
            let body = self.capture(|v| v.visit_all(&item.children));
            self.new_line();
            self.write(&marker);
            self.write(" ");
            self.write(&attach_to_list_item(&body));
            self.new_line();
        }
        self.list_depth -= 1;
        if self.list_depth == 0 {
            self.write("\n");
        }
    }

    fn desc_list(&mut self, entries: &[DescListEntry]) {
        self.blank_line();
        for entry in entries {
            let term = self.capture(|v| v.visit_all(&entry.title));
            let data = self.capture(|v| v.visit_all(&entry.data));
            self.write(term.trim());
            self.write("::\n");
            self.write(&attach_or_empty(&data));
            self.write("\n");
        }
        self.write("\n");
    }

    fn simple_sect(&mut self, kind: SimpleSectKind, children: &[DocNode]) {
        let admonition = labels::admonition(kind);
        if let Some(style) = admonition {
            self.write("\n\n[");
            self.write(style);
            self.write("]\n====\n");
        } else if let Some(title) = labels::simple_sect_title(kind) {
            self.write("\n\n==== ");
            self.filter(title);
            self.write("\n");
        }
        self.visit_all(children);
        if admonition.is_some() {
            self.new_line();
            self.write("====\n\n");
        }
        self.write("\n");
    }

    fn table(&mut self, table: &HtmlTable) {
        let widths = table.row_widths();
        let columns = widths.iter().copied().max().unwrap_or(0);
        if columns == 0 {
            return;
        }
        let header = table.has_heading_row();
        self.blank_line();
        if let Some(caption) = &table.caption {
            let caption = self.capture(|v| v.visit_all(caption));
            if !caption.trim().is_empty() {
                self.write(".");
                self.write(caption.trim());
                self.write("\n");
            }
        }
        self.write(&format!("[cols=\"{}*\"", columns));
        if header {
            self.write(",options=\"header\"");
        }
        self.write("]\n|===\n");
        for (row_index, row) in table.rows.iter().enumerate() {
            for cell in &row.cells {
                let body = self.capture(|v| v.visit_all(&cell.children));
                let body = body.trim();
                let mut spec = match (cell.col_span > 1, cell.row_span > 1) {
                    (true, true) => format!("{}.{}+", cell.col_span, cell.row_span),
                    (true, false) => format!("{}+", cell.col_span),
                    (false, true) => format!(".{}+", cell.row_span),
                    (false, false) => String::new(),
                };
                if body.contains('\n') {
                    spec.push('a');
                } else if cell.is_heading && !(header && row_index == 0) {
                    spec.push('h');
                }
                self.write(&spec);
                self.write("|");
                self.write(body);
                self.write("\n");
            }
            for _ in widths[row_index]..columns {
                self.write("|\n");
            }
            self.write("\n");
        }
        self.write("|===\n\n");
    }

    fn param_sect(&mut self, sect: &ParamSect) {
        self.write("\n\n==== ");
        self.filter(labels::param_sect_title(sect.kind));
        self.write("\n[horizontal]\n");
        for list in &sect.lists {
            if list.parameters.is_empty() {
                self.write("{empty}");
            }
            for (i, param) in list.parameters.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.visit(param);
            }
            let direction = match list.direction {
                ParamDirection::Unspecified => None,
                ParamDirection::In => Some("in"),
                ParamDirection::Out => Some("out"),
                ParamDirection::InOut => Some("in,out"),
            };
            if let Some(dir) = direction {
                self.write(" [.small]#[");
                self.write(dir);
                self.write("]#");
            }
            if !list.param_types.is_empty() {
                self.write(" : ");
                for (i, ty) in list.param_types.iter().enumerate() {
                    if i > 0 {
                        self.write(" {vbar} ");
                    }
                    self.visit(ty);
                }
            }
            self.write("::\n");
            let body = self.capture(|v| v.visit_all(&list.paragraphs));
            self.write(&attach_or_empty(&body));
            self.write("\n");
        }
        self.write("\n");
    }

    fn reference(&mut self, r: &Ref) {
        let linked = !r.file.is_empty();
        if linked {
            let anchor = if r.is_sub_page { "" } else { r.anchor.as_str() };
            self.start_link(&r.file, anchor);
        }
        if r.has_link_text() {
            self.visit_all(&r.children);
        } else {
            self.filter(&r.target_title);
        }
        if linked {
            self.end_link();
        }
    }

    fn sec_ref_list(&mut self, items: &[SecRefItem]) {
        self.blank_line();
        for item in items {
            self.write("* ");
            self.start_link(&item.file, &item.anchor);
            self.visit_all(&item.children);
            self.end_link();
            self.write("\n");
        }
        self.write("\n");
    }

    // ---- images and diagrams ----

    /// Writes a block image with an optional caption title.
    fn image_block(
        &mut self,
        target: &str,
        width: Option<&str>,
        height: Option<&str>,
        caption: &[DocNode],
    ) {
        self.write("\n\n");
        if !caption.is_empty() {
            let title = self.capture(|v| v.visit_all(caption));
            if !title.trim().is_empty() {
                self.write(".");
                self.write(title.trim());
                self.write("\n");
            }
        }
        self.write("image::");
        self.write(target);
        self.write("[Image");
        match (width, height) {
            (Some(w), Some(h)) => self.write(&format!(",{},{}", w, h)),
            (Some(w), None) => self.write(&format!(",{}", w)),
            (None, Some(h)) => self.write(&format!(",,{}", h)),
            (None, None) => {}
        }
        self.write(",opts=inline]\n");
    }

    fn image(&mut self, img: &Image) {
        if img.kind != ImageKind::Asciidoc {
            self.push_hidden(true);
            self.visit_all(&img.caption);
            self.pop_hidden();
            return;
        }
        if self.hide {
            return;
        }
        let name = strip_path(&img.name);
        let target = format!("{}{}", img.rel_path, name);
        self.image_block(&target, img.width.as_deref(), img.height.as_deref(), &img.caption);

        let dest = self.ctx.options().output_dir.join(name);
        match self.ctx.options().find_image(&img.name) {
            Some(src) => {
                if let Err(e) = std::fs::copy(&src, &dest) {
                    self.ctx
                        .warning(format!("could not copy image {}: {}", src.display(), e));
                }
            }
            None => self.ctx.warning(format!("image {} not found in image paths", img.name)),
        }
    }

    fn diagram_file(&mut self, kind: DiagramKind, file: &DiagramFile) {
        if self.hide {
            return;
        }
        let base = format!(
            "{}{}",
            kind.file_prefix(),
            strip_extension(strip_path(&file.file))
        );
        let image = self.ctx.render_diagram(kind, Path::new(&file.file), &base);
        let target = format!("{}{}", file.rel_path, image);
        self.image_block(&target, file.width.as_deref(), file.height.as_deref(), &file.caption);
    }

    /// Writes an inline diagram source into the output directory, renders it
    /// and references the image.
    fn inline_diagram(&mut self, kind: DiagramKind, v: &Verbatim) {
        if self.hide {
            return;
        }
        let index = self.ctx.next_inline_index(kind);
        let base = match kind {
            DiagramKind::Msc => format!("inline_mscgraph_{}", index),
            DiagramKind::PlantUml | DiagramKind::Dia => format!("inline_umlgraph_{}", index),
            DiagramKind::Dot => format!("inline_dotgraph_{}", index),
        };
        let text = match kind {
            DiagramKind::Msc => format!("msc {{{}}}", v.text),
            DiagramKind::PlantUml => format!("@startuml {}\n{}\n@enduml\n", base, v.text.trim_end()),
            _ => v.text.clone(),
        };
        let source = format!("{}.{}", base, kind.source_extension());
        let source = if self.ctx.options().write_diagrams {
            match self.ctx.write_diagram_source(&source, &text) {
                Some(path) => path,
                None => return,
            }
        } else {
            PathBuf::from(source)
        };
        let image = self.ctx.render_diagram(kind, &source, &base);
        self.image_block(&image, v.width.as_deref(), v.height.as_deref(), &v.caption);
    }
}

/// Joins captured block content onto a list item or description entry.
///
/// Leading and trailing blank lines are dropped and blank lines between
/// blocks become `+` continuation lines, except inside delimited blocks.
fn attach_to_list_item(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&str> = Vec::new();
    let mut pending_break = false;
    for line in text.trim().lines() {
        if open.is_empty() && line.trim().is_empty() {
            pending_break = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_break {
                out.push_str("+\n");
            }
        }
        pending_break = false;
        out.push_str(line);

        if is_block_delimiter(line) {
            let in_verbatim = open
                .last()
                .is_some_and(|d| d.starts_with(VERBATIM_DELIMITER_CHARS));
            if open.last() == Some(&line) {
                open.pop();
            } else if !in_verbatim {
                open.push(line);
            }
        }
    }
    out
}

fn is_block_delimiter(line: &str) -> bool {
    if line == "|===" {
        return true;
    }
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if BLOCK_DELIMITER_CHARS.contains(&c) => line.len() >= 4 && chars.all(|x| x == c),
        _ => false,
    }
}

fn attach_or_empty(text: &str) -> String {
    let body = attach_to_list_item(text);
    if body.is_empty() {
        "{empty}".to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HtmlCell, HtmlRow, ParamList, ParamSectKind};
    use crate::render::{RenderOptions, SkipDiagrams};

    fn render_with(ctx: &mut RenderContext, nodes: &[DocNode]) -> String {
        let mut out = TextStream::new();
        AsciidocVisitor::new(&mut out, ctx, SourceLanguage::Cpp).visit_all(nodes);
        out.into_string()
    }

    fn render(nodes: &[DocNode]) -> String {
        render_with(&mut RenderContext::default(), nodes)
    }

    fn item(text: &str) -> ListItem {
        ListItem::new(vec![DocNode::text_para(text)])
    }

    #[test]
    fn test_bold_word() {
        let para = DocNode::para(vec![
            DocNode::style(Style::Bold, true),
            DocNode::word("word"),
            DocNode::style(Style::Bold, false),
        ]);
        assert_eq!(render(&[para]), "\n**word**\n");
    }

    #[test]
    fn test_words_are_escaped() {
        let para = DocNode::text_para("a_b uses *ptr");
        assert_eq!(render(&[para]), "\na&#95;b uses {asterisk}ptr\n");
    }

    #[test]
    fn test_inline_code_keeps_spaces() {
        let nodes = vec![
            DocNode::style(Style::Code, true),
            DocNode::word("a"),
            DocNode::WhiteSpace {
                chars: "  ".to_string(),
            },
            DocNode::word("b"),
            DocNode::style(Style::Code, false),
            DocNode::space(),
        ];
        assert_eq!(render(&nodes), "``a{nbsp}{nbsp}b`` ");
    }

    #[test]
    fn test_preformatted_is_raw() {
        let nodes = vec![
            DocNode::style(Style::Preformatted, true),
            DocNode::word("a_b*"),
            DocNode::WhiteSpace {
                chars: "   ".to_string(),
            },
            DocNode::style(Style::Preformatted, false),
        ];
        assert_eq!(render(&nodes), "\n[literal]\n....\na_b*   \n....\n");
    }

    #[test]
    fn test_unknown_entity() {
        let mut ctx = RenderContext::default();
        let out = render_with(
            &mut ctx,
            &[DocNode::Symbol {
                name: "bogus".to_string(),
            }],
        );
        assert_eq!(out, "");
        assert_eq!(ctx.diagnostics().len(), 1);
        assert!(ctx.diagnostics()[0].is_error());
        assert!(ctx.diagnostics()[0].message.contains("&bogus;"));
    }

    #[test]
    fn test_known_entity() {
        let out = render(&[DocNode::Symbol {
            name: "copy".to_string(),
        }]);
        assert_eq!(out, "(C)");
    }

    #[test]
    fn test_hidden_stack_restores_state() {
        let mut out = TextStream::new();
        let mut ctx = RenderContext::default();
        {
            let mut visitor = AsciidocVisitor::new(&mut out, &mut ctx, SourceLanguage::Cpp);
            assert!(!visitor.is_hidden());
            visitor.push_hidden(true);
            visitor.push_hidden(false);
            assert!(!visitor.is_hidden());
            visitor.pop_hidden();
            assert!(visitor.is_hidden());
            visitor.visit(&DocNode::word("invisible"));
            visitor.visit(&DocNode::Symbol {
                name: "bogus".to_string(),
            });
            visitor.pop_hidden();
            assert!(!visitor.is_hidden());
            visitor.visit(&DocNode::word("visible"));
        }
        assert_eq!(out.as_str(), "visible");
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_pop_on_empty_stack_keeps_state() {
        let mut out = TextStream::new();
        let mut ctx = RenderContext::default();
        {
            let mut visitor = AsciidocVisitor::new(&mut out, &mut ctx, SourceLanguage::Cpp);
            visitor.pop_hidden();
            assert!(!visitor.is_hidden());
        }
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_nested_list() {
        let list = DocNode::AutoList {
            is_enum: false,
            items: vec![
                ListItem::new(vec![
                    DocNode::text_para("a"),
                    DocNode::AutoList {
                        is_enum: true,
                        items: vec![item("b")],
                    },
                ]),
                item("c"),
            ],
        };
        assert_eq!(render(&[list]), "* a\n.. b\n* c\n\n");
    }

    #[test]
    fn test_sibling_lists_render_identically() {
        let sibling = DocNode::HtmlList {
            ordered: false,
            items: vec![item("x"), item("y")],
        };
        let alone = render(std::slice::from_ref(&sibling));

        let nested = DocNode::HtmlList {
            ordered: false,
            items: vec![ListItem::new(vec![DocNode::HtmlList {
                ordered: false,
                items: vec![ListItem::new(vec![DocNode::HtmlList {
                    ordered: true,
                    items: vec![item("deep")],
                }])],
            }])],
        };
        let mut out = TextStream::new();
        let mut ctx = RenderContext::default();
        let mut visitor = AsciidocVisitor::new(&mut out, &mut ctx, SourceLanguage::Cpp);
        visitor.visit(&nested);
        assert_eq!(visitor.list_depth(), 0);
        visitor.visit(&sibling);
        assert_eq!(visitor.list_depth(), 0);
        assert!(out.as_str().ends_with(&alone));
        assert_eq!(alone, "* x\n* y\n\n");
    }

    #[test]
    fn test_list_item_with_two_paragraphs() {
        let list = DocNode::AutoList {
            is_enum: false,
            items: vec![ListItem::new(vec![
                DocNode::text_para("first"),
                DocNode::text_para("second"),
            ])],
        };
        assert_eq!(render(&[list]), "* first\n+\nsecond\n\n");
    }

    #[test]
    fn test_attach_keeps_blank_lines_in_listing() {
        let text = "\nintro\n\n[source]\n----\na\n\nb\n----\n\n";
        assert_eq!(
            attach_to_list_item(text),
            "intro\n+\n[source]\n----\na\n\nb\n----"
        );

        let text = "intro\n\n[source]\n-----\na\n----\n\nb\n-----\n\nafter";
        assert_eq!(
            attach_to_list_item(text),
            "intro\n+\n[source]\n-----\na\n----\n\nb\n-----\n+\nafter"
        );
    }

    #[test]
    fn test_table_with_header_and_span() {
        let mut wide = HtmlCell::new(vec![DocNode::word("both")]);
        wide.col_span = 2;
        let table = DocNode::HtmlTable(HtmlTable {
            caption: Some(vec![DocNode::word("Sizes")]),
            rows: vec![
                HtmlRow {
                    cells: vec![
                        HtmlCell::heading(vec![DocNode::word("A")]),
                        HtmlCell::heading(vec![DocNode::word("B")]),
                    ],
                },
                HtmlRow { cells: vec![wide] },
            ],
        });
        assert_eq!(
            render(&[table]),
            ".Sizes\n[cols=\"2*\",options=\"header\"]\n|===\n|A\n|B\n\n2+|both\n\n|===\n\n"
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let row = |words: &[&str]| HtmlRow {
            cells: words
                .iter()
                .map(|w| HtmlCell::new(vec![DocNode::word(*w)]))
                .collect(),
        };
        let table = DocNode::HtmlTable(HtmlTable {
            caption: None,
            rows: vec![row(&["a", "b", "c"]), row(&["d"]), row(&["e", "f", "g"])],
        });
        assert_eq!(
            render(&[table]),
            "[cols=\"3*\"]\n|===\n|a\n|b\n|c\n\n|d\n|\n|\n\n|e\n|f\n|g\n\n|===\n\n"
        );
    }

    #[test]
    fn test_row_span_is_not_padded() {
        let mut tall = HtmlCell::new(vec![DocNode::word("x")]);
        tall.row_span = 2;
        let table = DocNode::HtmlTable(HtmlTable {
            caption: None,
            rows: vec![
                HtmlRow {
                    cells: vec![tall, HtmlCell::new(vec![DocNode::word("y")])],
                },
                HtmlRow {
                    cells: vec![HtmlCell::new(vec![DocNode::word("z")])],
                },
            ],
        });
        assert_eq!(
            render(&[table]),
            "[cols=\"2*\"]\n|===\n.2+|x\n|y\n\n|z\n\n|===\n\n"
        );
    }

    #[test]
    fn test_multiline_cell_uses_asciidoc_style() {
        let table = DocNode::HtmlTable(HtmlTable {
            caption: None,
            rows: vec![HtmlRow {
                cells: vec![HtmlCell::new(vec![
                    DocNode::text_para("one"),
                    DocNode::text_para("two"),
                ])],
            }],
        });
        let out = render(&[table]);
        assert!(out.contains("a|one\n\ntwo\n"));
    }

    #[test]
    fn test_links() {
        let nodes = vec![
            DocNode::LinkedWord {
                word: "Foo".to_string(),
                file: "classFoo".to_string(),
                anchor: "a1".to_string(),
            },
            DocNode::space(),
            DocNode::Ref(Ref {
                file: "intro".to_string(),
                anchor: String::new(),
                target_title: "Introduction".to_string(),
                is_sub_page: false,
                children: vec![],
            }),
            DocNode::space(),
            DocNode::Ref(Ref {
                file: String::new(),
                anchor: String::new(),
                target_title: "nowhere".to_string(),
                is_sub_page: false,
                children: vec![],
            }),
        ];
        assert_eq!(
            render(&nodes),
            "<<classFoo_1a1,Foo>> <<intro,Introduction>> nowhere"
        );
    }

    #[test]
    fn test_urls() {
        let nodes = vec![
            DocNode::Url {
                url: "https://example.org".to_string(),
                is_email: false,
            },
            DocNode::space(),
            DocNode::Url {
                url: "me@example.org".to_string(),
                is_email: true,
            },
        ];
        assert_eq!(
            render(&nodes),
            "link:++https://example.org++[https://example.org] mailto:me@example.org[me@example.org]"
        );
    }

    #[test]
    fn test_snippet_include() {
        let inc = DocNode::Include(Include {
            kind: IncludeKind::Snippet,
            file: "example.cpp".to_string(),
            text: "int main() {\n//! [s]\nint x;\n//! [s]\n}\n".to_string(),
            block_id: "[s]".to_string(),
        });
        assert_eq!(
            render(&[inc]),
            "\n[source,cpp,subs=\"+macros\"]\n----\nint x;\n----\n\n"
        );
    }

    #[test]
    fn test_include_doc_is_inconsistent() {
        let mut ctx = RenderContext::default();
        let inc = DocNode::Include(Include {
            kind: IncludeKind::IncludeDoc,
            file: "doc.md".to_string(),
            text: String::new(),
            block_id: String::new(),
        });
        assert_eq!(render_with(&mut ctx, &[inc]), "");
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_dontinclude_operators() {
        let op = |kind, text: &str, is_first, is_last| {
            DocNode::IncOperator(IncOperator {
                kind,
                text: text.to_string(),
                is_first,
                is_last,
                file: "example.cpp".to_string(),
            })
        };
        let mut out = TextStream::new();
        let mut ctx = RenderContext::default();
        {
            let mut visitor = AsciidocVisitor::new(&mut out, &mut ctx, SourceLanguage::Unknown);
            visitor.visit(&op(IncOperatorKind::Line, "a();", true, false));
            visitor.visit(&DocNode::word("between"));
            visitor.visit(&op(IncOperatorKind::Skip, "", false, false));
            visitor.visit(&op(IncOperatorKind::Until, "b();", false, true));
            assert!(!visitor.is_hidden());
        }
        assert_eq!(
            out.as_str(),
            "\n[source,cpp,subs=\"+macros\"]\n----\na();\nb();\n----\n"
        );
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_param_sect() {
        let sect = DocNode::ParamSect(ParamSect {
            kind: ParamSectKind::Param,
            has_in_out_specifier: true,
            has_type_specifier: false,
            lists: vec![
                ParamList {
                    parameters: vec![DocNode::word("x")],
                    param_types: vec![],
                    direction: ParamDirection::In,
                    paragraphs: vec![DocNode::text_para("the value")],
                },
                ParamList {
                    parameters: vec![DocNode::word("a"), DocNode::word("b")],
                    param_types: vec![DocNode::word("int"), DocNode::word("long")],
                    direction: ParamDirection::Unspecified,
                    paragraphs: vec![],
                },
            ],
        });
        assert_eq!(
            render(&[sect]),
            "\n\n==== Parameters\n[horizontal]\nx [.small]#[in]#::\nthe value\na, b : int {vbar} long::\n{empty}\n\n"
        );
    }

    #[test]
    fn test_note_admonition() {
        let note = DocNode::SimpleSect {
            kind: SimpleSectKind::Note,
            children: vec![DocNode::text_para("careful")],
        };
        assert_eq!(render(&[note]), "\n\n[NOTE]\n====\n\ncareful\n====\n\n\n");
    }

    #[test]
    fn test_return_section() {
        let ret = DocNode::SimpleSect {
            kind: SimpleSectKind::Return,
            children: vec![DocNode::text_para("zero")],
        };
        assert_eq!(render(&[ret]), "\n\n==== Returns\n\nzero\n\n");
    }

    #[test]
    fn test_section_levels() {
        let section = |level| DocNode::Section {
            file: "page".to_string(),
            anchor: "s1".to_string(),
            title: "Usage".to_string(),
            level,
            children: vec![],
        };
        assert_eq!(render(&[section(1)]), "\n\n[[page_1s1]]\n=== Usage\n\n");
        assert!(render(&[section(9)]).contains("\n====== Usage\n"));
    }

    #[test]
    fn test_formulas() {
        let inline = DocNode::Formula(Formula {
            name: "form_0".to_string(),
            text: "$x^2$".to_string(),
            inline: true,
        });
        let block = DocNode::Formula(Formula {
            name: "form_1".to_string(),
            text: "\\[ a + b \\]".to_string(),
            inline: false,
        });
        assert_eq!(render(&[inline]), "latexmath:[x^2]");
        assert_eq!(render(&[block]), "\n[latexmath]\n++++\na + b\n++++\n");
    }

    #[test]
    fn test_non_asciidoc_image_is_hidden() {
        let mut ctx = RenderContext::default();
        let img = DocNode::Image(Image {
            kind: ImageKind::Html,
            name: "logo.png".to_string(),
            rel_path: String::new(),
            width: None,
            height: None,
            caption: vec![DocNode::Symbol {
                name: "bogus".to_string(),
            }],
        });
        assert_eq!(render_with(&mut ctx, &[img]), "");
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_asciidoc_image_is_copied() {
        let images = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(images.path().join("logo.png"), b"png").unwrap();
        let options = RenderOptions::default()
            .with_output_dir(output.path())
            .with_image_path(images.path());
        let mut ctx = RenderContext::new(options);
        let img = DocNode::Image(Image {
            kind: ImageKind::Asciidoc,
            name: "logo.png".to_string(),
            rel_path: String::new(),
            width: Some("100".to_string()),
            height: None,
            caption: vec![DocNode::word("Logo")],
        });
        let out = render_with(&mut ctx, &[img]);
        assert_eq!(out, "\n\n.Logo\nimage::logo.png[Image,100,opts=inline]\n");
        assert!(output.path().join("logo.png").is_file());
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_inline_dot_graph() {
        let output = tempfile::tempdir().unwrap();
        let options = RenderOptions::default().with_output_dir(output.path());
        let mut ctx = RenderContext::new(options).with_diagram_renderer(Box::new(SkipDiagrams));
        let dot = DocNode::Verbatim(Verbatim {
            kind: VerbatimKind::Dot,
            text: "digraph { a -> b }".to_string(),
            language: None,
            caption: vec![],
            width: None,
            height: None,
        });
        let out = render_with(&mut ctx, &[dot.clone(), dot]);
        assert!(out.contains("image::inline_dotgraph_1.png[Image,opts=inline]"));
        assert!(out.contains("image::inline_dotgraph_2.png[Image,opts=inline]"));
        let source = std::fs::read_to_string(output.path().join("inline_dotgraph_1.dot")).unwrap();
        assert_eq!(source, "digraph { a -> b }");
    }

    #[test]
    fn test_inline_msc_wraps_source() {
        let output = tempfile::tempdir().unwrap();
        let options = RenderOptions::default().with_output_dir(output.path());
        let mut ctx = RenderContext::new(options).with_diagram_renderer(Box::new(SkipDiagrams));
        let msc = DocNode::Verbatim(Verbatim {
            kind: VerbatimKind::Msc,
            text: "a,b; a->b;".to_string(),
            language: None,
            caption: vec![],
            width: None,
            height: None,
        });
        render_with(&mut ctx, &[msc]);
        let source =
            std::fs::read_to_string(output.path().join("inline_mscgraph_1.msc")).unwrap();
        assert_eq!(source, "msc {a,b; a->b;}");
    }

    #[test]
    fn test_backend_only_blocks_are_dropped() {
        let html = DocNode::Verbatim(Verbatim {
            kind: VerbatimKind::HtmlOnly,
            text: "<b>x</b>".to_string(),
            language: None,
            caption: vec![],
            width: None,
            height: None,
        });
        let adoc = DocNode::Verbatim(Verbatim {
            kind: VerbatimKind::AsciidocOnly,
            text: "*raw*".to_string(),
            language: None,
            caption: vec![],
            width: None,
            height: None,
        });
        assert_eq!(render(&[html, adoc]), "*raw*");
    }

    #[test]
    fn test_verbatim_containing_delimiter() {
        let verbatim = DocNode::Verbatim(Verbatim {
            kind: VerbatimKind::Verbatim,
            text: "before\n----\nafter".to_string(),
            language: None,
            caption: vec![],
            width: None,
            height: None,
        });
        assert_eq!(
            render(&[verbatim]),
            "\n[source]\n-----\nbefore\n----\nafter\n-----\n"
        );

        let inc = DocNode::Include(Include {
            kind: IncludeKind::VerbInclude,
            file: "notes.txt".to_string(),
            text: "a\n......\nb\n".to_string(),
            block_id: String::new(),
        });
        assert_eq!(render(&[inc]), "\n[literal]\n.......\na\n......\nb\n.......\n");

        let formula = DocNode::Formula(Formula {
            name: "form_2".to_string(),
            text: "\\[ a\n++++\nb \\]".to_string(),
            inline: false,
        });
        assert_eq!(render(&[formula]), "\n[latexmath]\n+++++\na\n++++\nb\n+++++\n");
    }

    #[test]
    fn test_desc_list_and_quote() {
        let list = DocNode::HtmlDescList {
            entries: vec![DescListEntry {
                title: vec![DocNode::word("term")],
                data: vec![DocNode::text_para("meaning")],
            }],
        };
        assert_eq!(render(&[list]), "term::\nmeaning\n\n");

        let quote = DocNode::HtmlBlockQuote {
            children: vec![DocNode::text_para("said")],
        };
        assert_eq!(render(&[quote]), "\n[quote]\n____\n\nsaid\n____\n");
    }
}
