//! Documentation AST.
//!
//! These nodes are produced by an external comment parser and consumed by
//! [`AsciidocVisitor`](crate::render::AsciidocVisitor). Nodes that can only
//! occur inside a specific parent (list items, table rows, parameter lists)
//! are plain structs owned by that parent.

use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

fn one_u8() -> u8 {
    1
}

/// A node of the documentation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DocNode {
    // ---- leaves ----
    /// Plain word.
    Word { text: String },
    /// Word that links to a documented entity.
    LinkedWord {
        word: String,
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
    },
    /// Run of white space.
    WhiteSpace { chars: String },
    /// HTML entity or special-symbol command, by entity name.
    Symbol { name: String },
    /// Bare URL or e-mail address.
    Url {
        url: String,
        #[serde(default)]
        is_email: bool,
    },
    LineBreak,
    HorRuler,
    /// Toggles an inline style on or off.
    StyleChange { style: Style, enable: bool },
    Verbatim(Verbatim),
    /// Explicit anchor.
    Anchor {
        #[serde(default)]
        file: String,
        anchor: String,
    },
    Include(Include),
    IncOperator(IncOperator),
    Formula(Formula),
    IndexEntry { entry: String },
    /// Separator between consecutive simple sections of the same kind.
    SimpleSectSep,
    /// Bibliographic citation.
    Cite {
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
        text: String,
    },

    // ---- containers ----
    Root { children: Vec<DocNode> },
    Para { children: Vec<DocNode> },
    Text { children: Vec<DocNode> },
    AutoList {
        #[serde(default)]
        is_enum: bool,
        items: Vec<ListItem>,
    },
    SimpleSect {
        kind: SimpleSectKind,
        children: Vec<DocNode>,
    },
    Title { children: Vec<DocNode> },
    SimpleList { items: Vec<ListItem> },
    Section {
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
        title: String,
        /// Nesting depth: 1 for `\section`, 2 for `\subsection`, ...
        #[serde(default = "one_u8")]
        level: u8,
        #[serde(default)]
        children: Vec<DocNode>,
    },
    HtmlList {
        #[serde(default)]
        ordered: bool,
        items: Vec<ListItem>,
    },
    HtmlDescList { entries: Vec<DescListEntry> },
    HtmlTable(HtmlTable),
    HtmlHeader { level: u8, children: Vec<DocNode> },
    HtmlBlockQuote { children: Vec<DocNode> },
    /// Internal-only documentation (`\internal`).
    Internal { children: Vec<DocNode> },
    HRef { url: String, children: Vec<DocNode> },
    Image(Image),
    DotFile(DiagramFile),
    MscFile(DiagramFile),
    DiaFile(DiagramFile),
    Link {
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
        children: Vec<DocNode>,
    },
    Ref(Ref),
    SecRefList { items: Vec<SecRefItem> },
    ParamSect(ParamSect),
    XRefItem {
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
        #[serde(default)]
        title: String,
        children: Vec<DocNode>,
    },
    InternalRef {
        #[serde(default)]
        file: String,
        #[serde(default)]
        anchor: String,
        children: Vec<DocNode>,
    },
    /// Documentation copied from another entity (`\copydoc`).
    Copy { children: Vec<DocNode> },
    VhdlFlow { children: Vec<DocNode> },
    ParBlock { children: Vec<DocNode> },
}

impl DocNode {
    /// Creates a word node.
    pub fn word(text: impl Into<String>) -> Self {
        DocNode::Word { text: text.into() }
    }

    /// Creates a single-space white space node.
    pub fn space() -> Self {
        DocNode::WhiteSpace {
            chars: " ".to_string(),
        }
    }

    /// Creates a style toggle.
    pub fn style(style: Style, enable: bool) -> Self {
        DocNode::StyleChange { style, enable }
    }

    /// Creates a paragraph.
    pub fn para(children: Vec<DocNode>) -> Self {
        DocNode::Para { children }
    }

    /// Creates a root node.
    pub fn root(children: Vec<DocNode>) -> Self {
        DocNode::Root { children }
    }

    /// Creates a paragraph of words separated by single spaces.
    pub fn text_para(text: &str) -> Self {
        let mut children = Vec::new();
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                children.push(DocNode::space());
            }
            children.push(DocNode::word(word));
        }
        DocNode::para(children)
    }

    /// Returns the direct child nodes of a container, empty for leaves.
    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Root { children }
            | DocNode::Para { children }
            | DocNode::Text { children }
            | DocNode::SimpleSect { children, .. }
            | DocNode::Title { children }
            | DocNode::Section { children, .. }
            | DocNode::HtmlHeader { children, .. }
            | DocNode::HtmlBlockQuote { children }
            | DocNode::Internal { children }
            | DocNode::HRef { children, .. }
            | DocNode::Link { children, .. }
            | DocNode::XRefItem { children, .. }
            | DocNode::InternalRef { children, .. }
            | DocNode::Copy { children }
            | DocNode::VhdlFlow { children }
            | DocNode::ParBlock { children } => children,
            DocNode::Ref(r) => &r.children,
            DocNode::Image(img) => &img.caption,
            DocNode::DotFile(f) | DocNode::MscFile(f) | DocNode::DiaFile(f) => &f.caption,
            _ => &[],
        }
    }

    /// Returns `true` if this node has no content worth rendering.
    pub fn is_blank(&self) -> bool {
        match self {
            DocNode::Word { text } => text.trim().is_empty(),
            DocNode::WhiteSpace { .. } => true,
            DocNode::Root { children } | DocNode::Para { children } => {
                children.iter().all(DocNode::is_blank)
            }
            _ => false,
        }
    }
}

/// Inline styles toggled by [`DocNode::StyleChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Bold,
    Italic,
    Code,
    Center,
    Small,
    Subscript,
    Superscript,
    Preformatted,
    Span,
    Div,
    Strike,
    Underline,
}

/// Kind of a verbatim block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbatimKind {
    Code,
    Verbatim,
    HtmlOnly,
    ManOnly,
    RtfOnly,
    LatexOnly,
    XmlOnly,
    DocbookOnly,
    AsciidocOnly,
    Dot,
    Msc,
    #[serde(rename = "plantuml")]
    PlantUml,
}

/// A verbatim block: code, raw backend text, or an inline diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verbatim {
    pub kind: VerbatimKind,
    pub text: String,
    /// Language extension for code blocks (`.cpp`, `py`, ...).
    #[serde(default)]
    pub language: Option<String>,
    /// Diagram caption.
    #[serde(default)]
    pub caption: Vec<DocNode>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

impl Verbatim {
    /// Creates a code block.
    pub fn code(text: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            kind: VerbatimKind::Code,
            text: text.into(),
            language: language.map(str::to_string),
            caption: Vec::new(),
            width: None,
            height: None,
        }
    }
}

/// Kind of an include command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    Include,
    IncWithLines,
    DontInclude,
    HtmlInclude,
    LatexInclude,
    VerbInclude,
    Snippet,
    SnipWithLines,
    SnippetDoc,
    IncludeDoc,
}

/// File inclusion (`\include`, `\snippet`, `\verbinclude`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Include {
    pub kind: IncludeKind,
    pub file: String,
    /// Full text of the included file.
    pub text: String,
    /// Snippet marker for snippet includes.
    #[serde(default)]
    pub block_id: String,
}

/// Kind of an include operator following `\dontinclude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncOperatorKind {
    Line,
    SkipLine,
    Skip,
    Until,
}

/// One `\line`, `\skip`, `\skipline` or `\until` operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncOperator {
    pub kind: IncOperatorKind,
    /// Code fragment selected by the operator.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_first: bool,
    #[serde(default)]
    pub is_last: bool,
    /// Name of the file the fragment comes from.
    #[serde(default)]
    pub file: String,
}

/// LaTeX formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    /// Formula source including its delimiters (`$..$`, `\[..\]`, `\f{..}`).
    pub text: String,
    #[serde(default)]
    pub inline: bool,
}

/// Output format an image command is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Html,
    Latex,
    Rtf,
    Docbook,
    Asciidoc,
}

/// `\image` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub kind: ImageKind,
    pub name: String,
    #[serde(default)]
    pub rel_path: String,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub caption: Vec<DocNode>,
}

/// `\dotfile`, `\mscfile` or `\diafile` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramFile {
    /// Path of the diagram source file.
    pub file: String,
    #[serde(default)]
    pub rel_path: String,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub caption: Vec<DocNode>,
}

/// `\ref` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub anchor: String,
    /// Title of the target, used when no link text is given.
    #[serde(default)]
    pub target_title: String,
    #[serde(default)]
    pub is_sub_page: bool,
    #[serde(default)]
    pub children: Vec<DocNode>,
}

impl Ref {
    /// Returns `true` if the reference carries explicit link text.
    pub fn has_link_text(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Item of an auto list, simple list or HTML list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<DocNode>,
}

impl ListItem {
    pub fn new(children: Vec<DocNode>) -> Self {
        Self { children }
    }
}

/// Term/description pair of an HTML description list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescListEntry {
    pub title: Vec<DocNode>,
    #[serde(default)]
    pub data: Vec<DocNode>,
}

/// HTML table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HtmlTable {
    #[serde(default)]
    pub caption: Option<Vec<DocNode>>,
    pub rows: Vec<HtmlRow>,
}

impl HtmlTable {
    /// Number of columns, taking column and row spans into account.
    pub fn column_count(&self) -> usize {
        self.row_widths().into_iter().max().unwrap_or(0)
    }

    /// Columns occupied by each row.
    ///
    /// A row counts its own cells with their column spans plus the columns
    /// still covered by row spans from the rows above it.
    pub fn row_widths(&self) -> Vec<usize> {
        // rows each column stays covered by a span from above
        let mut carried: Vec<u32> = Vec::new();
        let mut widths = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut next: Vec<u32> = carried.iter().map(|n| n.saturating_sub(1)).collect();
            let mut col = 0;
            for cell in &row.cells {
                while carried.get(col).is_some_and(|&n| n > 0) {
                    col += 1;
                }
                let span = cell.col_span.max(1) as usize;
                if next.len() < col + span {
                    next.resize(col + span, 0);
                }
                for covered in &mut next[col..col + span] {
                    *covered = (*covered).max(cell.row_span.max(1) - 1);
                }
                col += span;
            }
            let trailing = carried.iter().skip(col).filter(|&&n| n > 0).count();
            widths.push(col + trailing);
            carried = next;
        }
        widths
    }

    /// Returns `true` if the first row is a heading row.
    pub fn has_heading_row(&self) -> bool {
        self.rows.first().is_some_and(|row| row.is_heading())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HtmlRow {
    pub cells: Vec<HtmlCell>,
}

impl HtmlRow {
    /// A row is a heading row when all its cells are heading cells.
    pub fn is_heading(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.is_heading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlCell {
    #[serde(default)]
    pub is_heading: bool,
    #[serde(default = "one")]
    pub col_span: u32,
    #[serde(default = "one")]
    pub row_span: u32,
    pub children: Vec<DocNode>,
}

impl HtmlCell {
    pub fn new(children: Vec<DocNode>) -> Self {
        Self {
            is_heading: false,
            col_span: 1,
            row_span: 1,
            children,
        }
    }

    pub fn heading(children: Vec<DocNode>) -> Self {
        Self {
            is_heading: true,
            ..Self::new(children)
        }
    }
}

/// Entry of a `\secreflist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecRefItem {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub anchor: String,
    pub children: Vec<DocNode>,
}

/// Kinds of simple sections (`\return`, `\note`, `\par`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleSectKind {
    See,
    Return,
    Author,
    Authors,
    Version,
    Since,
    Date,
    Note,
    Warning,
    Pre,
    Post,
    Copyright,
    Invar,
    Remark,
    Attention,
    User,
    Rcs,
    Unknown,
}

/// Kinds of parameter sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSectKind {
    Param,
    RetVal,
    Exception,
    TemplateParam,
}

/// Data flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDirection {
    #[default]
    Unspecified,
    In,
    Out,
    InOut,
}

/// `\param` / `\retval` / `\exception` / `\tparam` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSect {
    pub kind: ParamSectKind,
    #[serde(default)]
    pub has_in_out_specifier: bool,
    #[serde(default)]
    pub has_type_specifier: bool,
    pub lists: Vec<ParamList>,
}

/// One documented parameter (or group of parameters sharing a description).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamList {
    /// Parameter names, each a word or linked word.
    pub parameters: Vec<DocNode>,
    #[serde(default)]
    pub param_types: Vec<DocNode>,
    #[serde(default)]
    pub direction: ParamDirection,
    /// Description paragraphs.
    #[serde(default)]
    pub paragraphs: Vec<DocNode>,
}
