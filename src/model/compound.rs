//! Compound entities (classes, namespaces, files, groups, ...) and their members.

use super::DocNode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A documented project: the input of a full generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub brief: Option<String>,
    /// The main page (`\mainpage`), written as `mainpage.adoc`.
    #[serde(default)]
    pub main_page: Option<Compound>,
    #[serde(default)]
    pub compounds: Vec<Compound>,
}

impl Project {
    /// Creates an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Decodes a project from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let project: Project = serde_json::from_str(json)?;
        project.validate()?;
        Ok(project)
    }

    /// Reads and decodes a project from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that every compound can be written to a file of its own.
    ///
    /// File bases must be plain file names: no path separators, no `..`.
    pub fn validate(&self) -> Result<()> {
        for compound in self.compounds.iter().chain(self.main_page.iter()) {
            check_file_base(&compound.name, "output file base", &compound.output_file_base)?;
            if let Some(base) = &compound.source_file_base {
                check_file_base(&compound.name, "source file base", base)?;
            }
        }
        Ok(())
    }

    /// Compounds of the given kind, in input order.
    pub fn compounds_of(&self, kind: CompoundKind) -> impl Iterator<Item = &Compound> {
        self.compounds.iter().filter(move |c| c.kind == kind)
    }

    /// Class-like compounds (classes, structs, unions, interfaces).
    pub fn classes(&self) -> impl Iterator<Item = &Compound> {
        self.compounds.iter().filter(|c| c.kind.is_class_like())
    }

    /// Looks up a compound by name or output file base.
    pub fn find(&self, name: &str) -> Option<&Compound> {
        self.compounds
            .iter()
            .chain(self.main_page.iter())
            .find(|c| c.name == name || c.output_file_base == name)
    }

    /// Total number of members over all compounds.
    pub fn member_count(&self) -> usize {
        self.compounds.iter().map(Compound::member_count).sum()
    }
}

fn check_file_base(compound: &str, field: &str, base: &str) -> Result<()> {
    let problem = if base.trim().is_empty() {
        "is empty"
    } else if base.contains(['/', '\\']) || base.contains("..") || Path::new(base).is_absolute() {
        "is not a plain file name"
    } else {
        return Ok(());
    };
    Err(Error::InvalidModel(format!(
        "{} '{}' of compound '{}' {}",
        field, base, compound, problem
    )))
}

/// Kind of a compound entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    Class,
    Struct,
    Union,
    Interface,
    Namespace,
    File,
    Group,
    Dir,
    Page,
    Example,
}

impl CompoundKind {
    /// Returns `true` for classes, structs, unions and interfaces.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            CompoundKind::Class | CompoundKind::Struct | CompoundKind::Union | CompoundKind::Interface
        )
    }

    /// Word used in reference titles and declaration lines.
    pub fn label(&self) -> &'static str {
        match self {
            CompoundKind::Class => "Class",
            CompoundKind::Struct => "Struct",
            CompoundKind::Union => "Union",
            CompoundKind::Interface => "Interface",
            CompoundKind::Namespace => "Namespace",
            CompoundKind::File => "File",
            CompoundKind::Group => "Module",
            CompoundKind::Dir => "Directory",
            CompoundKind::Page => "Page",
            CompoundKind::Example => "Example",
        }
    }

    /// Keyword used in inner compound declaration lines.
    pub fn keyword(&self) -> &'static str {
        match self {
            CompoundKind::Class => "class",
            CompoundKind::Struct => "struct",
            CompoundKind::Union => "union",
            CompoundKind::Interface => "interface",
            CompoundKind::Namespace => "namespace",
            CompoundKind::File => "file",
            CompoundKind::Group => "module",
            CompoundKind::Dir => "dir",
            CompoundKind::Page => "page",
            CompoundKind::Example => "example",
        }
    }
}

/// A documented compound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compound {
    pub kind: CompoundKind,
    pub name: String,
    /// Explicit title (groups and pages).
    #[serde(default)]
    pub title: Option<String>,
    /// Base name of the generated file, also the compound's anchor id.
    pub output_file_base: String,
    /// Source language extension used for code blocks (`cpp`, `py`, ...).
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub brief: Option<DocNode>,
    #[serde(default)]
    pub detailed: Option<DocNode>,
    #[serde(default)]
    pub member_lists: Vec<MemberList>,
    /// Nested classes, namespaces, files, subgroups, ...
    #[serde(default)]
    pub inner: Vec<CompoundRef>,
    /// Direct base classes of class-like compounds.
    #[serde(default)]
    pub base_classes: Vec<CompoundRef>,
    /// Classes directly derived from this one.
    #[serde(default)]
    pub derived_classes: Vec<CompoundRef>,
    /// Labels such as `abstract` or `final`.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Header to include for class-like compounds.
    #[serde(default)]
    pub include_file: Option<String>,
    #[serde(default)]
    pub graphs: Vec<DotGraph>,
    /// Source text of file compounds, for the source listing page.
    #[serde(default)]
    pub source: Option<SourceBody>,
    /// Base name of the source listing page.
    #[serde(default)]
    pub source_file_base: Option<String>,
    #[serde(default = "yes")]
    pub linkable: bool,
    /// Imported from a tag file rather than documented here.
    #[serde(default)]
    pub reference: bool,
    /// Documented inside its outer scope rather than on its own page.
    #[serde(default)]
    pub embedded: bool,
    #[serde(default)]
    pub template_instance: bool,
    /// Pages and groups that belong to a group.
    #[serde(default)]
    pub in_group: bool,
}

fn yes() -> bool {
    true
}

impl Compound {
    /// Creates a linkable compound with no documentation.
    pub fn new(kind: CompoundKind, name: impl Into<String>, output_file_base: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            title: None,
            output_file_base: output_file_base.into(),
            language: None,
            brief: None,
            detailed: None,
            member_lists: Vec::new(),
            inner: Vec::new(),
            base_classes: Vec::new(),
            derived_classes: Vec::new(),
            labels: Vec::new(),
            include_file: None,
            graphs: Vec::new(),
            source: None,
            source_file_base: None,
            linkable: true,
            reference: false,
            embedded: false,
            template_instance: false,
            in_group: false,
        }
    }

    /// Title used for the page heading.
    pub fn display_title(&self) -> String {
        match self.kind {
            CompoundKind::Group | CompoundKind::Page => {
                self.title.clone().unwrap_or_else(|| self.name.clone())
            }
            CompoundKind::Example => self.name.clone(),
            _ => format!("{} {} Reference", self.name, self.kind.label()),
        }
    }

    /// Whether this compound gets an include line in the root file.
    pub fn is_listed(&self) -> bool {
        self.linkable && !self.reference && !self.template_instance && !self.embedded
    }

    /// Whether a separate source listing page is produced.
    pub fn has_source_page(&self) -> bool {
        self.kind == CompoundKind::File && self.source.is_some() && self.source_file_base.is_some()
    }

    /// Total number of members over all lists.
    pub fn member_count(&self) -> usize {
        self.member_lists.iter().map(|l| l.members.len()).sum()
    }
}

/// Reference to a nested compound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundRef {
    pub kind: CompoundKind,
    pub name: String,
    pub output_file_base: String,
    #[serde(default)]
    pub brief: Option<DocNode>,
}

/// Members of one category, as shown under one header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberList {
    pub list_type: MemberListType,
    pub members: Vec<MemberDef>,
}

impl MemberList {
    pub fn new(list_type: MemberListType, members: Vec<MemberDef>) -> Self {
        Self { list_type, members }
    }
}

/// Member list categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberListType {
    PubTypes,
    PubMethods,
    PubAttribs,
    PubSlots,
    Signals,
    DcopMethods,
    Properties,
    Events,
    PubStaticMethods,
    PubStaticAttribs,
    ProTypes,
    ProMethods,
    ProAttribs,
    ProSlots,
    ProStaticMethods,
    ProStaticAttribs,
    PacTypes,
    PacMethods,
    PacAttribs,
    PacStaticMethods,
    PacStaticAttribs,
    PriTypes,
    PriMethods,
    PriAttribs,
    PriSlots,
    PriStaticMethods,
    PriStaticAttribs,
    Friends,
    Related,
    DecDefineMembers,
    DecProtoMembers,
    DecTypedefMembers,
    DecEnumMembers,
    DecFuncMembers,
    DecVarMembers,
}

impl MemberListType {
    /// All list types, in the order they appear on a page.
    pub const ALL: [MemberListType; 35] = [
        MemberListType::PubTypes,
        MemberListType::PubSlots,
        MemberListType::Signals,
        MemberListType::DcopMethods,
        MemberListType::PubMethods,
        MemberListType::PubStaticMethods,
        MemberListType::PubAttribs,
        MemberListType::PubStaticAttribs,
        MemberListType::Properties,
        MemberListType::Events,
        MemberListType::ProTypes,
        MemberListType::ProSlots,
        MemberListType::ProMethods,
        MemberListType::ProStaticMethods,
        MemberListType::ProAttribs,
        MemberListType::ProStaticAttribs,
        MemberListType::PacTypes,
        MemberListType::PacMethods,
        MemberListType::PacStaticMethods,
        MemberListType::PacAttribs,
        MemberListType::PacStaticAttribs,
        MemberListType::PriTypes,
        MemberListType::PriSlots,
        MemberListType::PriMethods,
        MemberListType::PriStaticMethods,
        MemberListType::PriAttribs,
        MemberListType::PriStaticAttribs,
        MemberListType::Friends,
        MemberListType::Related,
        MemberListType::DecDefineMembers,
        MemberListType::DecProtoMembers,
        MemberListType::DecTypedefMembers,
        MemberListType::DecEnumMembers,
        MemberListType::DecFuncMembers,
        MemberListType::DecVarMembers,
    ];

    /// Anchor id of the section holding this list.
    pub fn section_id(&self) -> &'static str {
        match self {
            MemberListType::PubTypes => "public-type",
            MemberListType::PubMethods => "public-func",
            MemberListType::PubAttribs => "public-attrib",
            MemberListType::PubSlots => "public-slot",
            MemberListType::Signals => "signal",
            MemberListType::DcopMethods => "dcop-func",
            MemberListType::Properties => "property",
            MemberListType::Events => "event",
            MemberListType::PubStaticMethods => "public-static-func",
            MemberListType::PubStaticAttribs => "public-static-attrib",
            MemberListType::ProTypes => "protected-type",
            MemberListType::ProMethods => "protected-func",
            MemberListType::ProAttribs => "protected-attrib",
            MemberListType::ProSlots => "protected-slot",
            MemberListType::ProStaticMethods => "protected-static-func",
            MemberListType::ProStaticAttribs => "protected-static-attrib",
            MemberListType::PacTypes => "package-type",
            MemberListType::PacMethods => "package-func",
            MemberListType::PacAttribs => "package-attrib",
            MemberListType::PacStaticMethods => "package-static-func",
            MemberListType::PacStaticAttribs => "package-static-attrib",
            MemberListType::PriTypes => "private-type",
            MemberListType::PriMethods => "private-func",
            MemberListType::PriAttribs => "private-attrib",
            MemberListType::PriSlots => "private-slot",
            MemberListType::PriStaticMethods => "private-static-func",
            MemberListType::PriStaticAttribs => "private-static-attrib",
            MemberListType::Friends => "friend",
            MemberListType::Related => "related",
            MemberListType::DecDefineMembers => "define",
            MemberListType::DecProtoMembers => "prototype",
            MemberListType::DecTypedefMembers => "typedef",
            MemberListType::DecEnumMembers => "enum",
            MemberListType::DecFuncMembers => "func",
            MemberListType::DecVarMembers => "var",
        }
    }

    /// Header of the declaration list.
    pub fn title(&self) -> &'static str {
        match self {
            MemberListType::PubTypes => "Public Types",
            MemberListType::PubMethods => "Public Member Functions",
            MemberListType::PubAttribs => "Public Attributes",
            MemberListType::PubSlots => "Public Slots",
            MemberListType::Signals => "Signals",
            MemberListType::DcopMethods => "DCOP Member Functions",
            MemberListType::Properties => "Properties",
            MemberListType::Events => "Events",
            MemberListType::PubStaticMethods => "Static Public Member Functions",
            MemberListType::PubStaticAttribs => "Static Public Attributes",
            MemberListType::ProTypes => "Protected Types",
            MemberListType::ProMethods => "Protected Member Functions",
            MemberListType::ProAttribs => "Protected Attributes",
            MemberListType::ProSlots => "Protected Slots",
            MemberListType::ProStaticMethods => "Static Protected Member Functions",
            MemberListType::ProStaticAttribs => "Static Protected Attributes",
            MemberListType::PacTypes => "Package Types",
            MemberListType::PacMethods => "Package Functions",
            MemberListType::PacAttribs => "Package Attributes",
            MemberListType::PacStaticMethods => "Static Package Functions",
            MemberListType::PacStaticAttribs => "Static Package Attributes",
            MemberListType::PriTypes => "Private Types",
            MemberListType::PriMethods => "Private Member Functions",
            MemberListType::PriAttribs => "Private Attributes",
            MemberListType::PriSlots => "Private Slots",
            MemberListType::PriStaticMethods => "Static Private Member Functions",
            MemberListType::PriStaticAttribs => "Static Private Attributes",
            MemberListType::Friends => "Friends",
            MemberListType::Related => "Related Functions",
            MemberListType::DecDefineMembers => "Macros",
            MemberListType::DecProtoMembers => "Function Prototypes",
            MemberListType::DecTypedefMembers => "Typedefs",
            MemberListType::DecEnumMembers => "Enumerations",
            MemberListType::DecFuncMembers => "Functions",
            MemberListType::DecVarMembers => "Variables",
        }
    }

    /// Header of the detailed documentation section for this list.
    pub fn detailed_title(&self) -> &'static str {
        use MemberListType::*;
        match self {
            PubTypes | ProTypes | PacTypes | PriTypes => "Member Type Documentation",
            PubMethods | PubSlots | Signals | DcopMethods | PubStaticMethods | ProMethods
            | ProSlots | ProStaticMethods | PacMethods | PacStaticMethods | PriMethods
            | PriSlots | PriStaticMethods => "Member Function Documentation",
            PubAttribs | PubStaticAttribs | ProAttribs | ProStaticAttribs | PacAttribs
            | PacStaticAttribs | PriAttribs | PriStaticAttribs => "Member Data Documentation",
            Properties => "Property Documentation",
            Events => "Event Documentation",
            Friends | Related => "Friends And Related Function Documentation",
            DecDefineMembers => "Macro Definition Documentation",
            DecProtoMembers | DecFuncMembers => "Function Documentation",
            DecTypedefMembers => "Typedef Documentation",
            DecEnumMembers => "Enumeration Type Documentation",
            DecVarMembers => "Variable Documentation",
        }
    }
}

/// Kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Define,
    Function,
    Prototype,
    Variable,
    Typedef,
    Enumeration,
    EnumValue,
    Signal,
    Slot,
    Friend,
    Property,
    Event,
}

/// A documented member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDef {
    pub kind: MemberType,
    pub name: String,
    /// Anchor within the compound's page.
    pub anchor: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Argument list including parentheses.
    #[serde(default)]
    pub args: String,
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default)]
    pub enum_values: Vec<EnumValue>,
    #[serde(default)]
    pub brief: Option<DocNode>,
    #[serde(default)]
    pub detailed: Option<DocNode>,
    /// Source of the member's body, for inline sources.
    #[serde(default)]
    pub body: Option<SourceBody>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl MemberDef {
    /// Creates an undocumented member.
    pub fn new(kind: MemberType, name: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            anchor: anchor.into(),
            type_name: String::new(),
            args: String::new(),
            initializer: None,
            enum_values: Vec::new(),
            brief: None,
            detailed: None,
            body: None,
            labels: Vec::new(),
        }
    }

    /// Sets the type.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Sets the argument list.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    /// Sets the brief description.
    pub fn with_brief(mut self, brief: DocNode) -> Self {
        self.brief = Some(brief);
        self
    }

    /// Sets the detailed description.
    pub fn with_detailed(mut self, detailed: DocNode) -> Self {
        self.detailed = Some(detailed);
        self
    }

    /// Heading used in the member's documentation section.
    pub fn doc_title(&self) -> String {
        match self.kind {
            MemberType::Function | MemberType::Prototype | MemberType::Signal | MemberType::Slot => {
                format!("{}()", self.name)
            }
            MemberType::Define if !self.args.is_empty() => format!("{}()", self.name),
            _ => self.name.clone(),
        }
    }

    /// Full declaration as shown at the top of the documentation section.
    pub fn declaration(&self) -> String {
        let mut decl = String::new();
        match self.kind {
            MemberType::Define => {
                decl.push_str("#define ");
                decl.push_str(&self.name);
                decl.push_str(&self.args);
            }
            MemberType::Enumeration => {
                decl.push_str("enum ");
                decl.push_str(&self.name);
            }
            MemberType::Typedef => {
                decl.push_str("typedef ");
                push_typed_name(&mut decl, &self.type_name, &self.name);
                decl.push_str(&self.args);
            }
            _ => {
                push_typed_name(&mut decl, &self.type_name, &self.name);
                decl.push_str(&self.args);
            }
        }
        if let Some(init) = &self.initializer {
            if self.kind != MemberType::Define {
                decl.push(' ');
                decl.push_str(init.trim());
            }
        }
        decl
    }
}

fn push_typed_name(out: &mut String, type_name: &str, name: &str) {
    if !type_name.is_empty() {
        out.push_str(type_name);
        out.push(' ');
    }
    out.push_str(name);
}

/// One enumerator of an enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub anchor: String,
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default)]
    pub brief: Option<DocNode>,
}

/// A piece of source code attached to a member or file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBody {
    /// Language extension (`cpp`, `py`, ...).
    #[serde(default)]
    pub language: Option<String>,
    pub text: String,
    /// Line number of the first line.
    #[serde(default = "first_line")]
    pub start_line: u32,
}

fn first_line() -> u32 {
    1
}

/// Kind of a precomputed dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Class,
    Collaboration,
    IncludeDependency,
    Call,
    Caller,
    DirectoryDependency,
    Group,
}

impl GraphKind {
    /// Suffix used in the generated image file name.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            GraphKind::Class => "inherit_graph",
            GraphKind::Collaboration => "coll_graph",
            GraphKind::IncludeDependency => "incl_graph",
            GraphKind::Call => "cgraph",
            GraphKind::Caller => "icgraph",
            GraphKind::DirectoryDependency => "dep_graph",
            GraphKind::Group => "group_graph",
        }
    }
}

/// A dependency graph in dot syntax, rendered to an image at output time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotGraph {
    pub kind: GraphKind,
    pub source: String,
}
