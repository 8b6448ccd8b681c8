//! English captions used in the generated output.

use crate::model::{CompoundKind, ParamSectKind, SimpleSectKind};

pub const CLASS_HIERARCHY: &str = "Class Hierarchy";
pub const DETAILED_DESCRIPTION: &str = "Detailed Description";
pub const EXAMPLES: &str = "Examples";
pub const GO_TO_DOCUMENTATION: &str = "Go to the documentation of this file.";
pub const HIERARCHICAL_INDEX: &str = "Hierarchical Index";
pub const HIERARCHY_INTRO: &str =
    "This inheritance list is sorted roughly, but not completely, alphabetically:";
pub const INTRODUCTION: &str = "Introduction";
pub const NOT_AVAILABLE: &str = "N/A";

/// Header of a simple section, `None` for sections without a fixed title.
pub fn simple_sect_title(kind: SimpleSectKind) -> Option<&'static str> {
    let title = match kind {
        SimpleSectKind::See => "See also",
        SimpleSectKind::Return => "Returns",
        SimpleSectKind::Author => "Author",
        SimpleSectKind::Authors => "Authors",
        SimpleSectKind::Version => "Version",
        SimpleSectKind::Since => "Since",
        SimpleSectKind::Date => "Date",
        SimpleSectKind::Pre => "Precondition",
        SimpleSectKind::Post => "Postcondition",
        SimpleSectKind::Copyright => "Copyright",
        SimpleSectKind::Invar => "Invariant",
        SimpleSectKind::Remark => "Remarks",
        _ => return None,
    };
    Some(title)
}

/// Admonition style for note-like simple sections.
pub fn admonition(kind: SimpleSectKind) -> Option<&'static str> {
    match kind {
        SimpleSectKind::Note => Some("NOTE"),
        SimpleSectKind::Warning => Some("WARNING"),
        SimpleSectKind::Attention => Some("CAUTION"),
        _ => None,
    }
}

pub fn param_sect_title(kind: ParamSectKind) -> &'static str {
    match kind {
        ParamSectKind::Param => "Parameters",
        ParamSectKind::RetVal => "Return values",
        ParamSectKind::Exception => "Exceptions",
        ParamSectKind::TemplateParam => "Template Parameters",
    }
}

/// Header of the inner compound list on a compound page.
pub fn inner_list_title(kind: CompoundKind) -> &'static str {
    match kind {
        CompoundKind::Namespace => "Namespaces",
        CompoundKind::File => "Files",
        CompoundKind::Dir => "Directories",
        CompoundKind::Group => "Modules",
        CompoundKind::Page => "Related Pages",
        CompoundKind::Example => "Examples",
        _ => "Classes",
    }
}

/// Index list page: file base, title and introduction.
pub fn index_list(kind: CompoundKind) -> Option<(&'static str, &'static str, &'static str)> {
    let entry = match kind {
        CompoundKind::Class => (
            "annotated",
            "Class List",
            "Here are the classes, structs, unions and interfaces with brief descriptions:",
        ),
        CompoundKind::Namespace => (
            "namespaces",
            "Namespace List",
            "Here is a list of all documented namespaces with brief descriptions:",
        ),
        CompoundKind::File => (
            "files",
            "File List",
            "Here is a list of all documented files with brief descriptions:",
        ),
        CompoundKind::Dir => (
            "dirs",
            "Directories",
            "This directory hierarchy is sorted roughly, but not completely, alphabetically:",
        ),
        _ => return None,
    };
    Some(entry)
}

/// Title of the root-file section that includes the index list of `kind`.
pub fn index_title(kind: CompoundKind) -> &'static str {
    match kind {
        CompoundKind::Namespace => "Namespace Index",
        CompoundKind::File => "File Index",
        CompoundKind::Dir => "Directory Index",
        CompoundKind::Group => "Module Index",
        _ => "Class Index",
    }
}

/// Title of the root-file section that includes the pages of `kind`.
pub fn documentation_title(kind: CompoundKind) -> &'static str {
    match kind {
        CompoundKind::Group => "Module Documentation",
        CompoundKind::Dir => "Directory Documentation",
        CompoundKind::Namespace => "Namespace Documentation",
        CompoundKind::File => "File Documentation",
        CompoundKind::Example => "Example Documentation",
        CompoundKind::Page => "Page Documentation",
        _ => "Class Documentation",
    }
}

/// Title of a source listing page.
pub fn source_file_title(name: &str) -> String {
    format!("{} Source File", name)
}

/// Sentence shown before the diagram of a graph.
pub fn graph_caption(kind: crate::model::GraphKind, name: &str) -> String {
    use crate::model::GraphKind;
    match kind {
        GraphKind::Class => format!("Inheritance diagram for {}:", name),
        GraphKind::Collaboration => format!("Collaboration diagram for {}:", name),
        GraphKind::IncludeDependency => format!("Include dependency graph for {}:", name),
        GraphKind::Call => "Here is the call graph for this function:".to_string(),
        GraphKind::Caller => "Here is the caller graph for this function:".to_string(),
        GraphKind::DirectoryDependency => format!("Directory dependency graph for {}:", name),
        GraphKind::Group => format!("Collaboration diagram for {}:", name),
    }
}
