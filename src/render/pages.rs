//! Page writers built on the generator primitives.
//!
//! One function per output page type: compound pages, the main page, index
//! lists (`annotated`, `namespaces`, `files`, `dirs`), the class hierarchy,
//! source listings and the root document `index.adoc` that includes all of
//! them.

use super::code::SourceLanguage;
use super::generator::{AsciidocGenerator, GeneratedFile};
use super::labels;
use crate::model::{Compound, CompoundKind, CompoundRef, DocNode, MemberDef, MemberList, MemberType, Project};
use crate::text::{anchor_id, convert_to_asciidoc};
use std::collections::{HashMap, HashSet};

/// File base of the class hierarchy page.
const HIERARCHY_FILE: &str = "hierarchy";

/// Part of a compound page a member list is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSection {
    /// One declaration line per member.
    Declaration,
    /// An anchored documentation section per documented member.
    Detailed,
}

/// Kinds with an index list page, in root document order.
const INDEX_LIST_KINDS: [CompoundKind; 4] = [
    CompoundKind::Dir,
    CompoundKind::Namespace,
    CompoundKind::Class,
    CompoundKind::File,
];

/// Kinds with a documentation section in the root document, in order.
const DOCUMENTATION_KINDS: [CompoundKind; 6] = [
    CompoundKind::Group,
    CompoundKind::Dir,
    CompoundKind::Namespace,
    CompoundKind::Class,
    CompoundKind::File,
    CompoundKind::Example,
];

/// Compounds of `kind` that are included by the root document.
///
/// `Class` selects every class-like kind.
pub fn listed_compounds(project: &Project, kind: CompoundKind) -> Vec<&Compound> {
    project
        .compounds
        .iter()
        .filter(|c| same_group(c.kind, kind) && is_included(c))
        .collect()
}

fn same_group(kind: CompoundKind, wanted: CompoundKind) -> bool {
    if wanted == CompoundKind::Class {
        kind.is_class_like()
    } else {
        kind == wanted
    }
}

fn is_included(compound: &Compound) -> bool {
    match compound.kind {
        CompoundKind::Group => !compound.reference,
        CompoundKind::Example => true,
        CompoundKind::Page => !compound.in_group && !compound.reference,
        CompoundKind::Dir | CompoundKind::Namespace | CompoundKind::File => compound.linkable,
        _ => compound.is_listed(),
    }
}

/// Listed classes in inheritance order, each with its depth.
///
/// Roots are the classes without a listed base class; every class follows
/// its base at one level deeper. A class with several listed bases appears
/// under each of them. Empty when no listed class derives from another.
pub fn class_hierarchy(project: &Project) -> Vec<(usize, &Compound)> {
    let classes = listed_compounds(project, CompoundKind::Class);
    let known: HashMap<&str, &Compound> = classes
        .iter()
        .map(|&c| (c.output_file_base.as_str(), c))
        .collect();

    let mut edges: Vec<(&str, &str)> = Vec::new();
    for &class in &classes {
        let own = class.output_file_base.as_str();
        edges.extend(class.base_classes.iter().map(|b| (b.output_file_base.as_str(), own)));
        edges.extend(class.derived_classes.iter().map(|d| (own, d.output_file_base.as_str())));
    }

    let mut derived: HashMap<&str, Vec<&Compound>> = HashMap::new();
    let mut has_base: HashSet<&str> = HashSet::new();
    for (base, child) in edges {
        let Some(&child_class) = known.get(child) else {
            continue;
        };
        if base == child || !known.contains_key(base) {
            continue;
        }
        let list = derived.entry(base).or_default();
        if !list.iter().any(|c| c.output_file_base == child) {
            list.push(child_class);
        }
        has_base.insert(child);
    }
    if derived.is_empty() {
        return Vec::new();
    }

    let mut entries = Vec::new();
    let mut reached = HashSet::new();
    let mut path = Vec::new();
    for &class in &classes {
        if !has_base.contains(class.output_file_base.as_str()) {
            walk_hierarchy(class, 0, &derived, &mut path, &mut reached, &mut entries);
        }
    }
    // classes only reachable through a cycle
    for &class in &classes {
        if !reached.contains(class.output_file_base.as_str()) {
            walk_hierarchy(class, 0, &derived, &mut path, &mut reached, &mut entries);
        }
    }
    entries
}

fn walk_hierarchy<'a>(
    class: &'a Compound,
    depth: usize,
    derived: &HashMap<&str, Vec<&'a Compound>>,
    path: &mut Vec<&'a str>,
    reached: &mut HashSet<&'a str>,
    entries: &mut Vec<(usize, &'a Compound)>,
) {
    let base = class.output_file_base.as_str();
    if path.contains(&base) {
        return;
    }
    entries.push((depth, class));
    reached.insert(base);
    path.push(base);
    for &child in derived.get(base).into_iter().flatten() {
        walk_hierarchy(child, depth + 1, derived, path, reached, entries);
    }
    path.pop();
}

/// Language used for code in the documentation of `compound`.
pub fn compound_language(compound: &Compound) -> SourceLanguage {
    match compound.language.as_deref() {
        Some(lang) => SourceLanguage::from_extension(lang),
        None => SourceLanguage::from_extension(&compound.name),
    }
}

fn non_blank(doc: Option<&DocNode>) -> Option<&DocNode> {
    doc.filter(|d| !d.is_blank())
}

/// Formats the declaration line of a member, `None` for member types that
/// are not listed.
fn declaration_line(file: &str, member: &MemberDef) -> Option<String> {
    let link = format!(
        "<<{},{}>>",
        anchor_id(file, &member.anchor),
        convert_to_asciidoc(&member.name)
    );
    let type_prefix = if member.type_name.is_empty() {
        String::new()
    } else {
        format!("{} ", convert_to_asciidoc(&member.type_name))
    };
    let args = convert_to_asciidoc(&member.args);

    let line = match member.kind {
        MemberType::Define => format!("#define {}{}", link, args),
        MemberType::Function | MemberType::Prototype | MemberType::Signal | MemberType::Slot => {
            format!("{}{}{}", type_prefix, link, args)
        }
        MemberType::Variable | MemberType::Property | MemberType::Event => {
            let mut line = format!("{}{}", type_prefix, link);
            if let Some(init) = &member.initializer {
                line.push(' ');
                line.push_str(&convert_to_asciidoc(init.trim()));
            }
            line
        }
        MemberType::Typedef => format!("typedef {}{}{}", type_prefix, link, args),
        MemberType::Enumeration => {
            let mut line = format!("enum {}", link);
            if !member.enum_values.is_empty() {
                let names: Vec<String> = member
                    .enum_values
                    .iter()
                    .map(|v| convert_to_asciidoc(&v.name))
                    .collect();
                line.push_str(" { ");
                line.push_str(&names.join(", "));
                line.push_str(" }");
            }
            line
        }
        MemberType::Friend | MemberType::EnumValue => return None,
    };
    Some(line)
}

fn has_documentation(member: &MemberDef, always_detailed: bool) -> bool {
    if member.kind == MemberType::EnumValue {
        return false;
    }
    non_blank(member.detailed.as_ref()).is_some()
        || member.enum_values.iter().any(|v| non_blank(v.brief.as_ref()).is_some())
        || (always_detailed && non_blank(member.brief.as_ref()).is_some())
}

impl AsciidocGenerator {
    /// Writes one member list of `compound`.
    pub fn write_member_list(&mut self, compound: &Compound, list: &MemberList, section: MemberSection) {
        match section {
            MemberSection::Declaration => self.write_member_declarations(compound, list),
            MemberSection::Detailed => self.write_member_docs(compound, list),
        }
    }

    fn write_member_declarations(&mut self, compound: &Compound, list: &MemberList) {
        if list.members.is_empty() {
            return;
        }
        let language = compound_language(compound);

        self.start_member_header();
        self.docify(list.list_type.title());
        self.end_member_header();
        self.start_member_list();
        for member in &list.members {
            let Some(line) = declaration_line(&compound.output_file_base, member) else {
                tracing::debug!(member = %member.name, kind = ?member.kind, "member type not listed");
                continue;
            };
            self.start_member_item();
            self.write_string(&line);
            self.write_item_description(member.brief.as_ref(), language);
        }
        self.end_member_list();
    }

    /// Ends a member item, followed by its brief description if any.
    fn write_item_description(&mut self, brief: Option<&DocNode>, language: SourceLanguage) {
        let brief = non_blank(brief);
        self.end_member_item(brief.is_some());
        if let Some(brief) = brief {
            let text = self.inline_doc(brief, language);
            self.start_member_description();
            self.write_string(&text);
            self.end_member_description();
        }
    }

    fn write_member_docs(&mut self, compound: &Compound, list: &MemberList) {
        let options = self.context().options();
        let always_detailed = options.always_detailed_sec;
        let repeat_brief = options.repeat_brief;
        let inline_sources = options.inline_sources;

        let documented: Vec<&MemberDef> = list
            .members
            .iter()
            .filter(|m| has_documentation(m, always_detailed))
            .collect();
        if documented.is_empty() {
            return;
        }
        let language = compound_language(compound);
        let file = compound.output_file_base.as_str();

        self.write_ruler();
        self.start_group_header();
        self.docify(list.list_type.detailed_title());
        self.end_group_header();

        let mut totals: HashMap<&str, usize> = HashMap::new();
        for member in &documented {
            *totals.entry(member.name.as_str()).or_default() += 1;
        }
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for member in documented {
            let total = totals.get(member.name.as_str()).copied().unwrap_or(1);
            let count = counts.entry(member.name.as_str()).or_default();
            *count += 1;
            let count = *count;

            self.start_doxy_anchor(file, &member.anchor);
            self.start_member_doc(&member.doc_title(), count, total);
            self.docify(&member.declaration());
            self.write_labels(&member.labels);
            self.end_member_doc();
            self.end_doxy_anchor();

            if repeat_brief {
                if let Some(brief) = non_blank(member.brief.as_ref()) {
                    self.write_doc(brief, language);
                }
            }
            if let Some(detailed) = non_blank(member.detailed.as_ref()) {
                self.write_doc(detailed, language);
            }
            if !member.enum_values.is_empty() {
                self.write_enum_values(file, member, language);
            }
            if inline_sources {
                if let Some(body) = &member.body {
                    let body_language = body
                        .language
                        .as_deref()
                        .map(SourceLanguage::from_extension)
                        .unwrap_or(language);
                    self.write_code(&body.text, body_language, Some(body.start_line));
                }
            }
        }
        self.end_member_doc_list();
    }

    fn write_enum_values(&mut self, file: &str, member: &MemberDef, language: SourceLanguage) {
        self.ensure_blank_line();
        self.start_desc_table();
        for value in &member.enum_values {
            self.start_desc_table_row();
            self.write_string(&format!("[[{}]]", anchor_id(file, &value.anchor)));
            self.docify(&value.name);
            if let Some(init) = &value.initializer {
                self.write_string(" ");
                self.docify(init.trim());
            }
            self.end_desc_table_title();
            self.start_desc_table_data();
            if let Some(brief) = non_blank(value.brief.as_ref()) {
                let text = self.inline_doc(brief, language);
                self.write_string(&text);
            }
            self.end_desc_table_data();
        }
        self.end_desc_table();
    }

    fn write_inner_compounds(&mut self, inner: &[CompoundRef], language: SourceLanguage) {
        let group = |kind: CompoundKind| {
            if kind.is_class_like() {
                CompoundKind::Class
            } else {
                kind
            }
        };
        let mut kinds: Vec<CompoundKind> = Vec::new();
        for entry in inner {
            if !kinds.contains(&group(entry.kind)) {
                kinds.push(group(entry.kind));
            }
        }

        for kind in kinds {
            self.start_member_header();
            self.docify(labels::inner_list_title(kind));
            self.end_member_header();
            self.start_member_list();
            for entry in inner.iter().filter(|e| group(e.kind) == kind) {
                self.start_member_item();
                self.write_string(entry.kind.keyword());
                self.write_string(" ");
                self.write_object_link(&entry.output_file_base, None, &entry.name);
                self.write_item_description(entry.brief.as_ref(), language);
            }
            self.end_member_list();
        }
    }

    /// Writes the page of one compound.
    pub fn write_compound(&mut self, compound: &Compound) -> GeneratedFile {
        tracing::debug!(compound = %compound.name, kind = ?compound.kind, "writing compound page");
        self.start_file(&compound.output_file_base);
        self.write_compound_body(compound);
        self.finish_file()
    }

    /// Writes the main page as `mainpage.adoc`.
    pub fn write_main_page(&mut self, page: &Compound) -> GeneratedFile {
        let language = compound_language(page);
        self.start_file("index");
        if let Some(title) = page.title.as_deref().filter(|t| !t.trim().is_empty()) {
            self.start_title_head();
            self.docify(title);
            self.end_title_head();
        }
        if let Some(brief) = non_blank(page.brief.as_ref()) {
            self.write_doc(brief, language);
        }
        if let Some(detailed) = non_blank(page.detailed.as_ref()) {
            self.write_doc(detailed, language);
        }
        self.finish_file()
    }

    fn write_compound_body(&mut self, compound: &Compound) {
        let language = compound_language(compound);
        let base = compound.output_file_base.as_str();

        self.start_title_head();
        self.docify(&compound.display_title());
        self.write_labels(&compound.labels);
        self.end_title_head();

        let brief = non_blank(compound.brief.as_ref());
        if let Some(brief) = brief {
            self.write_doc(brief, language);
        }
        if let Some(include) = &compound.include_file {
            self.ensure_blank_line();
            self.start_typewriter();
            self.docify(&format!("#include <{}>", include));
            self.end_typewriter();
            self.line_break();
        }
        for graph in &compound.graphs {
            self.write_graph(graph, base, &compound.name);
        }
        self.write_inner_compounds(&compound.inner, language);
        for list in &compound.member_lists {
            self.write_member_list(compound, list, MemberSection::Declaration);
        }

        let detailed = non_blank(compound.detailed.as_ref());
        match compound.kind {
            CompoundKind::Page | CompoundKind::Example => {
                if let Some(detailed) = detailed {
                    self.write_doc(detailed, language);
                }
                if let Some(source) = &compound.source {
                    self.write_code(&source.text, language, None);
                }
            }
            _ => {
                if let Some(detailed) = detailed {
                    self.write_ruler();
                    self.start_group_header();
                    self.docify(labels::DETAILED_DESCRIPTION);
                    self.end_group_header();
                    if self.context().options().repeat_brief {
                        if let Some(brief) = brief {
                            self.write_doc(brief, language);
                        }
                    }
                    self.write_doc(detailed, language);
                }
            }
        }

        for list in &compound.member_lists {
            self.write_member_list(compound, list, MemberSection::Detailed);
        }
    }

    /// Writes an index list page (`annotated`, `namespaces`, `files` or
    /// `dirs`); `None` for kinds without one.
    pub fn write_index_list(&mut self, kind: CompoundKind, compounds: &[&Compound]) -> Option<GeneratedFile> {
        let (base, title, intro) = labels::index_list(kind)?;
        self.start_file(base);
        self.start_title_head();
        self.docify(title);
        self.end_title_head();
        self.ensure_blank_line();
        self.docify(intro);
        self.write_string("\n\n");

        for compound in compounds {
            self.write_object_link(&compound.output_file_base, None, &compound.name);
            self.write_string(":: ");
            match non_blank(compound.brief.as_ref()) {
                Some(brief) => {
                    let text = self.inline_doc(brief, compound_language(compound));
                    self.write_string(&text);
                }
                None => {
                    self.start_small();
                    self.docify(labels::NOT_AVAILABLE);
                    self.end_small();
                }
            }
            self.write_string("\n\n");
        }
        Some(self.finish_file())
    }

    /// Writes the class hierarchy page as a nested list; `None` when no
    /// listed class derives from another.
    pub fn write_hierarchy(&mut self, project: &Project) -> Option<GeneratedFile> {
        let entries = class_hierarchy(project);
        if entries.is_empty() {
            return None;
        }
        self.start_file(HIERARCHY_FILE);
        self.start_title_head();
        self.docify(labels::CLASS_HIERARCHY);
        self.end_title_head();
        self.ensure_blank_line();
        self.docify(labels::HIERARCHY_INTRO);
        self.write_string("\n\n");

        for (depth, class) in entries {
            self.write_string(&"*".repeat(depth + 1));
            self.write_string(" ");
            self.write_object_link(&class.output_file_base, None, &class.name);
            self.write_string("\n");
        }
        Some(self.finish_file())
    }

    /// Writes the source listing page of a file; `None` when the file has
    /// no source attached.
    pub fn write_source_file(&mut self, compound: &Compound) -> Option<GeneratedFile> {
        if !compound.has_source_page() {
            return None;
        }
        let source = compound.source.as_ref()?;
        let base = compound.source_file_base.as_deref()?;
        let language = match source.language.as_deref() {
            Some(lang) => SourceLanguage::from_extension(lang),
            None => compound_language(compound),
        };

        self.start_file(base);
        self.start_title_head();
        self.docify(&labels::source_file_title(&compound.name));
        self.end_title_head();
        self.ensure_blank_line();
        self.write_object_link(&compound.output_file_base, None, labels::GO_TO_DOCUMENTATION);
        self.write_string("\n");
        self.write_code(&source.text, language, Some(source.start_line));
        Some(self.finish_file())
    }

    /// Writes the root document `index.adoc`.
    pub fn write_index(&mut self, project: &Project) -> GeneratedFile {
        let options = self.context().options();
        let name = if options.project_name.is_empty() {
            project.name.clone()
        } else {
            options.project_name.clone()
        };
        let brief = options.project_brief.clone().or_else(|| project.brief.clone());
        let header = format!(
            ":toc: {}\n:experimental:\n:source-highlighter: {}\n\n",
            options.toc, options.source_highlighter
        );
        let with_sources = options.source_browser && options.program_listing;

        self.start_file("refman");
        self.write_string("= ");
        self.docify(&name);
        if let Some(brief) = brief.as_deref().filter(|b| !b.trim().is_empty()) {
            self.write_string(": ");
            self.docify(brief);
        }
        self.write_string("\n");
        self.write_string(&header);

        if project.main_page.is_some() {
            self.write_index_section(labels::INTRODUCTION);
            self.write_include("mainpage");
            self.write_string("\n");
        }

        let with_hierarchy = !class_hierarchy(project).is_empty();
        for kind in INDEX_LIST_KINDS {
            if kind == CompoundKind::Class && with_hierarchy {
                self.write_index_section(labels::HIERARCHICAL_INDEX);
                self.write_include(HIERARCHY_FILE);
                self.write_string("\n");
            }
            let Some((base, _, _)) = labels::index_list(kind) else {
                continue;
            };
            if listed_compounds(project, kind).is_empty() {
                continue;
            }
            self.write_index_section(labels::index_title(kind));
            self.write_include(base);
            self.write_string("\n");
        }

        for kind in DOCUMENTATION_KINDS {
            let compounds = listed_compounds(project, kind);
            if compounds.is_empty() {
                continue;
            }
            self.write_index_section(labels::documentation_title(kind));
            for compound in compounds {
                self.write_include(&compound.output_file_base);
                if kind == CompoundKind::File && with_sources && compound.has_source_page() {
                    if let Some(source_base) = &compound.source_file_base {
                        self.write_include(source_base);
                    }
                }
            }
            self.write_string("\n");
        }

        for page in listed_compounds(project, CompoundKind::Page) {
            self.write_index_section(&page.display_title());
            self.write_string("\n");
            self.write_include(&page.output_file_base);
            self.write_string("\n");
        }

        self.finish_file()
    }

    fn write_index_section(&mut self, title: &str) {
        self.start_subsection();
        self.docify(title);
        self.end_subsection();
    }
}
