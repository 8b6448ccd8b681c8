//! Output directory handling and whole-project generation.

use crate::error::{Diagnostic, Error, Result};
use crate::model::{CompoundKind, Project};
use crate::render::{listed_compounds, AsciidocGenerator, GeneratedFile, RenderContext};
use std::path::{Path, PathBuf};

/// Kinds with an index list page.
const INDEX_LIST_KINDS: [CompoundKind; 4] = [
    CompoundKind::Dir,
    CompoundKind::Namespace,
    CompoundKind::Class,
    CompoundKind::File,
];

/// Kinds whose compounds get a page of their own.
const PAGE_KINDS: [CompoundKind; 7] = [
    CompoundKind::Group,
    CompoundKind::Dir,
    CompoundKind::Namespace,
    CompoundKind::Class,
    CompoundKind::File,
    CompoundKind::Example,
    CompoundKind::Page,
];

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written, in generation order.
    pub files: Vec<PathBuf>,
    /// Non-fatal problems encountered on the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// Creates the output directory (and its parents).
pub fn init_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes a page into `dir` and returns its path.
pub fn write_file(dir: &Path, file: &GeneratedFile) -> Result<PathBuf> {
    let path = dir.join(&file.name);
    std::fs::write(&path, &file.content).map_err(|source| Error::OpenFile {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Generates the AsciiDoc documentation of `project`.
///
/// Writes `index.adoc`, the main page, the index lists, the class hierarchy
/// and one page per included compound into the configured output directory.
/// An invalid model or a failure to create that directory is fatal; pages
/// that cannot be written are reported as error diagnostics.
pub fn generate(project: &Project, ctx: RenderContext) -> Result<GenerationReport> {
    let out_dir = ctx.options().output_dir.clone();
    let with_sources = ctx.options().source_browser && ctx.options().program_listing;
    project.validate()?;
    init_output_dir(&out_dir)?;
    tracing::info!(
        project = %project.name,
        compounds = project.compounds.len(),
        output = %out_dir.display(),
        "generating AsciiDoc"
    );

    let mut generator = AsciidocGenerator::new(ctx);
    let mut files = Vec::new();

    let index = generator.write_index(project);
    emit(&mut generator, &out_dir, &index, &mut files);
    if let Some(main) = &project.main_page {
        let page = generator.write_main_page(main);
        emit(&mut generator, &out_dir, &page, &mut files);
    }

    for kind in INDEX_LIST_KINDS {
        if kind == CompoundKind::Class {
            if let Some(page) = generator.write_hierarchy(project) {
                emit(&mut generator, &out_dir, &page, &mut files);
            }
        }
        let compounds = listed_compounds(project, kind);
        if compounds.is_empty() {
            continue;
        }
        if let Some(page) = generator.write_index_list(kind, &compounds) {
            emit(&mut generator, &out_dir, &page, &mut files);
        }
    }

    for kind in PAGE_KINDS {
        for compound in listed_compounds(project, kind) {
            let page = generator.write_compound(compound);
            emit(&mut generator, &out_dir, &page, &mut files);
            if with_sources {
                if let Some(source) = generator.write_source_file(compound) {
                    emit(&mut generator, &out_dir, &source, &mut files);
                }
            }
        }
    }

    let diagnostics = generator.into_context().take_diagnostics();
    tracing::info!(files = files.len(), problems = diagnostics.len(), "generation finished");
    Ok(GenerationReport { files, diagnostics })
}

fn emit(generator: &mut AsciidocGenerator, dir: &Path, page: &GeneratedFile, files: &mut Vec<PathBuf>) {
    match write_file(dir, page) {
        Ok(path) => {
            tracing::debug!(file = %path.display(), bytes = page.content.len(), "wrote page");
            files.push(path);
        }
        Err(e) => generator.context_mut().error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compound, DocNode};
    use crate::render::RenderOptions;

    fn project() -> Project {
        let mut project = Project::new("Geo");
        let mut shape = Compound::new(CompoundKind::Class, "Shape", "classShape");
        shape.brief = Some(DocNode::root(vec![DocNode::text_para("A shape.")]));
        project.compounds.push(shape);
        project
            .compounds
            .push(Compound::new(CompoundKind::Namespace, "geo", "namespacegeo"));
        project
    }

    #[test]
    fn test_generate_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("adoc");
        let ctx = RenderContext::new(RenderOptions::default().with_output_dir(&out));

        let report = generate(&project(), ctx).unwrap();
        let names: Vec<String> = report
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "index.adoc",
                "namespaces.adoc",
                "annotated.adoc",
                "namespacegeo.adoc",
                "classShape.adoc"
            ]
        );
        assert!(report.diagnostics.is_empty());

        let annotated = std::fs::read_to_string(out.join("annotated.adoc")).unwrap();
        assert!(annotated.contains("<<classShape,Shape>>:: A shape.\n"));
    }

    #[test]
    fn test_output_dir_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let ctx = RenderContext::new(RenderOptions::default().with_output_dir(blocker.join("out")));

        match generate(&project(), ctx) {
            Err(Error::CreateOutputDir { path, .. }) => assert_eq!(path, blocker.join("out")),
            other => panic!("expected CreateOutputDir, got {:?}", other),
        }
    }

    #[test]
    fn test_write_file_failure() {
        let dir = tempfile::tempdir().unwrap();
        let page = GeneratedFile {
            name: "missing/page.adoc".to_string(),
            content: String::new(),
        };
        assert!(matches!(
            write_file(dir.path(), &page),
            Err(Error::OpenFile { .. })
        ));
    }

    #[test]
    fn test_report_counts() {
        let report = GenerationReport {
            files: Vec::new(),
            diagnostics: vec![Diagnostic::error("a"), Diagnostic::warning("b"), Diagnostic::warning("c")],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 2);
    }
}
