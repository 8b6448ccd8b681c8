//! Rendering options for AsciiDoc output.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Options for AsciiDoc rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Directory that receives the generated `.adoc` files, images and
    /// temporary diagram sources.
    /// Default: "asciidoc"
    pub output_dir: PathBuf,

    /// Project name used in the document title.
    pub project_name: String,

    /// One-line project description appended to the document title.
    pub project_brief: Option<String>,

    /// Whether to pretty-print code fragments and include source listings.
    pub program_listing: bool,

    /// Whether source listing pages are produced for files.
    pub source_browser: bool,

    /// Whether member bodies are shown in the member documentation.
    pub inline_sources: bool,

    /// Whether a detailed section is written for members that only have a
    /// brief description.
    pub always_detailed_sec: bool,

    /// Whether the brief description is repeated in the detailed section.
    pub repeat_brief: bool,

    /// Number of columns a tab advances to in code listings.
    pub tab_size: usize,

    /// Image format produced by dot.
    /// Default: "png"
    pub dot_image_format: String,

    /// Directories searched for images referenced by `\image`.
    pub image_paths: Vec<PathBuf>,

    /// Value of the `:source-highlighter:` document attribute.
    pub source_highlighter: String,

    /// Value of the `:toc:` document attribute.
    pub toc: String,

    /// Prefix for image references, relative to the including document.
    pub relative_path: String,

    /// Whether diagram sources and images are written into `output_dir`.
    /// When disabled only the image references are emitted.
    /// Default: true
    pub write_diagrams: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("asciidoc"),
            project_name: String::new(),
            project_brief: None,
            program_listing: true,
            source_browser: false,
            inline_sources: false,
            always_detailed_sec: false,
            repeat_brief: true,
            tab_size: 4,
            dot_image_format: "png".to_string(),
            image_paths: Vec::new(),
            source_highlighter: "coderay".to_string(),
            toc: "left".to_string(),
            relative_path: String::new(),
            write_diagrams: true,
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a JSON file; missing keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the project name and brief used in the document title.
    pub fn with_project(mut self, name: impl Into<String>, brief: Option<String>) -> Self {
        self.project_name = name.into();
        self.project_brief = brief;
        self
    }

    /// Enables or disables pretty-printed program listings.
    pub fn with_program_listing(mut self, enabled: bool) -> Self {
        self.program_listing = enabled;
        self
    }

    /// Enables source listing pages for files.
    pub fn with_source_browser(mut self) -> Self {
        self.source_browser = true;
        self
    }

    /// Shows member bodies in the member documentation.
    pub fn with_inline_sources(mut self) -> Self {
        self.inline_sources = true;
        self
    }

    /// Writes a detailed section even for members with only a brief.
    pub fn with_always_detailed_sec(mut self) -> Self {
        self.always_detailed_sec = true;
        self
    }

    /// Sets the tab width for code listings.
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Adds a directory to the image search path.
    pub fn with_image_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_paths.push(dir.into());
        self
    }

    /// Sets the dot image format.
    pub fn with_dot_image_format(mut self, format: impl Into<String>) -> Self {
        self.dot_image_format = format.into();
        self
    }

    /// Emits image references without writing any diagram files.
    pub fn without_diagram_files(mut self) -> Self {
        self.write_diagrams = false;
        self
    }

    /// Looks up an image by name in the image search path.
    pub fn find_image(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() && direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.image_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = RenderOptions::default()
            .with_output_dir("out")
            .with_project("Demo", Some("A demo".to_string()))
            .with_tab_size(0)
            .with_source_browser();

        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.project_name, "Demo");
        assert_eq!(options.tab_size, 1);
        assert!(options.source_browser);
        assert!(options.program_listing);
        assert!(options.write_diagrams);
        assert!(!options.without_diagram_files().write_diagrams);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"project_name": "X", "tab_size": 8}"#).unwrap();
        assert_eq!(options.project_name, "X");
        assert_eq!(options.tab_size, 8);
        assert_eq!(options.dot_image_format, "png");
        assert_eq!(options.output_dir, PathBuf::from("asciidoc"));
    }

    #[test]
    fn test_find_image_in_search_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();
        let options = RenderOptions::default().with_image_path(dir.path());

        assert_eq!(options.find_image("logo.png"), Some(dir.path().join("logo.png")));
        assert_eq!(options.find_image("missing.png"), None);
    }
}
