//! State shared by every visitor and generator of one output run.

use super::code::{CodeParser, PlainCodeParser};
use super::diagrams::{DiagramKind, DiagramRenderer, ExternalTools};
use super::RenderOptions;
use crate::error::Diagnostic;
use std::path::{Path, PathBuf};

/// Options, external collaborators, inline diagram counters and diagnostics.
pub struct RenderContext {
    options: RenderOptions,
    code_parser: Box<dyn CodeParser>,
    diagrams: Box<dyn DiagramRenderer>,
    dot_index: u32,
    msc_index: u32,
    uml_index: u32,
    diagnostics: Vec<Diagnostic>,
}

impl RenderContext {
    /// Creates a context using the plain code printer and the external
    /// diagram tools.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            code_parser: Box::new(PlainCodeParser),
            diagrams: Box::new(ExternalTools::default()),
            dot_index: 0,
            msc_index: 0,
            uml_index: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Replaces the source-code pretty-printer.
    pub fn with_code_parser(mut self, parser: Box<dyn CodeParser>) -> Self {
        self.code_parser = parser;
        self
    }

    /// Replaces the diagram renderer.
    pub fn with_diagram_renderer(mut self, renderer: Box<dyn DiagramRenderer>) -> Self {
        self.diagrams = renderer;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn code_parser(&self) -> &dyn CodeParser {
        self.code_parser.as_ref()
    }

    pub fn diagram_renderer(&self) -> &dyn DiagramRenderer {
        self.diagrams.as_ref()
    }

    /// Image format produced for diagrams of `kind`.
    pub fn image_format(&self, kind: DiagramKind) -> &str {
        match kind {
            DiagramKind::Dot => &self.options.dot_image_format,
            _ => "png",
        }
    }

    /// Returns the next sequence number for an inline diagram of `kind`.
    ///
    /// Numbers start at 1 and are unique per kind over the whole run.
    pub fn next_inline_index(&mut self, kind: DiagramKind) -> u32 {
        let counter = match kind {
            DiagramKind::Dot => &mut self.dot_index,
            DiagramKind::Msc => &mut self.msc_index,
            DiagramKind::PlantUml | DiagramKind::Dia => &mut self.uml_index,
        };
        *counter += 1;
        *counter
    }

    /// Writes a diagram source into the output directory, creating the
    /// directory if needed.
    ///
    /// Returns `None` after recording an error if the file cannot be written.
    pub fn write_diagram_source(&mut self, file_name: &str, text: &str) -> Option<PathBuf> {
        let dir = &self.options.output_dir;
        let path = dir.join(file_name);
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, text)) {
            self.error(format!("could not open file {} for writing: {}", path.display(), e));
            return None;
        }
        Some(path)
    }

    /// Renders a diagram source and returns the image file name.
    ///
    /// Nothing is run when diagram files are disabled. On failure the error
    /// is recorded and the expected image name is returned anyway.
    pub fn render_diagram(&mut self, kind: DiagramKind, source: &Path, base: &str) -> String {
        let format = self.image_format(kind).to_string();
        if !self.options.write_diagrams {
            return format!("{}.{}", base, format);
        }
        let rendered = self
            .diagrams
            .render(kind, source, &self.options.output_dir, base, &format);
        match rendered {
            Ok(image) => image,
            Err(e) => {
                self.error(format!("could not render {}: {}", source.display(), e));
                format!("{}.{}", base, format)
            }
        }
    }

    /// Logs and records an error; rendering continues.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.diagnostics.push(Diagnostic::error(message));
    }

    /// Logs and records a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.diagnostics.push(Diagnostic::warning(message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Removes and returns the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
