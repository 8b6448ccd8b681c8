//! External diagram renderers (dot, mscgen, plantuml, dia).

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Diagram source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Dot,
    Msc,
    PlantUml,
    Dia,
}

impl DiagramKind {
    /// Name of the tool that renders this kind.
    pub fn tool_name(&self) -> &'static str {
        match self {
            DiagramKind::Dot => "dot",
            DiagramKind::Msc => "mscgen",
            DiagramKind::PlantUml => "plantuml",
            DiagramKind::Dia => "dia",
        }
    }

    /// Extension of the source file written for inline diagrams.
    pub fn source_extension(&self) -> &'static str {
        match self {
            DiagramKind::Dot => "dot",
            DiagramKind::Msc => "msc",
            DiagramKind::PlantUml => "pu",
            DiagramKind::Dia => "dia",
        }
    }

    /// Prefix of images rendered from diagram files.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            DiagramKind::Dot => "dot_",
            DiagramKind::Msc => "msc_",
            DiagramKind::PlantUml => "uml_",
            DiagramKind::Dia => "dia_",
        }
    }
}

/// Renders a diagram source file into an image.
pub trait DiagramRenderer {
    /// Renders `source` into `out_dir/<base_name>.<format>` and returns the
    /// image file name relative to `out_dir`.
    fn render(
        &self,
        kind: DiagramKind,
        source: &Path,
        out_dir: &Path,
        base_name: &str,
        format: &str,
    ) -> Result<String>;
}

/// Renders diagrams by running the external tools.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    pub dot: PathBuf,
    pub mscgen: PathBuf,
    pub plantuml: PathBuf,
    pub dia: PathBuf,
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self {
            dot: PathBuf::from("dot"),
            mscgen: PathBuf::from("mscgen"),
            plantuml: PathBuf::from("plantuml"),
            dia: PathBuf::from("dia"),
        }
    }
}

impl ExternalTools {
    fn command(&self, kind: DiagramKind, source: &Path, image: &Path, out_dir: &Path, format: &str) -> Command {
        match kind {
            DiagramKind::Dot => {
                let mut cmd = Command::new(&self.dot);
                cmd.arg(format!("-T{}", format)).arg("-o").arg(image).arg(source);
                cmd
            }
            DiagramKind::Msc => {
                let mut cmd = Command::new(&self.mscgen);
                cmd.arg("-T").arg(format).arg("-o").arg(image).arg(source);
                cmd
            }
            DiagramKind::PlantUml => {
                // plantuml names the image after the @startuml label
                let mut cmd = Command::new(&self.plantuml);
                cmd.arg(format!("-t{}", format)).arg("-o").arg(out_dir).arg(source);
                cmd
            }
            DiagramKind::Dia => {
                let mut cmd = Command::new(&self.dia);
                cmd.arg("-n").arg("-e").arg(image).arg("-t").arg(format).arg(source);
                cmd
            }
        }
    }
}

impl DiagramRenderer for ExternalTools {
    fn render(
        &self,
        kind: DiagramKind,
        source: &Path,
        out_dir: &Path,
        base_name: &str,
        format: &str,
    ) -> Result<String> {
        let image_name = format!("{}.{}", base_name, format);
        let image = out_dir.join(&image_name);
        let mut cmd = self.command(kind, source, &image, out_dir, format);
        tracing::debug!(tool = kind.tool_name(), source = %source.display(), "rendering diagram");

        let output = cmd.output().map_err(|e| Error::ExternalTool {
            tool: kind.tool_name().to_string(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(Error::ExternalTool {
                tool: kind.tool_name().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(image_name)
    }
}

/// Renderer that only names the images; nothing is run.
///
/// Useful when images are produced by a separate build step.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipDiagrams;

impl DiagramRenderer for SkipDiagrams {
    fn render(
        &self,
        kind: DiagramKind,
        source: &Path,
        _out_dir: &Path,
        base_name: &str,
        format: &str,
    ) -> Result<String> {
        tracing::debug!(tool = kind.tool_name(), source = %source.display(), "diagram rendering skipped");
        Ok(format!("{}.{}", base_name, format))
    }
}
