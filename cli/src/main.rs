//! adocgen CLI - AsciiDoc documentation generator
//!
//! A command-line tool for rendering documentation models to AsciiDoc.

use adocgen::render::{self, RenderContext, SourceLanguage};
use adocgen::{load_doc, load_project, AdocGen, Diagnostic, GenerationReport, RenderOptions};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Documentation model to AsciiDoc
#[derive(Parser)]
#[command(
    name = "adocgen",
    version,
    about = "Render documentation models to AsciiDoc",
    long_about = "adocgen - AsciiDoc output for source-code documentation.\n\n\
                  Reads a documentation model (JSON) and writes one .adoc file per\n\
                  compound plus an index.adoc that includes them all.\n\n\
                  Usage:\n  \
                  adocgen <model.json>              Generate into ./asciidoc next to the model\n  \
                  adocgen <model.json> <output>     Generate into the given directory\n  \
                  adocgen page <model.json> <name>  Render a single compound page\n\n\
                  Set ADOCGEN_LOG (e.g. ADOCGEN_LOG=debug) to control logging."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model file path (for default generation)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Output directory (for default generation)
    #[arg(global = false)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the documentation of a whole project
    #[command(visible_alias = "gen")]
    Generate {
        /// Model file path
        input: PathBuf,

        /// Output directory (default: asciidoc next to the model)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render options file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write source listing pages for files
        #[arg(long)]
        source_browser: bool,

        /// Show member bodies in the member documentation
        #[arg(long)]
        inline_sources: bool,

        /// Print code without the pretty-printer
        #[arg(long)]
        no_program_listing: bool,

        /// Tab width in code listings
        #[arg(long)]
        tab_size: Option<usize>,

        /// Image format produced by dot
        #[arg(long)]
        dot_format: Option<String>,

        /// Directory searched for images (repeatable)
        #[arg(long = "image-path")]
        image_paths: Vec<PathBuf>,

        /// Do not run dot, mscgen, plantuml or dia
        #[arg(long)]
        no_diagrams: bool,
    },

    /// Render the page of a single compound
    Page {
        /// Model file path
        input: PathBuf,

        /// Compound name or output file base
        name: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a single documentation tree (JSON) to AsciiDoc
    Doc {
        /// Documentation tree file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language of code blocks (file extension, e.g. cpp)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show project statistics
    Info {
        /// Model file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Generation settings collected from the command line.
#[derive(Default)]
struct GenerateArgs {
    config: Option<PathBuf>,
    source_browser: bool,
    inline_sources: bool,
    no_program_listing: bool,
    tab_size: Option<usize>,
    dot_format: Option<String>,
    image_paths: Vec<PathBuf>,
    no_diagrams: bool,
}

impl GenerateArgs {
    fn into_options(self, output_dir: PathBuf) -> Result<RenderOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => RenderOptions::from_path(path)?,
            None => RenderOptions::default(),
        };
        options = options.with_output_dir(output_dir);
        if self.source_browser {
            options = options.with_source_browser();
        }
        if self.inline_sources {
            options = options.with_inline_sources();
        }
        if self.no_program_listing {
            options = options.with_program_listing(false);
        }
        if let Some(tab_size) = self.tab_size {
            options = options.with_tab_size(tab_size);
        }
        if let Some(format) = self.dot_format {
            options = options.with_dot_image_format(format);
        }
        for dir in self.image_paths {
            options = options.with_image_path(dir);
        }
        Ok(options)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ADOCGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Handle default command (adocgen <model> [output])
    let Some(command) = cli.command else {
        if let Some(input) = cli.input {
            return run_generate(&input, cli.output, GenerateArgs::default());
        }
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Generate {
            input,
            output,
            config,
            source_browser,
            inline_sources,
            no_program_listing,
            tab_size,
            dot_format,
            image_paths,
            no_diagrams,
        } => {
            let args = GenerateArgs {
                config,
                source_browser,
                inline_sources,
                no_program_listing,
                tab_size,
                dot_format,
                image_paths,
                no_diagrams,
            };
            run_generate(&input, output, args)?;
        }

        Commands::Page {
            input,
            name,
            output,
        } => {
            let pb = create_spinner("Loading model...");

            // single pages go to stdout or one file; no diagram files are written
            let mut loaded = AdocGen::new()
                .with_options(RenderOptions::default().without_diagram_files())
                .load(&input)?;
            pb.set_message(format!("Rendering {}...", name));
            let page = loaded.render_page(&name)?;

            pb.finish_and_clear();
            print_diagnostics(loaded.diagnostics());
            write_output(output.as_ref(), &page.content)?;

            if let Some(path) = output {
                println!(
                    "{} Rendered {}: {}",
                    "✓".green().bold(),
                    page.name,
                    path.display()
                );
            }
        }

        Commands::Doc {
            input,
            output,
            language,
        } => {
            let doc = load_doc(&input)?;
            let language = language
                .as_deref()
                .map(SourceLanguage::from_extension)
                .unwrap_or_default();

            let mut ctx = RenderContext::new(RenderOptions::default().without_diagram_files());
            let text = render::render_doc_with(&doc, language, &mut ctx);

            print_diagnostics(ctx.diagnostics());
            write_output(output.as_ref(), &text)?;

            if let Some(path) = output {
                println!("{} Converted to AsciiDoc: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Loading model...");
            let project = load_project(&input)?;
            pb.finish_and_clear();

            println!("{}", "Project Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Name".bold(), project.name);
            if let Some(ref brief) = project.brief {
                println!("{}: {}", "Brief".bold(), brief);
            }
            println!(
                "{}: {}",
                "Main page".bold(),
                if project.main_page.is_some() { "Yes" } else { "No" }
            );

            println!("\n{}", "Compounds".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Classes".bold(), project.classes().count());
            for kind in [
                adocgen::CompoundKind::Namespace,
                adocgen::CompoundKind::File,
                adocgen::CompoundKind::Dir,
                adocgen::CompoundKind::Group,
                adocgen::CompoundKind::Page,
                adocgen::CompoundKind::Example,
            ] {
                let count = project.compounds_of(kind).count();
                if count > 0 {
                    println!("{}: {}", kind.label().bold(), count);
                }
            }
            println!("{}: {}", "Members".bold(), project.member_count());
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Run the generate command - writes the whole project to the output directory
fn run_generate(
    input: &Path,
    output: Option<PathBuf>,
    args: GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Loading model...");

    // Determine output directory
    let output_dir = match output {
        Some(p) => p,
        None => input.parent().unwrap_or(Path::new(".")).join("asciidoc"),
    };

    let no_diagrams = args.no_diagrams;
    let options = args.into_options(output_dir.clone())?;
    let mut builder = AdocGen::new().with_options(options);
    if no_diagrams {
        builder = builder.without_diagrams();
    }
    let loaded = builder.load(input)?;
    let compounds = loaded.compound_count();
    let members = loaded.member_count();

    pb.set_message("Generating AsciiDoc...");
    let report = loaded.generate()?;

    pb.finish_and_clear();
    print_report(&output_dir, &report, compounds, members);

    Ok(())
}

fn print_report(output_dir: &Path, report: &GenerationReport, compounds: usize, members: usize) {
    println!("{}", "Generation Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output_dir.display());
    for path in report.files.iter().take(10) {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", "✓".green(), name);
    }
    if report.files.len() > 10 {
        println!("  ... and {} more", report.files.len() - 10);
    }

    println!("\n{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Files".bold(), report.files.len());
    println!("{}: {}", "Compounds".bold(), compounds);
    println!("{}: {}", "Members".bold(), members);
    println!("{}: {}", "Errors".bold(), report.error_count());
    println!("{}: {}", "Warnings".bold(), report.warning_count());

    if !report.diagnostics.is_empty() {
        println!();
        print_diagnostics(&report.diagnostics);
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.is_error() {
            eprintln!("{} {}", "error:".red().bold(), diagnostic.message);
        } else {
            eprintln!("{} {}", "warning:".yellow().bold(), diagnostic.message);
        }
    }
}

fn print_version() {
    println!("{} {}", "adocgen".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("AsciiDoc output for source-code documentation");
    println!();
    println!("Diagram tools: dot, mscgen, plantuml, dia (optional, on PATH)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "adocgen",
            "generate",
            "model.json",
            "-o",
            "out",
            "--source-browser",
            "--tab-size",
            "8",
            "--image-path",
            "img",
            "--image-path",
            "pics",
            "--no-diagrams",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                output,
                source_browser,
                tab_size,
                image_paths,
                no_diagrams,
                ..
            }) => {
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(source_browser);
                assert_eq!(tab_size, Some(8));
                assert_eq!(image_paths.len(), 2);
                assert!(no_diagrams);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_options_from_args() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"project_name": "Geo", "toc": "right"}"#).unwrap();

        let args = GenerateArgs {
            config: Some(config),
            inline_sources: true,
            tab_size: Some(2),
            ..GenerateArgs::default()
        };
        let options = args.into_options(PathBuf::from("out")).unwrap();
        assert_eq!(options.project_name, "Geo");
        assert_eq!(options.toc, "right");
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert!(options.inline_sources);
        assert_eq!(options.tab_size, 2);
    }

    #[test]
    fn test_generate_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        fs::write(&model, r#"{"name": "Empty"}"#).unwrap();

        run_generate(&model, None, GenerateArgs::default()).unwrap();
        let index = fs::read_to_string(dir.path().join("asciidoc").join("index.adoc")).unwrap();
        assert!(index.starts_with("= Empty\n"));
    }

    #[test]
    fn test_page_writes_no_diagram_files() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        fs::write(
            &model,
            r#"{"name": "Geo", "compounds": [
                {"kind": "class", "name": "Shape", "output_file_base": "classShape",
                 "graphs": [{"kind": "class", "source": "digraph { Shape }"}]}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("shape.adoc");

        let cli = Cli::try_parse_from([
            "adocgen",
            "page",
            model.to_str().unwrap(),
            "Shape",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let page = fs::read_to_string(&out).unwrap();
        assert!(page.contains("image::classShape_inherit_graph.png[classShape_inherit_graph]"));
        assert!(!Path::new("asciidoc").join("classShape_inherit_graph.dot").exists());
    }
}
