//! docoutline CLI - heading outlines and persona-ranked sections from span files

mod budget;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use docoutline::render::{to_json, write_json, Metadata};
use docoutline::{
    analyze_collection, analyze_document, load_collection, load_persona_config, load_spans,
    AnalysisMode, AnalysisOptions, DocumentType, JsonFormat, OutlineResult, PageSelection,
    PersonaConfig, PersonaResult, SelectionOptions, YAxis,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use budget::{budget_from_secs, run_with_budget};

#[derive(Parser)]
#[command(name = "docoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract heading outlines and persona-ranked sections from layout-annotated spans")]
struct Cli {
    /// Span file to outline (shorthand for `docoutline outline <FILE>`)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the title and heading outline of one document
    Outline {
        /// Input span file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Outline every span file in a directory
    Batch {
        /// Directory containing span files (*.json)
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory for outline files
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Rank sections of a document collection for a persona
    Persona {
        /// Persona configuration (JSON)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Directory holding one span file per configured document
        #[arg(long, value_name = "DIR")]
        spans_dir: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of sections to rank
        #[arg(long, default_value = "5")]
        top: usize,

        /// Snippets per ranked section
        #[arg(long, default_value = "1")]
        snippets: usize,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Show font statistics and detection results for a span file
    Info {
        /// Input span file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Show version information
    Version,
}

/// Analysis flags shared by every command.
#[derive(Args, Clone, Debug, Default)]
struct AnalysisArgs {
    /// Document genre (auto-detected by default)
    #[arg(long, value_enum, default_value_t = DocTypeArg::Auto)]
    doc_type: DocTypeArg,

    /// Page selection (e.g., "1-5", "1,3,5", "all")
    #[arg(long, value_name = "PAGES")]
    pages: Option<String>,

    /// Coordinate orientation of the spans
    #[arg(long, value_enum, default_value_t = YAxisArg::TopDown)]
    y_axis: YAxisArg,

    /// Skip title detection
    #[arg(long)]
    no_title: bool,

    /// Wall-clock budget in seconds; exceeding it is fatal
    #[arg(long, value_name = "SECS", env = "DOCOUTLINE_TIME_BUDGET")]
    time_budget: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DocTypeArg {
    #[default]
    Auto,
    General,
    Research,
    Business,
    Technical,
}

impl From<DocTypeArg> for DocumentType {
    fn from(arg: DocTypeArg) -> Self {
        match arg {
            DocTypeArg::Auto => DocumentType::Auto,
            DocTypeArg::General => DocumentType::General,
            DocTypeArg::Research => DocumentType::Research,
            DocTypeArg::Business => DocumentType::Business,
            DocTypeArg::Technical => DocumentType::Technical,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum YAxisArg {
    #[default]
    TopDown,
    BottomUp,
}

impl From<YAxisArg> for YAxis {
    fn from(arg: YAxisArg) -> Self {
        match arg {
            YAxisArg::TopDown => YAxis::TopDown,
            YAxisArg::BottomUp => YAxis::BottomUp,
        }
    }
}

impl AnalysisArgs {
    fn to_options(&self, mode: AnalysisMode) -> Result<AnalysisOptions, Box<dyn std::error::Error>> {
        let mut options = AnalysisOptions::new()
            .with_mode(mode)
            .with_document_type(self.doc_type.into())
            .with_y_axis(self.y_axis.into())
            .with_title_detection(!self.no_title);

        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }

        Ok(options)
    }
}

fn format_for(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            analysis,
        }) => cmd_outline(&input, output.as_deref(), compact, &analysis),
        Some(Commands::Batch {
            input_dir,
            output_dir,
            compact,
            analysis,
        }) => cmd_batch(&input_dir, &output_dir, compact, &analysis).map(|_| ()),
        Some(Commands::Persona {
            config,
            spans_dir,
            output,
            top,
            snippets,
            compact,
            analysis,
        }) => cmd_persona(
            &config,
            spans_dir.as_deref(),
            output.as_deref(),
            top,
            snippets,
            compact,
            &analysis,
        ),
        Some(Commands::Info { input, analysis }) => cmd_info(&input, &analysis),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_outline(&input, None, false, &cli.analysis)
            } else {
                println!("{}", "docoutline - span outline extractor".cyan().bold());
                println!();
                println!("Usage: docoutline <FILE> or docoutline <COMMAND>");
                println!();
                println!("Run 'docoutline --help' for more information.");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn outline_one(path: &Path, args: &AnalysisArgs) -> Result<OutlineResult, Box<dyn std::error::Error>> {
    let options = args.to_options(AnalysisMode::Outline)?;
    let document = load_spans(path)?;
    let budget = budget_from_secs(args.time_budget);

    let outline = run_with_budget(budget, move || {
        analyze_document(&document, &options).to_outline_result()
    })?;
    Ok(outline)
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &AnalysisArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = outline_one(input, args)?;
    let format = format_for(compact);

    if let Some(output_path) = output {
        write_json(&outline, output_path, format)?;
        eprintln!("{} {}", "Saved to".green(), output_path.display());
    } else {
        println!("{}", to_json(&outline, format)?);
    }

    Ok(())
}

/// Span files directly inside `dir`, sorted by name.
fn span_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Outline every span file; returns the number of files that failed.
///
/// A failed file still gets an output with an empty title and outline.
fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    compact: bool,
    args: &AnalysisArgs,
) -> Result<usize, Box<dyn std::error::Error>> {
    let files = span_files(input_dir)?;
    if files.is_empty() {
        eprintln!(
            "{} no span files in {}",
            "Warning:".yellow().bold(),
            input_dir.display()
        );
        return Ok(0);
    }

    fs::create_dir_all(output_dir)?;
    let format = format_for(compact);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failures = 0;
    for path in &files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(stem.clone());

        let outline = match outline_one(path, args) {
            Ok(outline) => outline,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
                failures += 1;
                OutlineResult::empty()
            }
        };

        write_json(&outline, output_dir.join(format!("{}.json", stem)), format)?;
        pb.inc(1);
    }

    pb.finish_with_message("done");

    let processed = files.len() - failures;
    eprintln!(
        "{} {} of {} files to {}",
        "Outlined".green(),
        processed,
        files.len(),
        output_dir.display()
    );
    if failures > 0 {
        eprintln!("{} {} files failed", "Warning:".yellow().bold(), failures);
    }

    Ok(failures)
}

fn cmd_persona(
    config_path: &Path,
    spans_dir: Option<&Path>,
    output: Option<&Path>,
    top: usize,
    snippets: usize,
    compact: bool,
    args: &AnalysisArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = format_for(compact);
    let emit = |result: &PersonaResult| -> Result<(), Box<dyn std::error::Error>> {
        if let Some(output_path) = output {
            write_json(result, output_path, format)?;
            eprintln!("{} {}", "Saved to".green(), output_path.display());
        } else {
            println!("{}", to_json(result, format)?);
        }
        Ok(())
    };

    let config = match load_persona_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            emit(&PersonaResult::failed(Metadata::new(vec![], "", ""), e.to_string()))?;
            return Err(e.into());
        }
    };

    let spans_dir = spans_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_path.parent().unwrap_or(Path::new(".")).to_path_buf());

    match rank_collection(&config, &spans_dir, top, snippets, args) {
        Ok(result) => emit(&result),
        Err(e) => {
            let metadata = Metadata::new(config.document_names(), &config.persona, &config.job_to_be_done);
            emit(&PersonaResult::failed(metadata, e.to_string()))?;
            Err(e)
        }
    }
}

fn rank_collection(
    config: &PersonaConfig,
    spans_dir: &Path,
    top: usize,
    snippets: usize,
    args: &AnalysisArgs,
) -> Result<PersonaResult, Box<dyn std::error::Error>> {
    let options = args.to_options(AnalysisMode::Sections)?;
    let selection = SelectionOptions::new()
        .with_desired_count(top)
        .with_snippets_per_section(snippets);
    let documents = load_collection(config, spans_dir)?;
    let budget = budget_from_secs(args.time_budget);

    let config = config.clone();
    let analysis = run_with_budget(budget, move || {
        let analysis = analyze_collection(&documents, &config, &options, &selection);
        let result = analysis.to_persona_result(&config);
        (result, analysis.diagnostics)
    })?;

    let (result, diagnostics) = analysis;
    if diagnostics.has_warnings() {
        eprintln!(
            "{} {}",
            "Warning:".yellow().bold(),
            serde_json::to_string(&diagnostics)?
        );
    }
    Ok(result)
}

fn cmd_info(input: &Path, args: &AnalysisArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options(AnalysisMode::Outline)?;
    let document = load_spans(input)?;
    let budget = budget_from_secs(args.time_budget);
    let analysis = run_with_budget(budget, move || analyze_document(&document, &options))?;

    let profile = &analysis.font_profile;
    let diagnostics = &analysis.diagnostics;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Document".bold(), analysis.document);
    if !analysis.title.is_empty() {
        println!("{}: {}", "Title".bold(), analysis.title);
    }
    println!("{}: {:?}", "Language".bold(), analysis.language);
    println!("{}: {:?}", "Type".bold(), analysis.document_type);
    println!("{}: {}", "Pages".bold(), diagnostics.page_count);
    println!("{}: {}", "Spans".bold(), diagnostics.span_count);
    println!("{}: {}", "Lines".bold(), diagnostics.line_count);
    println!("{}: {}", "Headings".bold(), diagnostics.heading_count);
    println!("{}: {}", "Sections".bold(), diagnostics.section_count);

    println!();
    println!("{}", "Font Sizes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if profile.has_statistics() {
        println!("{}: {:.1}pt", "Body size".bold(), profile.body_size);
        for (size, count) in profile.histogram() {
            let marker = if (size - profile.body_size).abs() < f32::EPSILON {
                " (body)".dimmed().to_string()
            } else {
                String::new()
            };
            println!("  {:>6.1}pt  {:>5}{}", size, count, marker);
        }
    } else {
        println!("{}", "No font metadata; every line treated as body text".yellow());
    }

    if diagnostics.has_warnings() {
        println!();
        println!("{}", "Warnings".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        if diagnostics.malformed_records > 0 {
            println!("{}: {}", "Malformed records".bold(), diagnostics.malformed_records);
        }
        if diagnostics.dropped_spans > 0 {
            println!("{}: {}", "Dropped spans".bold(), diagnostics.dropped_spans);
        }
        if diagnostics.degraded_spans > 0 {
            println!("{}: {}", "Spans without font data".bold(), diagnostics.degraded_spans);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Library version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Repository: https://github.com/iyulab/docoutline");
    println!("License: MIT");
}
