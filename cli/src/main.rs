//! docx-resolve CLI - render Word documents with resolved styles and numbering
//!
//! A command-line tool for turning DOCX files into HTML, plain text, or JSON
//! with every style, default and list marker already applied.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use docx_resolve::render::{JsonFormat, RenderOptions};
use docx_resolve::{CounterScope, Diagnostic, ResolveOptions, ResolvedDocument};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Word documents with resolved styles and list numbering
#[derive(Parser)]
#[command(
    name = "docx-resolve",
    author = "iyulab",
    version,
    about = "Render Word documents with resolved styles and numbering",
    long_about = "docx-resolve - Style cascade and list numbering resolution for DOCX files.\n\n\
                  Converts DOCX files to HTML, plain text, or JSON with effective formatting."
)]
struct Cli {
    /// Log resolution details (style and numbering problems are always logged)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How list counters behave inside table cells
    #[arg(long, global = true, default_value = "document")]
    counter_scope: ScopeMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to HTML
    Html {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a complete HTML page instead of a fragment
        #[arg(long)]
        full: bool,

        /// Omit inline CSS
        #[arg(long)]
        no_styles: bool,
    },

    /// Convert a document to plain text
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Normalize text to Unicode NFC
        #[arg(long)]
        normalize: bool,

        /// Do not indent nested list items
        #[arg(long)]
        flat: bool,
    },

    /// Convert a document to JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show document statistics and diagnostics
    Info {
        /// Input file path
        input: PathBuf,
    },
}

/// Counter scope
#[derive(Clone, ValueEnum)]
enum ScopeMode {
    /// Counters run through the whole document
    Document,
    /// Each table cell restores the counters it started with
    Cell,
}

impl From<ScopeMode> for CounterScope {
    fn from(mode: ScopeMode) -> Self {
        match mode {
            ScopeMode::Document => CounterScope::Document,
            ScopeMode::Cell => CounterScope::TableCell,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let resolve_options = ResolveOptions::default().with_counter_scope(cli.counter_scope.into());

    match cli.command {
        Commands::Html {
            input,
            output,
            full,
            no_styles,
        } => {
            let doc = resolve(&input, &resolve_options)?;
            let options = RenderOptions::new()
                .with_full_document(full)
                .with_inline_styles(!no_styles);
            let html = docx_resolve::render::to_html(&doc, &options)?;
            write_output(output.as_deref(), &html, "HTML")?;
        }

        Commands::Text {
            input,
            output,
            normalize,
            flat,
        } => {
            let doc = resolve(&input, &resolve_options)?;
            let options = RenderOptions::new()
                .with_normalize_unicode(normalize)
                .with_indent_lists(!flat);
            let text = docx_resolve::render::to_text(&doc, &options)?;
            write_output(output.as_deref(), &text, "text")?;
        }

        Commands::Json {
            input,
            output,
            compact,
        } => {
            let doc = resolve(&input, &resolve_options)?;
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = docx_resolve::render::to_json(&doc, format)?;
            write_output(output.as_deref(), &json, "JSON")?;
        }

        Commands::Info { input } => {
            let doc = resolve(&input, &resolve_options)?;
            print_info(&input, &doc);
        }
    }

    Ok(())
}

fn resolve(
    input: &Path,
    options: &ResolveOptions,
) -> Result<ResolvedDocument, Box<dyn std::error::Error>> {
    let pb = create_spinner("Resolving document...");
    let doc = docx_resolve::parse_file_with(input, options);
    pb.finish_and_clear();
    Ok(doc?)
}

fn print_info(input: &Path, doc: &ResolvedDocument) {
    let paragraphs = doc.paragraphs();
    let list_items = paragraphs.iter().filter(|p| p.is_list_item()).count();
    let headings = paragraphs.iter().filter(|p| p.is_heading()).count();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Paragraphs".bold(), paragraphs.len());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "List items".bold(), list_items);
    println!("{}: {}", "Headings".bold(), headings);

    let text = doc.plain_text();
    println!("\n{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    println!("\n{}", "Diagnostics".cyan().bold());
    println!("{}", "─".repeat(40));
    if doc.diagnostics.is_empty() {
        println!("{} none", "✓".green().bold());
    }
    for diagnostic in &doc.diagnostics {
        println!("{} {}", diagnostic_tag(diagnostic).yellow().bold(), diagnostic);
    }
}

fn diagnostic_tag(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic {
        Diagnostic::MissingStyle { .. } => "[style]",
        Diagnostic::MissingBasedOn { .. } => "[basedOn]",
        Diagnostic::StyleCycle { .. } => "[cycle]",
        Diagnostic::MissingNumbering { .. } => "[numbering]",
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(
    path: Option<&Path>,
    content: &str,
    kind: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            println!(
                "{} Converted to {}: {}",
                "✓".green().bold(),
                kind,
                p.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
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
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docx-resolve",
            "text",
            "in.docx",
            "--counter-scope",
            "cell",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            CounterScope::from(cli.counter_scope),
            CounterScope::TableCell
        ));
    }
}
