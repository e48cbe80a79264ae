//! pdf-indexer CLI - back-of-book index generator for PDF files

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_indexer::{
    build_index, parse_terms, to_json, to_text, IndexOptions, IndexOutcome, JsonFormat,
    PageBlock, PageSelection, PageSource, PdfParser, DEFAULT_HEADER_THRESHOLD,
};

/// Exit status when the terms were valid but none was found.
const EXIT_NO_MATCHES: i32 = 2;

#[derive(Parser)]
#[command(name = "pdf-indexer")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Generate a back-of-book index from a PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index of the pages on which each term occurs
    Index {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// File with one term specification per line
        #[arg(short = 't', long = "terms", value_name = "FILE", conflicts_with = "term")]
        terms_file: Option<PathBuf>,

        /// Term specification, e.g. "Fire = fire, flame" (repeatable)
        #[arg(long, value_name = "SPEC")]
        term: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Blocks ending above this y coordinate are treated as running heads
        #[arg(long, value_name = "N", env = "PDF_INDEXER_HEADER_THRESHOLD", default_value_t = DEFAULT_HEADER_THRESHOLD)]
        header_threshold: f32,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Skip pages whose text cannot be extracted instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show the positioned text blocks of each page
    Blocks {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Blocks ending above this y coordinate are treated as running heads
        #[arg(long, value_name = "N", env = "PDF_INDEXER_HEADER_THRESHOLD", default_value_t = DEFAULT_HEADER_THRESHOLD)]
        header_threshold: f32,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One "<label> - <ranges>" line per entry
    Text,
    /// Entries with labels, pages and ranges
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index {
            input,
            terms_file,
            term,
            output,
            format,
            compact,
            header_threshold,
            pages,
            lenient,
        } => read_terms(terms_file.as_deref(), &term).and_then(|raw| {
            let mut options = IndexOptions::new()
                .with_header_threshold(header_threshold)
                .with_pages(page_selection(pages.as_deref())?);
            if lenient {
                options = options.lenient();
            }
            cmd_index(&input, &raw, options, output.as_deref(), format, compact)
        }),
        Commands::Blocks {
            input,
            pages,
            header_threshold,
        } => cmd_blocks(&input, pages.as_deref(), header_threshold),
        Commands::Version => {
            cmd_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("{}", "None of the terms were found in the PDF.".yellow());
            std::process::exit(EXIT_NO_MATCHES);
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn read_terms(
    terms_file: Option<&Path>,
    terms: &[String],
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = terms_file {
        return Ok(fs::read_to_string(path)?);
    }
    if !terms.is_empty() {
        return Ok(terms.join("\n"));
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    Ok(raw)
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

/// Page source that advances a progress bar as pages are read.
struct ProgressSource<'a> {
    parser: &'a PdfParser,
    bar: &'a ProgressBar,
}

impl PageSource for ProgressSource<'_> {
    fn page_count(&self) -> usize {
        self.parser.page_count()
    }

    fn page_blocks(&self, index: usize) -> pdf_indexer::Result<Vec<PageBlock>> {
        self.bar.set_message(format!("Reading page {}", index + 1));
        let blocks = self.parser.page_blocks(index);
        self.bar.inc(1);
        blocks
    }
}

/// Returns `Ok(false)` when no term was found.
fn cmd_index(
    input: &Path,
    raw_terms: &str,
    options: IndexOptions,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let terms = parse_terms(raw_terms);
    if terms.is_empty() {
        return Err(pdf_indexer::Error::MissingInput(
            "no term specifications supplied".to_string(),
        )
        .into());
    }

    let parser = PdfParser::open_with_options(input, options)?;

    let selected = (1..=parser.page_count() as u32)
        .filter(|page| parser.options().pages.includes(*page))
        .count();
    log::info!(
        "indexing {} labels across {} of {} pages",
        terms.len(),
        selected,
        parser.page_count()
    );
    let pb = ProgressBar::new(selected as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let source = ProgressSource {
        parser: &parser,
        bar: &pb,
    };
    let outcome = build_index(&source, &terms, parser.options())?;
    pb.finish_and_clear();

    let index = match outcome {
        IndexOutcome::Found(index) => index,
        IndexOutcome::NoMatches => return Ok(false),
    };

    let rendered = match format {
        OutputFormat::Text => to_text(&index),
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            to_json(&index, json_format)?
        }
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} entries)",
            "Saved to".green(),
            path.display(),
            index.len()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(true)
}

fn cmd_blocks(
    input: &Path,
    pages: Option<&str>,
    header_threshold: f32,
) -> Result<bool, Box<dyn std::error::Error>> {
    let selection = page_selection(pages)?;
    let parser = PdfParser::open(input)?;

    println!(
        "{}: PDF {}, {} pages",
        input.display().to_string().bold(),
        parser.version(),
        parser.page_count()
    );

    for index in 0..parser.page_count() {
        let page = index as u32 + 1;
        if !selection.includes(page) {
            continue;
        }

        println!();
        println!("{}", format!("Page {}", page).cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        for block in parser.page_blocks(index)? {
            let b = &block.bbox;
            let position = format!("[{:7.1} {:7.1} {:7.1} {:7.1}]", b.x0, b.y0, b.x1, b.y1);
            if block.is_header(header_threshold) {
                println!("{} {} {}", position.dimmed(), "header".yellow(), block.text);
            } else {
                println!("{} {} {}", position.dimmed(), "body  ".green(), block.text);
            }
        }
    }

    Ok(true)
}

fn cmd_version() {
    println!("{} {}", "pdf-indexer".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Back-of-book index generator for PDF files");
    println!();
    println!("License: MIT");
}
