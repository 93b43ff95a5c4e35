//! bookchunk CLI - structure-aware chunking tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use bookchunk::{
    load_dump, render, ChunkMode, Chunker, Classification, HeadingCriteria, HeadingMode,
    JsonFormat, Outcome, PackOptions, PageWindow, RegexSentenceSegmenter, UnicodeSentenceSegmenter,
    WhitespaceTokenCounter,
};

#[derive(Parser)]
#[command(name = "bookchunk")]
#[command(version)]
#[command(about = "Split decoded books into chapter-aware, token-bounded chunks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a decoder dump
    Chunk {
        /// Input decoder dump (JSON)
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output one JSON object per line
        #[arg(long, conflicts_with = "compact")]
        jsonl: bool,

        /// Leave page markers out of the output
        #[arg(long)]
        no_page_markers: bool,

        /// Write the run report as JSON to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        criteria: CriteriaArgs,

        #[command(flatten)]
        packing: PackingArgs,
    },

    /// Print the classification of every line
    Classify {
        /// Input decoder dump (JSON)
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Only show heading lines
        #[arg(long)]
        headings_only: bool,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct WindowArgs {
    /// Pages to skip at the start (PDF only)
    #[arg(long, default_value = "0")]
    start_skip: usize,

    /// Pages to skip at the end (PDF only)
    #[arg(long, default_value = "0")]
    end_skip: usize,

    /// Printed page number of the first processed page (PDF only)
    #[arg(long, default_value = "1")]
    page_offset: u32,
}

impl WindowArgs {
    fn window(&self) -> PageWindow {
        PageWindow::new()
            .with_start_skip(self.start_skip)
            .with_end_skip(self.end_skip)
            .with_start_page_offset(self.page_offset)
    }
}

/// Heading criteria flags. Each flag overrides the defaults or the
/// `--criteria` file.
#[derive(Args, Debug, Default)]
struct CriteriaArgs {
    /// JSON file with heading criteria
    #[arg(long = "criteria", value_name = "FILE", env = "BOOKCHUNK_CRITERIA")]
    criteria_file: Option<PathBuf>,

    /// Evaluate bold/italic requirements
    #[arg(long, value_name = "BOOL")]
    use_style: Option<bool>,

    /// Heading must be mostly bold
    #[arg(long, value_name = "BOOL")]
    require_bold: Option<bool>,

    /// Heading must be mostly italic
    #[arg(long, value_name = "BOOL")]
    require_italic: Option<bool>,

    /// Evaluate letter-case requirements
    #[arg(long, value_name = "BOOL")]
    use_case: Option<bool>,

    /// Every word must be capitalized
    #[arg(long, value_name = "BOOL")]
    require_title_case: Option<bool>,

    /// Every letter must be uppercase
    #[arg(long, value_name = "BOOL")]
    require_all_caps: Option<bool>,

    /// Evaluate layout requirements
    #[arg(long, value_name = "BOOL")]
    use_layout: Option<bool>,

    /// Heading must be centered
    #[arg(long, value_name = "BOOL")]
    require_centered: Option<bool>,

    /// Heading must be alone in its block
    #[arg(long, value_name = "BOOL")]
    require_isolated: Option<bool>,

    /// Evaluate the word-count range
    #[arg(long, value_name = "BOOL")]
    use_length: Option<bool>,

    /// Minimum heading words
    #[arg(long)]
    min_words: Option<usize>,

    /// Maximum heading words
    #[arg(long)]
    max_words: Option<usize>,

    /// Evaluate the keyword pattern
    #[arg(long, value_name = "BOOL")]
    use_keywords: Option<bool>,

    /// Case-insensitive regex marking explicit chapter headings
    #[arg(long, value_name = "REGEX")]
    keyword_pattern: Option<String>,

    /// Evaluate the font-size signal
    #[arg(long, value_name = "BOOL")]
    use_font_size: Option<bool>,

    /// Points above the body font size a heading must reach
    #[arg(long)]
    min_font_delta: Option<f64>,

    /// Treat every heading as a chapter
    #[arg(long)]
    flat: bool,
}

impl CriteriaArgs {
    fn criteria(&self) -> Result<HeadingCriteria, Box<dyn std::error::Error>> {
        let mut criteria = match self.criteria_file {
            Some(ref path) => {
                let json = fs::read_to_string(path)?;
                serde_json::from_str(&json)
                    .map_err(|e| format!("Invalid criteria file {}: {}", path.display(), e))?
            }
            None => HeadingCriteria::default(),
        };

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field.clone() {
                    criteria.$field = value;
                })*
            };
        }
        apply!(
            use_style,
            require_bold,
            require_italic,
            use_case,
            require_title_case,
            require_all_caps,
            use_layout,
            require_centered,
            require_isolated,
            use_length,
            min_words,
            max_words,
            use_keywords,
            use_font_size,
            min_font_delta,
        );
        if let Some(ref pattern) = self.keyword_pattern {
            criteria.keyword_pattern = Some(pattern.clone());
        }

        Ok(criteria)
    }

    fn heading_mode(&self) -> HeadingMode {
        if self.flat {
            HeadingMode::Flat
        } else {
            HeadingMode::Hierarchical
        }
    }
}

#[derive(Args, Debug)]
struct PackingArgs {
    /// Approximate tokens per chunk
    #[arg(short, long, default_value = "200")]
    target_tokens: usize,

    /// Sentences repeated at the start of the next chunk
    #[arg(long, default_value = "2")]
    overlap: usize,

    /// One chunk per chapter instead of token-bounded chunks
    #[arg(long)]
    by_chapter: bool,

    /// Sentence segmenter
    #[arg(long, value_enum, default_value = "unicode")]
    segmenter: SegmenterKind,

    /// Token counter
    #[arg(long, value_enum, default_value = "whitespace")]
    tokenizer: TokenizerKind,

    /// Disable parallel line detection
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON array of chunks
    Json,
    /// Human-readable listing
    Text,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SegmenterKind {
    /// Unicode sentence boundaries
    Unicode,
    /// Split after . ! ? followed by whitespace
    Regex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TokenizerKind {
    /// Whitespace-separated words
    Whitespace,
    /// cl100k_base BPE tokens (requires the tiktoken feature)
    Cl100k,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chunk {
            input,
            output,
            format,
            compact,
            jsonl,
            no_page_markers,
            report,
            window,
            criteria,
            packing,
        } => {
            let json_format = if jsonl {
                JsonFormat::Lines
            } else if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            cmd_chunk(
                &input,
                output.as_deref(),
                format,
                json_format,
                !no_page_markers,
                report.as_deref(),
                &window,
                &criteria,
                &packing,
            )
        }
        Commands::Classify {
            input,
            headings_only,
            window,
            criteria,
        } => cmd_classify(&input, headings_only, &window, &criteria),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_chunker(
    criteria: &CriteriaArgs,
    packing: &PackingArgs,
) -> Result<Chunker, Box<dyn std::error::Error>> {
    let mode = if packing.by_chapter {
        ChunkMode::Chapter
    } else {
        ChunkMode::TokenBudget
    };

    let mut chunker = Chunker::new()
        .with_criteria(criteria.criteria()?)
        .with_heading_mode(criteria.heading_mode())
        .with_pack_options(
            PackOptions::new()
                .with_target_tokens(packing.target_tokens)
                .with_overlap_units(packing.overlap)
                .with_mode(mode),
        )
        .with_parallel(!packing.sequential);

    chunker = match packing.segmenter {
        SegmenterKind::Unicode => chunker.with_segmenter(UnicodeSentenceSegmenter),
        SegmenterKind::Regex => chunker.with_segmenter(RegexSentenceSegmenter),
    };

    chunker = match packing.tokenizer {
        TokenizerKind::Whitespace => chunker.with_token_counter(WhitespaceTokenCounter),
        #[cfg(feature = "tiktoken")]
        TokenizerKind::Cl100k => chunker.with_token_counter(bookchunk::TiktokenCounter::cl100k()?),
        #[cfg(not(feature = "tiktoken"))]
        TokenizerKind::Cl100k => {
            return Err("this build has no cl100k tokenizer; rebuild with --features tiktoken".into())
        }
    };

    // Fail on bad criteria before touching the input
    chunker.validate()?;
    log::debug!("{:?}", chunker);
    Ok(chunker)
}

#[allow(clippy::too_many_arguments)]
fn cmd_chunk(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    json_format: JsonFormat,
    page_markers: bool,
    report_path: Option<&Path>,
    window: &WindowArgs,
    criteria: &CriteriaArgs,
    packing: &PackingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let chunker = build_chunker(criteria, packing)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading dump...");
    let source = load_dump(input, window.window())?;

    pb.set_message(format!("Chunking {} source...", source.kind()));
    let result = chunker.run(source.as_ref())?;
    pb.finish_and_clear();

    let rendered = match format {
        OutputFormat::Json => render::to_json(&result.chunks, json_format, page_markers)?,
        OutputFormat::Text => render::to_text(&result.chunks, page_markers),
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&result.report)?)?;
        log::info!("run report written to {}", path.display());
    }

    let report = &result.report;
    match report.outcome() {
        Outcome::Chunked => eprintln!(
            "{} {} chunks from {} units ({} chapters, {} subchapters)",
            "Done!".green().bold(),
            report.chunks_emitted,
            report.units_extracted,
            report.chapter_headings,
            report.subchapter_headings
        ),
        Outcome::NoContent => eprintln!(
            "{} no content found in {} lines",
            "Warning:".yellow().bold(),
            report.lines_read
        ),
        Outcome::NoChunks => eprintln!(
            "{} {} units extracted but no chunks produced",
            "Warning:".yellow().bold(),
            report.units_extracted
        ),
    }
    if report.extraction_failures > 0 || report.units_skipped > 0 {
        eprintln!(
            "  {} {} unreadable pages, {} skipped units, {} segmentation fallbacks",
            "└─".dimmed(),
            report.extraction_failures,
            report.units_skipped,
            report.segmentation_fallbacks
        );
    }

    Ok(())
}

fn cmd_classify(
    input: &Path,
    headings_only: bool,
    window: &WindowArgs,
    criteria: &CriteriaArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let chunker = Chunker::new()
        .with_criteria(criteria.criteria()?)
        .with_heading_mode(criteria.heading_mode());
    chunker.validate()?;

    let source = load_dump(input, window.window())?;
    let items = chunker.classify(source.as_ref())?;
    log::debug!("{} classified lines from {}", items.len(), input.display());

    for item in &items {
        if headings_only && !item.kind.is_heading() {
            continue;
        }

        let marker = format!("{:>6}", item.line.page_marker.to_string()).dimmed();
        let label = format!("{:<10}", item.kind.label());
        match item.kind {
            Classification::Chapter(ref title) => {
                println!("{} {} {}", marker, label.cyan().bold(), title.bold())
            }
            Classification::Subchapter(ref title) => {
                println!("{} {} {}", marker, label.yellow(), title)
            }
            Classification::Body(ref text) => println!("{} {} {}", marker, label, text),
            Classification::Noise => {
                println!("{} {} {}", marker, label.dimmed(), item.line.text.dimmed())
            }
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "bookchunk".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structure-aware segmentation and token-bounded chunking");
    println!();
    println!("License: MIT");
}
