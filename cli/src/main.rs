//! pdf-sections CLI - outline-driven PDF section extraction

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_sections::parser::{
    PageRuns, DEFAULT_IGNORE_MINIMUM_FONT_SIZE, DEFAULT_OUTLINE_FONT_SIZE,
};
use pdf_sections::sections::{collect_page, collect_pages, hierarchical_title};
use pdf_sections::{
    CharExtractor, ExtractOptions, JsonFormat, LopdfBackend, PageText, PdfBackend,
    SectionExtractor,
};

#[derive(Parser)]
#[command(name = "pdf-sections")]
#[command(version)]
#[command(
    about = "Extract titled text sections from a PDF using its outline",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print JSON to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Minimum font size of a heading occurrence
    #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_OUTLINE_FONT_SIZE)]
    outline_font_size: u32,

    /// Text below this font size is dropped before matching
    #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_IGNORE_MINIMUM_FONT_SIZE)]
    ignore_minimum_font_size: u32,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Skip pages whose text cannot be read instead of failing
    #[arg(long)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the flattened outline with levels, pages and titles
    #[command(alias = "toc")]
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show the merged, size-tagged text blocks
    Blocks {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only this page (1-indexed)
        #[arg(long, value_name = "N")]
        page: Option<u32>,

        /// Text below this font size is dropped
        #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_IGNORE_MINIMUM_FONT_SIZE)]
        ignore_minimum_font_size: u32,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline { ref input }) => cmd_outline(input),
        Some(Commands::Blocks {
            ref input,
            page,
            ignore_minimum_font_size,
        }) => cmd_blocks(input, page, ignore_minimum_font_size),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match cli.input {
            Some(ref input) => cmd_extract(input, &cli),
            None => {
                println!("{}", "Usage: pdf-sections <FILE> [-o OUTPUT]".yellow());
                println!("       pdf-sections --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = if cli.pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    };

    let mut options = ExtractOptions::new()
        .with_outline_font_size(cli.outline_font_size)
        .with_ignore_minimum_font_size(cli.ignore_minimum_font_size)
        .with_json_format(format);
    if cli.lenient {
        options = options.lenient();
    }
    if let Some(ref path) = cli.output {
        options = options.with_output_path(path);
    }

    let extractor = SectionExtractor::with_options(input, options);
    log::debug!("{:?}", extractor.options());

    if cli.stdout {
        let sections = extractor.extract()?;
        println!("{}", pdf_sections::render::to_json(&sections, format)?);
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Extracting sections from {}...", input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let sections = extractor.call();
    pb.finish_and_clear();
    let sections = sections?;

    println!(
        "{} {} sections to {}",
        "Saved".green(),
        sections.len(),
        extractor.options().output_path.display()
    );

    Ok(())
}

fn cmd_outline(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::load_file(input)?;
    let outline = backend.outline()?;

    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if outline.is_empty() {
        println!("{}", "(no outline)".dimmed());
        return Ok(());
    }

    for (index, entry) in outline.iter().enumerate() {
        let page = entry
            .page_number
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        println!(
            "{}{} {} {}",
            "  ".repeat(entry.level.saturating_sub(1) as usize),
            format!("[{}]", entry.level).dimmed(),
            entry.title.bold(),
            format!("p.{}", page).dimmed()
        );
        println!(
            "{}    {}",
            "  ".repeat(entry.level.saturating_sub(1) as usize),
            hierarchical_title(&outline, index, &entry.title).dimmed()
        );
    }

    println!();
    println!("{}: {}", "Entries".bold(), outline.len());
    println!("{}: {}", "Pairs".bold(), outline.len().saturating_sub(1));

    Ok(())
}

fn cmd_blocks(
    input: &Path,
    page: Option<u32>,
    min_font_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::load_file(input)?;
    let extractor = CharExtractor::new(&backend);

    // Whole-document listing skips unreadable pages.
    let pages: Vec<PageText> = match page {
        Some(number) => {
            let runs = PageRuns {
                number,
                runs: extractor.extract_page(number)?,
            };
            vec![collect_page(runs, min_font_size)]
        }
        None => collect_pages(
            extractor.extract_all(pdf_sections::ErrorMode::Lenient)?,
            min_font_size,
        ),
    };

    for page in &pages {
        println!("{}", format!("Page {}", page.number).cyan().bold());
        if page.is_empty() {
            println!("  {}", "(no text)".dimmed());
        }
        for block in &page.blocks {
            println!(
                "  {} {}",
                format!("{:>3}", block.font_size).yellow(),
                block.text
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-sections".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Outline-driven PDF section extraction");
    println!();
    println!("License: MIT");
}
