//! reveal-pdf CLI - PDF slides to reveal.js decks

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reveal_pdf::render::HtmlTemplates;
use reveal_pdf::{
    BoundaryPolicy, DeckBuilder, DeckOptions, DeckWriter, DocumentSource, FlattenRule,
    OutlineEntry, OutlineSectionPartitioner, PageSelection, ProgressEvent,
};

#[derive(Parser)]
#[command(name = "reveal-pdf")]
#[command(version)]
#[command(about = "Turn PDF slides into a reveal.js presentation", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "PDF")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Clear the output directory if it is not empty
    #[arg(short, long)]
    force: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a deck (same as the top-level form, with more options)
    Convert {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Clear the output directory if it is not empty
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Show document information, outline and sections
    Info {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Outline flattening rule
        #[arg(long, value_enum, default_value = "top-level")]
        outline: OutlineMode,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Default)]
struct DeckArgs {
    /// Page range to render (e.g., "1-10", "1,3,5"); other pages stay referenced
    #[arg(long)]
    pages: Option<String>,

    /// Outline flattening rule
    #[arg(long, value_enum, default_value = "top-level")]
    outline: OutlineMode,

    /// Fail on outline entries pointing before the previous one
    #[arg(long)]
    strict_outline: bool,

    /// Extra render attempts per page
    #[arg(long, default_value = "0")]
    retries: u32,

    /// Render pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Directory with custom index.html / page.html templates
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Do not write deck.json
    #[arg(long)]
    no_manifest: bool,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
enum OutlineMode {
    /// Only top-level outline entries start sections
    #[default]
    TopLevel,
    /// Every outline entry, parents before children
    Preorder,
}

impl From<OutlineMode> for FlattenRule {
    fn from(mode: OutlineMode) -> Self {
        match mode {
            OutlineMode::TopLevel => FlattenRule::TopLevel,
            OutlineMode::Preorder => FlattenRule::Preorder,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            force,
            deck,
        }) => cmd_convert(&input, &output, force, &deck),
        Some(Commands::Info {
            input,
            outline,
            json,
        }) => cmd_info(&input, outline, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => {
                cmd_convert(&input, &output, cli.force, &DeckArgs::default())
            }
            _ => {
                println!("{}", "Usage: reveal-pdf <PDF> -o <DIR> [-f]".yellow());
                println!("       reveal-pdf --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn deck_options(
    input: &Path,
    args: &DeckArgs,
) -> Result<DeckOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = args.pages.as_deref() {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let mut options = DeckOptions::new()
        .with_parallel(!args.sequential)
        .with_render_retries(args.retries)
        .with_flatten_rule(args.outline.into())
        .with_pages(page_selection);

    if args.strict_outline {
        options = options.with_boundary_policy(BoundaryPolicy::Reject);
    }
    if let Some(stem) = input.file_stem() {
        options = options.with_fallback_title(stem.to_string_lossy());
    }
    Ok(options)
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    force: bool,
    args: &DeckArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = deck_options(input, args)?;

    let mut writer = DeckWriter::new()
        .with_force(force)
        .with_manifest(!args.no_manifest);
    if let Some(dir) = &args.templates {
        writer = writer.with_templates(HtmlTemplates::from_dir(dir)?);
    }

    // Refuse a non-empty directory before doing any work.
    writer.prepare(output)?;

    let source = reveal_pdf::open_file(input)?;

    let pb = ProgressBar::new(u64::from(source.page_count()));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Rendering pages...");

    let (tx, rx) = crossbeam_channel::unbounded();
    let builder = DeckBuilder::new(options).with_progress(tx);
    let source_ref = &source;

    let deck = std::thread::scope(|scope| {
        let handle = scope.spawn(move || builder.build(source_ref));
        for event in rx.iter() {
            match event {
                ProgressEvent::Page { .. } => pb.inc(1),
                ProgressEvent::Finished => break,
                ProgressEvent::Started { .. } => {}
            }
        }
        handle.join()
    })
    .map_err(|_| "deck builder panicked")??;

    log::debug!("Writing {} pages to {}", deck.page_count(), output.display());
    pb.set_message("Writing files...");
    let report = writer.write_into(&deck, output)?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} index.html", "├─".dimmed());
    println!("  {} plugin/pdf-slides.js", "├─".dimmed());
    if !args.no_manifest {
        println!("  {} deck.json", "├─".dimmed());
    }
    println!(
        "  {} pages/ ({} of {} pages)",
        "└─".dimmed(),
        deck.report.rendered_count(),
        deck.page_count()
    );

    let failures = deck.report.failures();
    if !failures.is_empty() {
        println!("\n{}", "Failed pages:".red().bold());
        for (page, reason) in &failures {
            println!("  {} {}: {}", "FAILED".red(), page, reason);
        }
    }
    for (path, err) in report.failures() {
        println!("  {} {}: {}", "UNWRITTEN".red(), path.display(), err);
    }

    if !report.is_ok() {
        return Err(format!("{} file(s) could not be written", report.failures().len()).into());
    }
    Ok(())
}

fn cmd_info(
    input: &Path,
    outline_mode: OutlineMode,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = reveal_pdf::open_file(input)?;
    let metadata = source.metadata();

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }

    if let Ok(viewport) = source.viewport() {
        println!(
            "{}: {} x {} px",
            "Viewport".bold(),
            viewport.pixel_width(),
            viewport.pixel_height()
        );
    }

    let outline = source.outline()?;
    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if outline.is_empty() {
        println!("{}", "(none)".dimmed());
    }
    for entry in &outline.entries {
        print_entry(&source, entry, 0);
    }

    let options = DeckOptions::new().with_flatten_rule(outline_mode.into());
    let sections = OutlineSectionPartitioner::new(options.partition_options()).partition(&source)?;

    println!();
    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, section) in sections.iter().enumerate() {
        if section.is_empty() {
            println!("{:>3}. {}", i + 1, "(empty)".dimmed());
        } else {
            println!(
                "{:>3}. pages {}-{} ({})",
                i + 1,
                section.start,
                section.end - 1,
                section.len()
            );
        }
    }

    Ok(())
}

fn print_entry<S: DocumentSource>(source: &S, entry: &OutlineEntry, depth: usize) {
    let page = source
        .page_index(&entry.destination)
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|_| "?".to_string());
    println!(
        "{}{} {}",
        "  ".repeat(depth),
        entry.title,
        format!("(p. {})", page).dimmed()
    );
    for child in &entry.children {
        print_entry(source, child, depth + 1);
    }
}

fn cmd_version() {
    println!("{} {}", "reveal-pdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF slides to reveal.js decks");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_options_from_args() {
        let args = DeckArgs {
            pages: Some("2-4".to_string()),
            outline: OutlineMode::Preorder,
            strict_outline: true,
            retries: 2,
            sequential: true,
            ..DeckArgs::default()
        };
        let options = deck_options(Path::new("/tmp/talk.pdf"), &args).unwrap();

        assert!(!options.parallel);
        assert_eq!(options.render_retries, 2);
        assert_eq!(options.flatten_rule, FlattenRule::Preorder);
        assert_eq!(options.boundary_policy, BoundaryPolicy::Reject);
        assert_eq!(options.page_selection, PageSelection::Range(2..=4));
        assert_eq!(options.fallback_title, "talk");
    }

    #[test]
    fn test_invalid_page_range() {
        let args = DeckArgs {
            pages: Some("5-1".to_string()),
            ..DeckArgs::default()
        };
        assert!(deck_options(Path::new("talk.pdf"), &args).is_err());
    }

    #[test]
    fn test_convert_refuses_non_empty_output() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("keep.txt"), "x").unwrap();

        let err = cmd_convert(
            Path::new("/nonexistent/talk.pdf"),
            tmp.path(),
            false,
            &DeckArgs::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("is not empty"));
        assert!(tmp.path().join("keep.txt").exists());
    }
}
