//! Spec Sheet PDF CLI tool
//!
//! Converts every HTML spec sheet in a directory to a trimmed PDF.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use specsheet_pdf::convert::{convert_directory, ConvertOptions};
use specsheet_pdf::estimate::{estimate_pages, groups_from_json};
use specsheet_pdf::layout::{Length, PageGeometry, PaperSize};
use specsheet_pdf::pdf::{count_pages, trim_file, TrimOptions};
use specsheet_pdf::render::{Renderer, RendererOptions};

/// Spec Sheet PDF - Convert HTML spec sheets to trimmed PDFs
#[derive(Parser)]
#[command(name = "specsheet-pdf")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    # Convert every *.html file in the current directory
    specsheet-pdf

    # Convert a different directory with a custom container selector
    specsheet-pdf convert sheets/ --group-selector .sheet-body

    # Keep only the first two pages of a PDF
    specsheet-pdf trim input.pdf --pages 2 -o output.pdf

    # Check a pagination plan for measured heights
    specsheet-pdf estimate heights.json")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Used when no subcommand is given
    #[command(flatten)]
    convert: ConvertArgs,

    /// Log verbosity: -v = info, -vv = debug (overrides RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every HTML file in a directory to PDF (the default)
    Convert(ConvertArgs),

    /// Keep only the leading pages of a PDF
    Trim {
        /// Input PDF file
        input: PathBuf,

        /// Last page to keep
        #[arg(short, long)]
        pages: usize,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the page count of a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// Run the page estimator over measured section heights
    Estimate {
        /// JSON file with one array of heights per group, e.g. [[120, 300], [80]]
        input: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
}

#[derive(Args, Clone)]
struct GeometryArgs {
    /// Printed page height in CSS pixels
    #[arg(long, default_value_t = 1122.0)]
    page_height: f64,

    /// Space reserved at the top of the first page, in CSS pixels
    #[arg(long, default_value_t = 250.0)]
    first_page_margin: f64,

    /// Gap kept between the last section and the page bottom, in CSS pixels
    #[arg(long, default_value_t = 130.0)]
    section_margin: f64,
}

impl GeometryArgs {
    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            page_height: Length::from_px(self.page_height),
            first_page_margin: Length::from_px(self.first_page_margin),
            section_margin: Length::from_px(self.section_margin),
            ..PageGeometry::default()
        }
    }
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Directory holding the HTML files
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// CSS selector of the containers whose sections are paginated
    #[arg(long, default_value = ".frame-19")]
    group_selector: String,

    /// CSS selector of decorative elements removed before measuring
    #[arg(long, default_value = ".divider")]
    divider_selector: String,

    /// Paper width in CSS pixels
    #[arg(long, default_value_t = 1440.0)]
    paper_width: f64,

    /// Paper height in inches
    #[arg(long, default_value_t = 11.0)]
    paper_height: f64,

    /// Chromium executable (searched for when omitted)
    #[arg(long, env = "CHROME")]
    chrome: Option<PathBuf>,

    /// Fail instead of downloading Chromium when none is installed
    #[arg(long)]
    no_download: bool,

    /// Disable the Chromium sandbox (needed when running as root)
    #[arg(long)]
    no_sandbox: bool,

    /// Seconds the browser may stay unresponsive before giving up
    #[arg(long, default_value_t = 300)]
    idle_timeout: u64,

    #[command(flatten)]
    geometry: GeometryArgs,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Convert(args)) => cmd_convert(args),
        Some(Commands::Trim { input, pages, output }) => cmd_trim(input, pages, output),
        Some(Commands::Info { input }) => cmd_info(input),
        Some(Commands::Estimate { input, geometry }) => cmd_estimate(input, geometry),
        None => cmd_convert(cli.convert),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Convert every HTML file in a directory
fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let options = ConvertOptions {
        geometry: args.geometry.geometry(),
        paper: PaperSize {
            width: Length::from_px(args.paper_width),
            height: Length::from_inches(args.paper_height),
        },
        group_selector: args.group_selector,
        divider_selector: args.divider_selector,
    };

    let renderer = Renderer::launch(&RendererOptions {
        chrome_path: args.chrome,
        allow_download: !args.no_download,
        sandbox: !args.no_sandbox,
        idle_timeout: Duration::from_secs(args.idle_timeout),
    })
    .context("Browser could not be started")?;

    let written = convert_directory(&renderer, &args.dir, &options, |path, _| {
        println!("Generated PDF: {}", path.display());
    })
    .with_context(|| format!("Failed to convert HTML files in {}", args.dir.display()))?;

    if written.is_empty() {
        eprintln!("No HTML files found in {}", args.dir.display());
    }

    Ok(())
}

/// Keep only the leading pages of a PDF
fn cmd_trim(input: PathBuf, pages: usize, output: PathBuf) -> Result<()> {
    let options = TrimOptions {
        input_path: input,
        output_path: output.clone(),
        last_page: pages,
    };

    let kept = trim_file(&options)
        .with_context(|| format!("Failed to trim {}", options.input_path.display()))?;

    eprintln!("Kept {} page(s): {}", kept, output.display());

    Ok(())
}

/// Show the page count of a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let pages = count_pages(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", pages);

    Ok(())
}

/// Print the pagination plan for measured heights
fn cmd_estimate(input: PathBuf, geometry: GeometryArgs) -> Result<()> {
    let json = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let groups = groups_from_json(&json)?;

    let plan = estimate_pages(&groups, &geometry.geometry());

    println!("Last page: {}", plan.last_page);
    for at in &plan.page_breaks {
        println!("Page break before: group {} section {}", at.group, at.section);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_converts_current_dir() {
        let cli = Cli::try_parse_from(["specsheet-pdf"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.convert.dir, PathBuf::from("."));
        assert_eq!(cli.convert.group_selector, ".frame-19");
    }

    #[test]
    fn test_trim_arguments() {
        let cli = Cli::try_parse_from(["specsheet-pdf", "trim", "in.pdf", "-p", "2", "-o", "out.pdf"])
            .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Trim { pages: 2, .. })
        ));
    }

    #[test]
    fn test_trim_has_no_open_flag() {
        let result = Cli::try_parse_from([
            "specsheet-pdf", "trim", "in.pdf", "-p", "2", "-o", "out.pdf", "--open",
        ]);

        assert!(result.is_err());
    }
}
