//! Panink: The universal handwriting converter.
//!
//! Panink converts between digitized handwriting-capture formats, similar
//! to how Pandoc converts between document formats. Every reader decodes
//! into an intermediate representation of a handwritten page — canonical
//! millimeters, device-epoch millisecond timestamps — which is analyzed
//! for capture defects, optionally normalized, and rendered by any
//! writer.
//!
//! # Modules
//!
//! - [`ir`]: Intermediate representation types (Page, Stroke, Dot) and the
//!   per-format readers/writers
//! - [`format`]: Format detection and decoder dispatch
//! - [`geometry`]: Post-decode capture-quality analysis
//! - [`normalize`]: Optional centering, time-rebasing and rounding
//! - [`error`]: Error types for panink operations

pub mod error;
pub mod format;
pub mod geometry;
pub mod ir;
pub mod normalize;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

pub use error::PaninkError;
use format::Format;
use ir::Page;
use normalize::NormalizeOptions;

/// The panink CLI application.
#[derive(Parser)]
#[command(name = "panink")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a capture file (or a directory of them) to another format.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input file or directory.
    input: PathBuf,

    /// Output directory.
    #[arg(short, long)]
    output: PathBuf,

    /// Input format ('neonotes', 'neonotes-archive', 'inkml',
    /// 'protocol-xml' or 'page-json'); auto-detected when omitted.
    #[arg(long)]
    from: Option<String>,

    /// Output format ('csv', 'svg' or 'json').
    #[arg(long, default_value = "csv")]
    to: String,

    /// Center the ink inside each page's content rectangle.
    #[arg(long)]
    center: bool,

    /// Shift timestamps so each page's first dot is at 0.
    #[arg(long)]
    rebase_time: bool,

    /// Round coordinates and page dimensions to this many decimals.
    #[arg(long)]
    precision: Option<u32>,
}

/// Output encoders selectable on the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Svg,
    Json,
}

impl OutputFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "csv" => Some(OutputFormat::Csv),
            "svg" => Some(OutputFormat::Svg),
            "json" | "page-json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }

    fn write(&self, path: &Path, page: &Page) -> Result<(), PaninkError> {
        match self {
            OutputFormat::Csv => ir::io_csv::write_csv(path, page),
            OutputFormat::Svg => ir::io_svg::write_svg(path, page),
            OutputFormat::Json => ir::io_page_json::write_page_json(path, page),
        }
    }
}

/// Run the panink CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PaninkError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("panink {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("The universal handwriting converter.");
            println!();
            println!("Run 'panink --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), PaninkError> {
    // Invocation problems are fatal and surface before any decoding.
    if !args.input.exists() {
        return Err(PaninkError::Usage(format!(
            "File or directory '{}' does not exist.",
            args.input.display()
        )));
    }
    if !args.output.exists() {
        return Err(PaninkError::Usage(format!(
            "File or directory '{}' does not exist.",
            args.output.display()
        )));
    }
    if !args.output.is_dir() {
        return Err(PaninkError::Usage(format!(
            "Output ('{}') must be a directory.",
            args.output.display()
        )));
    }

    let from = args
        .from
        .as_deref()
        .map(|name| {
            Format::from_name(name).ok_or_else(|| {
                PaninkError::UnsupportedFormat(format!(
                    "'{name}' (supported: neonotes, neonotes-archive, inkml, protocol-xml, page-json)"
                ))
            })
        })
        .transpose()?;

    let to = OutputFormat::from_name(&args.to).ok_or_else(|| {
        PaninkError::UnsupportedFormat(format!("'{}' (supported: csv, svg, json)", args.to))
    })?;

    let options = NormalizeOptions {
        center: args.center,
        rebase_time: args.rebase_time,
        precision: args.precision,
    };

    if args.input.is_dir() {
        convert_directory(&args.input, &args.output, from, to, &options)
    } else {
        let root = args.input.parent().unwrap_or(Path::new("")).to_path_buf();
        convert_file(&root, &args.output, &args.input, from, to, &options)?;
        println!("Processed '{}' successfully", args.input.display());
        Ok(())
    }
}

/// Converts every regular file under `input_dir`, mirroring the relative
/// tree below `output_dir`. One file's failure is reported and does not
/// stop the batch.
fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    from: Option<Format>,
    to: OutputFormat,
    options: &NormalizeOptions,
) -> Result<(), PaninkError> {
    for entry in WalkDir::new(input_dir) {
        let entry = entry.map_err(|source| {
            PaninkError::Usage(format!(
                "failed while traversing '{}': {source}",
                input_dir.display()
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        match convert_file(input_dir, output_dir, entry.path(), from, to, options) {
            Ok(()) => println!("Processed '{}' successfully", entry.path().display()),
            Err(error) => {
                eprintln!("Error processing '{}': {error}", entry.path().display());
            }
        }
    }

    Ok(())
}

/// Decodes one input file, normalizes its pages and writes one output
/// file per page.
fn convert_file(
    input_root: &Path,
    output_dir: &Path,
    file: &Path,
    from: Option<Format>,
    to: OutputFormat,
    options: &NormalizeOptions,
) -> Result<(), PaninkError> {
    let bytes = fs::read(file).map_err(PaninkError::Io)?;
    let mut pages = format::decode_pages(&bytes, Some(file), from)?;

    for page in &mut pages {
        normalize::normalize_page(page, options);
    }

    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let stem = relative
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("page");
    let parent = output_dir.join(relative.parent().unwrap_or(Path::new("")));
    fs::create_dir_all(&parent).map_err(PaninkError::Io)?;

    let multi_page = pages.len() > 1;
    for (index, page) in pages.iter().enumerate() {
        let file_name = if multi_page {
            format!("{stem}-{}.{}", index + 1, to.extension())
        } else {
            format!("{stem}.{}", to.extension())
        };
        to.write(&parent.join(file_name), page)?;
    }

    Ok(())
}
