use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{error, info};
use rfc2pdf::batch;
use rfc2pdf::index::RfcIndex;
use rfc2pdf::{ConversionOptions, ConvertError, DocumentMetadata, RfcPdfBuilder};

/// Converts plain-text RFCs into PDF documents.
///
/// A monospaced TrueType font is required. Pass one with `--font`, set
/// `RFC2PDF_FONT`, or put a known monospace font under `assets/fonts` or
/// `RFC2PDF_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Converts plain-text RFCs into PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single RFC text file.
    Convert {
        /// RFC text file.
        input: PathBuf,
        /// PDF file to write.
        output: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        /// Document title; defaults to the input file name.
        #[arg(long)]
        title: Option<String>,
        /// Document author.
        #[arg(long)]
        author: Option<String>,
        /// Document keywords.
        #[arg(long)]
        keywords: Option<String>,
    },

    /// Convert every `rfc*.txt` in a directory.
    #[command(name = "bulk", aliases = ["bulk-convert", "bulk_convert"])]
    Bulk {
        /// Directory holding the RFC text files.
        rfc_dir: PathBuf,
        /// Directory receiving the PDFs; created when missing.
        output_dir: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        /// RFC Editor `rfc-index.xml` providing titles, authors and keywords.
        #[arg(long, env = "RFC2PDF_INDEX")]
        index: Option<PathBuf>,
        /// Number of worker threads; defaults to one per CPU.
        #[arg(long, env = "RFC2PDF_JOBS")]
        jobs: Option<usize>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Monospaced TrueType font.
    #[arg(long, env = "RFC2PDF_FONT")]
    font: Option<PathBuf>,
    /// Left and right margin in millimetres.
    #[arg(long, env = "RFC2PDF_SIDE_MARGIN", default_value_t = 15.0)]
    side_margin: f64,
    /// Top and bottom margin in millimetres.
    #[arg(long, env = "RFC2PDF_TOP_MARGIN", default_value_t = 25.0)]
    top_margin: f64,
    /// Whether to generate PDF bookmarks from the RFC headings.
    #[arg(long, env = "RFC2PDF_BOOKMARKS", default_value_t = true, action = ArgAction::Set)]
    bookmarks: bool,
}

impl RenderArgs {
    fn options(&self) -> ConversionOptions {
        ConversionOptions::default()
            .with_margins(self.top_margin, self.side_margin)
            .with_bookmarks(self.bookmarks)
            .with_font_path(self.font.clone())
    }
}

fn run(command: Commands) -> Result<(), ConvertError> {
    match command {
        Commands::Convert {
            input,
            output,
            render,
            title,
            author,
            keywords,
        } => {
            let metadata = DocumentMetadata::new(title.unwrap_or_default())
                .with_author(author.unwrap_or_default())
                .with_keywords(keywords.unwrap_or_default());
            RfcPdfBuilder::new()
                .with_options(render.options())
                .with_metadata(metadata)
                .convert_file(&input, &output)?;
            Ok(())
        }
        Commands::Bulk {
            rfc_dir,
            output_dir,
            render,
            index,
            jobs,
        } => {
            let index = match index {
                Some(path) => {
                    info!("Loading RFC meta data from {}", path.display());
                    let index = RfcIndex::load(&path)?;
                    info!("Found {} rfc entries", index.len());
                    Some(index)
                }
                None => None,
            };

            let builder = RfcPdfBuilder::new().with_options(render.options());
            let report =
                batch::convert_directory(&rfc_dir, &output_dir, &builder, index.as_ref(), jobs)?;

            for failure in &report.failed {
                error!("{}: {}", failure.input.display(), failure.reason);
            }
            if !report.is_success() {
                std::process::exit(2);
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
