//! Command line interface for the application.
//!
//! Provides an entry point for the application and handles the CLI arguments.
mod image_io;
mod logging;
mod payload;

use std::path::Path;

use clap::Parser;
use const_format::formatcp;
use thiserror::Error;
use tracing::info;

use self::image_io::{base_name, load_bitmap, output_dir};
pub use self::payload::{Recovered, recover_payloads};
use crate::bitmap::BitmapError;
use crate::signature::SignatureTable;
use crate::stego::{GroupBoundary, SCHEME_COUNT, SCHEMES, Scheme};

/// Errors that can be emitted while handling the CLI
#[derive(Debug, Error)]
pub enum AppError
{
    /// The input bitmap could not be loaded
    #[error(transparent)]
    Bitmap(#[from] BitmapError),

    /// The input path cannot be read as a file
    #[error("failed to read {}: {source}", path.display())]
    Read
    {
        /// Path that was being read
        path: Box<Path>,
        /// Source I/O error
        #[source]
        source: std::io::Error,
    },

    /// A recovered payload could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write
    {
        /// Path that was being written
        path: Box<Path>,
        /// Source I/O error
        #[source]
        source: std::io::Error,
    },
}

/// The main CLI parser
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Brute-force RGB LSB payloads out of BMP images",
    after_help = formatcp!(
        "Tries {} channel schemes: rgb rbg grb gbr brg bgr rb rg gr gb br bg \
         r g b. Recovered payloads are kept only when they start with a \
         JPEG, BMP, DOCX, PDF or MP3 signature.",
        SCHEME_COUNT
    )
)]
struct Cli
{
    /// BMP image (8, 16 or 24 bits per pixel) to analyse.
    input: Box<Path>,
    /// Directory for recovered payloads. Defaults to the input's directory.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    output_dir: Option<Box<Path>>,
    /// Only try the given scheme, e.g. `rgb` or `gr`. Repeatable.
    #[arg(
        short = 's',
        long = "scheme",
        value_name = "LABEL",
        value_parser = Scheme::from_label
    )]
    schemes: Vec<Scheme>,
    /// Start a fresh bit group at every row instead of packing across rows.
    #[arg(long = "row-aligned")]
    row_aligned: bool,
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli
{
    fn boundary(&self) -> GroupBoundary
    {
        if self.row_aligned
        {
            GroupBoundary::RowAligned
        }
        else
        {
            GroupBoundary::Continuous
        }
    }

    /// Requested schemes, or the whole catalogue when none were named.
    fn schemes(&self) -> &[Scheme]
    {
        if self.schemes.is_empty()
        {
            &SCHEMES
        }
        else
        {
            &self.schemes
        }
    }
}

/// Parses CLI arguments and runs the analysis.
///
/// # Errors
///
/// Returns [`AppError`] when reading the bitmap, decoding it, or writing a
/// recovered payload fails.
pub fn run() -> Result<(), AppError>
{
    let cli = Cli::parse();
    logging::init(cli.verbose);
    handle_scan(&cli)?;

    Ok(())
}

/// Loads the bitmap, runs every requested scheme and keeps recognised
/// payloads.
///
/// # Errors
///
/// Returns [`AppError`] when reading or decoding the bitmap, or writing a
/// recovered payload fails. Nothing is extracted from a bitmap that failed
/// to load.
fn handle_scan(cli: &Cli) -> Result<Vec<Recovered>, AppError>
{
    let bitmap = load_bitmap(&cli.input)?;
    info!(
        input = %cli.input.display(),
        width = bitmap.width(),
        height = bitmap.height(),
        bytes_per_pixel = bitmap.bytes_per_pixel(),
        "loaded bitmap"
    );

    let out_dir = match cli.output_dir.as_deref()
    {
        Some(dir) => dir.to_path_buf(),
        None => output_dir(&cli.input),
    };
    let base = base_name(&cli.input);
    let table = SignatureTable::default();

    let recovered = recover_payloads(
        bitmap.pixels(),
        cli.schemes(),
        cli.boundary(),
        &table,
        &out_dir,
        &base,
    )?;

    for payload in &recovered
    {
        println!(
            "{}: {} -> {}",
            payload.label,
            payload.signature.name(),
            payload.path.display()
        );
    }
    println!(
        "Recovered {} payload(s) from {} scheme(s)",
        recovered.len(),
        cli.schemes().len()
    );

    Ok(recovered)
}
