//! CLI payload orchestration.
//!
//! Runs the requested schemes over a decoded image, classifies every
//! candidate against the signature table, and keeps the ones that match:
//! * recognised candidates are written as `<base>-<label><extension>`
//! * unrecognised candidates are dropped without touching the filesystem
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info};

use super::AppError;
use super::image_io::{payload_path, write_payload};
use crate::signature::{Signature, SignatureTable};
use crate::stego::{GroupBoundary, Scheme, enumerate};

/// A candidate that matched a known signature and was written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovered
{
    /// Label of the scheme that produced the payload
    pub label: String,
    /// Signature the payload starts with
    pub signature: Signature,
    /// Where the payload was written
    pub path: PathBuf,
}

/// Extracts a candidate per scheme and writes the recognised ones into
/// `out_dir`.
///
/// # Arguments
///
/// * `image` - The decoded pixel grid.
/// * `schemes` - Schemes to try, in order.
/// * `boundary` - Bit group boundary policy.
/// * `table` - Signatures that make a candidate worth keeping.
/// * `out_dir` - Directory recovered payloads are written to.
/// * `base` - File name prefix, usually the input's stem.
///
/// # Returns
///
/// The recovered payloads in scheme order.
///
/// # Errors
///
/// Returns [`AppError::Write`] when a recognised payload cannot be written.
pub fn recover_payloads(
    image: &RgbImage,
    schemes: &[Scheme],
    boundary: GroupBoundary,
    table: &SignatureTable,
    out_dir: &Path,
    base: &str,
) -> Result<Vec<Recovered>, AppError>
{
    let mut recovered = Vec::new();

    for candidate in enumerate(image, schemes, boundary)
    {
        let label = candidate.label();
        let Some(signature) = table.detect(&candidate.bytes)
        else
        {
            debug!(scheme = %label, "no known signature, discarding");
            continue;
        };

        let path = payload_path(out_dir, base, &label, signature);
        write_payload(&path, &candidate.bytes)?;
        info!(
            scheme = %label,
            kind = signature.name(),
            len = candidate.bytes.len(),
            path = %path.display(),
            "recovered payload"
        );

        recovered.push(Recovered {
            label,
            signature: *signature,
            path,
        });
    }

    Ok(recovered)
}
