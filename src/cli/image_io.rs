//! CLI file helpers.
//!
//! Loads the input bitmap, derives output names from the input path, and
//! writes recovered payloads to disk.
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use super::AppError;
use crate::bitmap::Bitmap;
use crate::signature::Signature;

/// Stem used when the input path has none.
const FALLBACK_BASE: &str = "recovered";

/// Returns the input file name without its extension.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
///
/// assert_eq!(base_name(Path::new("dir/cover.bmp")), "cover");
/// ```
pub(super) fn base_name(path: impl AsRef<Path>) -> String
{
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE.into())
}

/// Directory holding the input, `.` for bare file names.
pub(super) fn output_dir(input: impl AsRef<Path>) -> PathBuf
{
    match input.as_ref().parent()
    {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Path of a recovered payload: `<dir>/<base>-<label><extension>`.
pub(super) fn payload_path(
    dir: &Path,
    base: &str,
    label: &str,
    signature: &Signature,
) -> PathBuf
{
    dir.join(format!("{base}-{label}{}", signature.extension()))
}

/// Loads and decodes the bitmap at `path`.
///
/// # Errors
///
/// Returns:
/// * [`AppError::Read`] when the path is a directory
/// * [`AppError::Bitmap`] when the bitmap cannot be read or decoded
pub(super) fn load_bitmap(path: impl AsRef<Path>) -> Result<Bitmap, AppError>
{
    if path.as_ref().is_dir()
    {
        let message = format!("{} is a directory", path.as_ref().display());
        return Err(AppError::Read {
            path: path.as_ref().into(),
            source: Error::new(ErrorKind::IsADirectory, message),
        });
    }

    Ok(Bitmap::open(path)?)
}

/// Writes a recovered payload, creating the directory if needed.
///
/// # Errors
///
/// Returns [`AppError::Write`] when the directory or file cannot be written.
pub(super) fn write_payload(
    path: &Path,
    bytes: &[u8],
) -> Result<(), AppError>
{
    let write = || {
        if let Some(parent) = path.parent()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    };

    write().map_err(|source| AppError::Write {
        path: path.into(),
        source,
    })
}

#[cfg(test)]
mod tests
{
    use tempfile::TempDir;

    use super::*;
    use crate::signature::DEFAULT_SIGNATURES;

    #[test]
    fn base_name_strips_directory_and_extension()
    {
        assert_eq!(base_name(Path::new("dir/cover.bmp")), "cover");
        assert_eq!(base_name(Path::new("cover.final.bmp")), "cover.final");
        assert_eq!(base_name(Path::new("noext")), "noext");
        assert_eq!(base_name(Path::new("")), FALLBACK_BASE);
    }

    #[test]
    fn output_dir_defaults_to_input_directory()
    {
        assert_eq!(output_dir("images/cover.bmp"), Path::new("images"));
        assert_eq!(output_dir("cover.bmp"), Path::new("."));
    }

    #[test]
    fn payload_path_appends_label_and_extension()
    {
        let jpeg = &DEFAULT_SIGNATURES[0];
        assert_eq!(
            payload_path(Path::new("out"), "cover", "gbr", jpeg),
            Path::new("out/cover-gbr.jpg")
        );
    }

    #[test]
    fn rejects_directories_as_input()
    {
        let dir = TempDir::new().expect("failed to create tempdir");

        let error = load_bitmap(dir.path()).expect_err("directory is no file");
        assert!(matches!(error, AppError::Read { .. }));
    }

    #[test]
    fn write_payload_creates_missing_directories()
    {
        let dir = TempDir::new().expect("failed to create tempdir");
        let path = dir.path().join("nested/out/cover-r.pdf");

        write_payload(&path, b"%PDF").expect("payload should be written");
        assert_eq!(fs::read(&path).expect("payload exists"), b"%PDF");
    }
}
