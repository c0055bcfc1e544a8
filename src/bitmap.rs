//! Uncompressed BMP loading.
//!
//! Probes the BMP header for the properties extraction depends on, rejects
//! bit depths other than 8, 16 and 24 bits per pixel, then decodes the pixel
//! data into a single contiguous RGB buffer addressed top-left first.
use std::fs;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use thiserror::Error;

/// Size of the file header plus a `BITMAPINFOHEADER`
pub const BMP_HEADER_SIZE: usize = 54;

const MAGIC: &[u8; 2] = b"BM";
const DIB_SIZE_OFFSET: usize = 14;
const WIDTH_OFFSET: usize = 18;
const HEIGHT_OFFSET: usize = 22;
const BPP_OFFSET: usize = 28;
const COMPRESSION_OFFSET: usize = 30;

/// Smallest DIB header carrying the fields read here (`BITMAPINFOHEADER`)
const MIN_DIB_SIZE: u32 = 40;
/// `BI_RGB`
const COMPRESSION_NONE: u32 = 0;
/// `BI_BITFIELDS`
const COMPRESSION_BITFIELDS: u32 = 3;

/// Errors that can be emitted while loading a bitmap
#[derive(Debug, Error)]
pub enum BitmapError
{
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read
    {
        path: Box<Path>,
        #[source]
        source: std::io::Error,
    },

    /// The data ends before the header does
    #[error(
        "bitmap header is truncated: {len} bytes, need at least \
         {BMP_HEADER_SIZE}"
    )]
    TruncatedHeader
    {
        len: usize
    },

    /// The data does not start with `BM`
    #[error("not a BMP file")]
    NotBitmap,

    /// OS/2 style core headers are not handled
    #[error("unsupported BMP header of {size} bytes")]
    UnsupportedHeader
    {
        size: u32
    },

    /// Only 8, 16 and 24 bits per pixel can be analysed
    #[error(
        "unsupported bit depth of {bits_per_pixel} bits per pixel, expected \
         8, 16 or 24"
    )]
    UnsupportedBitDepth
    {
        bits_per_pixel: u16
    },

    /// Run-length encoded and other compressed bitmaps are not analysed
    #[error("unsupported BMP compression method {method}")]
    UnsupportedCompression
    {
        method: u32
    },

    /// The header declares an empty or absurd size
    #[error("invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions
    {
        width: i32,
        height: i32,
    },

    /// The pixel data is malformed or truncated
    #[error("failed to decode bitmap pixel data: {source}")]
    Decode
    {
        #[source]
        source: image::ImageError,
    },

    /// The decoded grid disagrees with the header
    #[error(
        "decoded {decoded_width}x{decoded_height} pixels but the header \
         declares {width}x{height}"
    )]
    DimensionMismatch
    {
        width: u32,
        height: u32,
        decoded_width: u32,
        decoded_height: u32,
    },
}

/// The header fields extraction cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapHeader
{
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub compression: u32,
}

impl BitmapHeader
{
    /// Parses and validates the leading [`BMP_HEADER_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`BitmapError::TruncatedHeader`] when `bytes` is too short
    /// * [`BitmapError::NotBitmap`] when the `BM` magic is missing
    /// * [`BitmapError::UnsupportedHeader`] for OS/2 core headers
    /// * [`BitmapError::InvalidDimensions`] for zero or negative widths
    pub fn parse(bytes: &[u8]) -> Result<Self, BitmapError>
    {
        if bytes.len() < BMP_HEADER_SIZE
        {
            return Err(BitmapError::TruncatedHeader { len: bytes.len() });
        }
        if !bytes.starts_with(MAGIC)
        {
            return Err(BitmapError::NotBitmap);
        }

        let dib_size = read_u32(bytes, DIB_SIZE_OFFSET);
        if dib_size < MIN_DIB_SIZE
        {
            return Err(BitmapError::UnsupportedHeader { size: dib_size });
        }

        let raw_width = read_i32(bytes, WIDTH_OFFSET);
        let raw_height = read_i32(bytes, HEIGHT_OFFSET);
        let (Ok(width), Some(height)) = (
            u32::try_from(raw_width),
            raw_height.checked_abs().map(i32::unsigned_abs),
        )
        else
        {
            return Err(BitmapError::InvalidDimensions {
                width: raw_width,
                height: raw_height,
            });
        };
        if width == 0 || height == 0
        {
            return Err(BitmapError::InvalidDimensions {
                width: raw_width,
                height: raw_height,
            });
        }

        Ok(Self {
            width,
            height,
            bits_per_pixel: read_u16(bytes, BPP_OFFSET),
            compression: read_u32(bytes, COMPRESSION_OFFSET),
        })
    }

    /// Whole bytes per pixel, as long as the depth can be analysed.
    ///
    /// # Errors
    ///
    /// Returns [`BitmapError::UnsupportedBitDepth`] unless the header
    /// declares 8, 16 or 24 bits per pixel.
    pub fn bytes_per_pixel(&self) -> Result<u8, BitmapError>
    {
        match self.bits_per_pixel
        {
            8 => Ok(1),
            16 => Ok(2),
            24 => Ok(3),
            bits_per_pixel =>
            {
                Err(BitmapError::UnsupportedBitDepth { bits_per_pixel })
            },
        }
    }
}

/// A fully decoded bitmap, read-only once built.
#[derive(Clone, Debug)]
pub struct Bitmap
{
    pixels: RgbImage,
    bytes_per_pixel: u8,
}

impl Bitmap
{
    /// Reads and decodes the BMP file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmapError::Read`] when the file cannot be read, and any
    /// error of [`Bitmap::from_bytes`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BitmapError>
    {
        let bytes =
            fs::read(path.as_ref()).map_err(|source| BitmapError::Read {
                path: path.as_ref().into(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Decodes an in-memory BMP file.
    ///
    /// The header is validated before any pixel is decoded, so an
    /// unsupported depth or compression never reaches the extraction stage.
    ///
    /// # Errors
    ///
    /// Returns any error of [`BitmapHeader::parse`], plus:
    /// * [`BitmapError::UnsupportedBitDepth`] for depths other than 8/16/24
    /// * [`BitmapError::UnsupportedCompression`] for RLE and similar
    /// * [`BitmapError::Decode`] when the pixel data is malformed
    /// * [`BitmapError::DimensionMismatch`] when the decoder disagrees with
    ///   the header
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BitmapError>
    {
        let header = BitmapHeader::parse(bytes)?;
        let bytes_per_pixel = header.bytes_per_pixel()?;
        if !matches!(
            header.compression,
            COMPRESSION_NONE | COMPRESSION_BITFIELDS
        )
        {
            return Err(BitmapError::UnsupportedCompression {
                method: header.compression,
            });
        }

        let pixels =
            image::load_from_memory_with_format(bytes, ImageFormat::Bmp)
                .map_err(|source| BitmapError::Decode { source })?
                .into_rgb8();

        if pixels.dimensions() != (header.width, header.height)
        {
            return Err(BitmapError::DimensionMismatch {
                width: header.width,
                height: header.height,
                decoded_width: pixels.width(),
                decoded_height: pixels.height(),
            });
        }

        Ok(Self {
            pixels,
            bytes_per_pixel,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32
    {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32
    {
        self.pixels.height()
    }

    /// Bytes per pixel in the source file: 1, 2 or 3.
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> u8
    {
        self.bytes_per_pixel
    }

    /// Colour at column `x` of row `y`, (0, 0) being the top-left pixel.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgb<u8>>
    {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// The decoded pixel grid.
    #[must_use]
    pub const fn pixels(&self) -> &RgbImage
    {
        &self.pixels
    }
}

// Callers check the header length before reading fields.
fn read_u16(bytes: &[u8], offset: usize) -> u16
{
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32
{
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_i32(bytes: &[u8], offset: usize) -> i32
{
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
