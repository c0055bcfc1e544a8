//! LSB extraction routines for brute-forcing hidden payloads out of images.
//!
//! Provides the channel projector, the bit packing engine and the catalogue
//! of channel schemes that drive it.
//!
//! # Extraction Format
//!
//! - Pixels are read left-to-right, top-to-bottom
//! - Every pixel contributes the LSB of each selected channel, first channel
//!   in the highest bit
//! - Bits are packed MSB-first into bytes; 1 channel needs 8 pixels per byte,
//!   2 channels need 4 pixels per byte, 3 channels need 8 pixels per 3 bytes
//! - Groups run across row ends unless [`GroupBoundary::RowAligned`] is asked
//!   for; an unfinished trailing group is dropped
//!
//! # Errors
//!
//! Returns [`StegoError`] when a channel assignment or scheme label is
//! invalid. Extraction itself cannot fail.
use thiserror::Error;

mod channels;
mod extract;
mod scheme;

pub use channels::{Channel, ChannelRoles};
pub use extract::{GroupBoundary, Variant, extract, extract_with};
pub use scheme::{
    Candidate, SCHEME_COUNT, SCHEMES, Scheme, enumerate, enumerate_all,
};

/// Errors that can be emitted while building channel selections
#[derive(Debug, Error)]
pub enum StegoError
{
    /// The channel positions do not form a duplicate-free `0..n` range
    #[error(
        "invalid channel positions red={red:?} green={green:?} blue={blue:?}"
    )]
    InvalidRoles
    {
        red: Option<u8>,
        green: Option<u8>,
        blue: Option<u8>,
    },

    /// No scheme carries the requested label
    #[error("unknown channel scheme `{label}`")]
    UnknownScheme
    {
        /// The label as given
        label: Box<str>,
    },
}
