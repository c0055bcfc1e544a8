//! The fixed catalogue of channel schemes tried against an image.
//!
//! A scheme is an ordered choice of channels. Every permutation of the three
//! channels, every ordered pair and every single channel is tried, giving 15
//! schemes in a stable order so output names are reproducible.
use std::fmt;

use image::RgbImage;
use tracing::debug;

use super::StegoError;
use super::channels::{Channel, ChannelRoles};
use super::channels::Channel::{Blue as B, Green as G, Red as R};
use super::extract::{GroupBoundary, Variant, extract_with};

/// Number of schemes in [`SCHEMES`].
pub const SCHEME_COUNT: usize = 15;

/// Every scheme, three-channel permutations first, then pairs, then singles.
pub const SCHEMES: [Scheme; SCHEME_COUNT] = [
    Scheme::new(&[R, G, B]),
    Scheme::new(&[R, B, G]),
    Scheme::new(&[G, R, B]),
    Scheme::new(&[G, B, R]),
    Scheme::new(&[B, R, G]),
    Scheme::new(&[B, G, R]),
    Scheme::new(&[R, B]),
    Scheme::new(&[R, G]),
    Scheme::new(&[G, R]),
    Scheme::new(&[G, B]),
    Scheme::new(&[B, R]),
    Scheme::new(&[B, G]),
    Scheme::new(&[R]),
    Scheme::new(&[G]),
    Scheme::new(&[B]),
];

/// An ordered selection of channels to read LSBs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scheme
{
    order: &'static [Channel],
    roles: ChannelRoles,
}

impl Scheme
{
    const fn new(order: &'static [Channel]) -> Self
    {
        Self {
            order,
            roles: ChannelRoles::from_order(order),
        }
    }

    /// Looks a scheme up by its label, e.g. `"gbr"` or `"r"`.
    ///
    /// Matching ignores ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`StegoError::UnknownScheme`] when no scheme carries the
    /// label.
    pub fn from_label(label: &str) -> Result<Self, StegoError>
    {
        SCHEMES
            .iter()
            .find(|scheme| {
                scheme.order.len() == label.chars().count()
                    && scheme.order.iter().zip(label.chars()).all(
                        |(channel, letter)| {
                            Channel::from_letter(letter) == Some(*channel)
                        },
                    )
            })
            .copied()
            .ok_or_else(|| StegoError::UnknownScheme {
                label: label.into(),
            })
    }

    /// Short label naming the channels in order, e.g. `"rbg"`.
    #[must_use]
    pub fn label(&self) -> String
    {
        self.to_string()
    }

    /// Channels read, in bit order.
    #[must_use]
    pub const fn channels(&self) -> &'static [Channel]
    {
        self.order
    }

    #[must_use]
    pub const fn roles(&self) -> &ChannelRoles
    {
        &self.roles
    }

    /// Packing layout used for this scheme.
    #[must_use]
    pub const fn variant(&self) -> Variant
    {
        match self.order.len()
        {
            1 => Variant::Single,
            2 => Variant::Pair,
            _ => Variant::Triple,
        }
    }
}

impl fmt::Display for Scheme
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for channel in self.channels()
        {
            write!(f, "{}", channel.letter())?;
        }
        Ok(())
    }
}

/// Bytes recovered by one scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate
{
    pub scheme: Scheme,
    pub bytes: Vec<u8>,
}

impl Candidate
{
    #[must_use]
    pub fn label(&self) -> String
    {
        self.scheme.label()
    }
}

/// Runs every scheme in [`SCHEMES`] over `image` with continuous grouping.
#[must_use]
pub fn enumerate_all(image: &RgbImage) -> Vec<Candidate>
{
    enumerate(image, &SCHEMES, GroupBoundary::Continuous)
}

/// Runs the given schemes over `image`, one candidate per scheme, in the
/// order given.
#[must_use]
pub fn enumerate(
    image: &RgbImage,
    schemes: &[Scheme],
    boundary: GroupBoundary,
) -> Vec<Candidate>
{
    schemes
        .iter()
        .map(|scheme| {
            let bytes = extract_with(image, scheme.roles(), boundary);
            debug!(
                scheme = %scheme,
                variant = ?scheme.variant(),
                len = bytes.len(),
                head = %hex::encode(&bytes[..bytes.len().min(8)]),
                "extracted candidate"
            );
            Candidate {
                scheme: *scheme,
                bytes,
            }
        })
        .collect()
}
