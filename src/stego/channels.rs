//! Channel selection and reordering.
//!
//! A [`ChannelRoles`] assignment says which of the red, green and blue
//! channels take part in an extraction and in which order. Projecting a pixel
//! through it yields a dense value holding only the selected channel bytes,
//! position 0 being the most significant.
use image::Rgb;

use super::StegoError;

/// One of the three colour channels of an RGB pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel
{
    Red,
    Green,
    Blue,
}

impl Channel
{
    /// Single-letter name used in scheme labels.
    #[must_use]
    pub const fn letter(self) -> char
    {
        match self
        {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
        }
    }

    /// Parses a single scheme label letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self>
    {
        match letter
        {
            'r' | 'R' => Some(Self::Red),
            'g' | 'G' => Some(Self::Green),
            'b' | 'B' => Some(Self::Blue),
            _ => None,
        }
    }

    /// Reads this channel's byte from a pixel.
    const fn sample(self, pixel: Rgb<u8>) -> u8
    {
        match self
        {
            Self::Red => pixel.0[0],
            Self::Green => pixel.0[1],
            Self::Blue => pixel.0[2],
        }
    }
}

/// Maps each colour channel to an output position, or excludes it.
///
/// Included positions are unique and contiguous from 0. The number of
/// included channels decides how many bits an extraction reads per pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelRoles
{
    red: Option<u8>,
    green: Option<u8>,
    blue: Option<u8>,
}

impl ChannelRoles
{
    /// Builds an assignment from explicit positions.
    ///
    /// # Errors
    ///
    /// Returns [`StegoError::InvalidRoles`] when no channel is included, or
    /// when the included positions are not a duplicate-free `0..n` range.
    pub fn new(
        red: Option<u8>,
        green: Option<u8>,
        blue: Option<u8>,
    ) -> Result<Self, StegoError>
    {
        let roles = Self { red, green, blue };
        let included = roles.included();

        let mut seen = [false; 3];
        for position in [red, green, blue].into_iter().flatten()
        {
            let slot = usize::from(position);
            if slot >= included || seen[slot]
            {
                return Err(StegoError::InvalidRoles { red, green, blue });
            }
            seen[slot] = true;
        }

        if included == 0
        {
            return Err(StegoError::InvalidRoles { red, green, blue });
        }

        Ok(roles)
    }

    /// Builds the assignment that puts `order[i]` at position `i`.
    ///
    /// Channels listed twice keep their last position, so callers should
    /// only pass duplicate-free orders.
    #[must_use]
    pub const fn from_order(order: &[Channel]) -> Self
    {
        let mut roles = Self {
            red: None,
            green: None,
            blue: None,
        };

        let mut position = 0;
        while position < order.len()
        {
            // order holds at most three channels
            #[allow(clippy::cast_possible_truncation)]
            let slot = Some(position as u8);
            match order[position]
            {
                Channel::Red => roles.red = slot,
                Channel::Green => roles.green = slot,
                Channel::Blue => roles.blue = slot,
            }
            position += 1;
        }

        roles
    }

    /// Position assigned to `channel`, if it takes part.
    #[must_use]
    pub const fn position(&self, channel: Channel) -> Option<u8>
    {
        match channel
        {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Number of channels taking part.
    #[must_use]
    pub const fn included(&self) -> usize
    {
        self.red.is_some() as usize
            + self.green.is_some() as usize
            + self.blue.is_some() as usize
    }

    /// Packs the included channel bytes of `pixel` into a dense value.
    ///
    /// Position 0 lands in the most significant byte of the
    /// `8 * included()`-bit result. Excluded channels leave no gap, so a
    /// two-channel assignment gives a 16-bit value. With nothing included
    /// the result is 0.
    #[must_use]
    pub fn project(&self, pixel: Rgb<u8>) -> u32
    {
        let included = self.included();

        [Channel::Red, Channel::Green, Channel::Blue]
            .into_iter()
            .filter_map(|channel| {
                self.position(channel)
                    .map(|pos| (usize::from(pos), channel.sample(pixel)))
            })
            .fold(0, |projected, (pos, byte)| {
                let shift = 8 * (included - 1 - pos);
                projected | (u32::from(byte) << shift)
            })
    }
}
