//! Least-significant-bit extraction and packing.
//!
//! Walks an image in raster order, projects every pixel through a
//! [`ChannelRoles`] assignment and keeps the lowest bit of each selected
//! channel. The per-pixel bits are concatenated most-significant-first and
//! sliced into bytes.
//!
//! # Layouts
//!
//! | Channels | Bits/pixel | Pixels per group | Bytes per group |
//! |----------|------------|------------------|-----------------|
//! | 1        | 1          | 8                | 1               |
//! | 2        | 2          | 4                | 1               |
//! | 3        | 3          | 8                | 3               |
//!
//! A group that is not completed when traversal ends is dropped, so no
//! partially filled byte is ever emitted.
use image::{Rgb, RgbImage};

use super::channels::ChannelRoles;

/// Where bit groups may start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupBoundary
{
    /// Groups flow across row ends; only the very last partial group is
    /// lost.
    #[default]
    Continuous,
    /// Every row starts a fresh group; a partial group left over at the end
    /// of a row is discarded.
    RowAligned,
}

/// Packing layout, chosen by how many channels an assignment includes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant
{
    Single,
    Pair,
    Triple,
}

impl Variant
{
    /// Picks the layout for `roles`, or `None` when nothing is included.
    #[must_use]
    pub const fn for_roles(roles: &ChannelRoles) -> Option<Self>
    {
        match roles.included()
        {
            1 => Some(Self::Single),
            2 => Some(Self::Pair),
            3 => Some(Self::Triple),
            _ => None,
        }
    }

    /// Bits read from every pixel.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u32
    {
        match self
        {
            Self::Single => 1,
            Self::Pair => 2,
            Self::Triple => 3,
        }
    }

    /// Pixels needed to fill a whole number of bytes.
    #[must_use]
    pub const fn pixels_per_group(self) -> usize
    {
        match self
        {
            Self::Single | Self::Triple => 8,
            Self::Pair => 4,
        }
    }

    /// Bytes emitted for every completed group.
    #[must_use]
    pub const fn bytes_per_group(self) -> usize
    {
        match self
        {
            Self::Single | Self::Pair => 1,
            Self::Triple => 3,
        }
    }
}

/// Extracts the LSB stream for `roles` with continuous grouping.
///
/// Equivalent to [`extract_with`] using [`GroupBoundary::Continuous`].
#[must_use]
pub fn extract(image: &RgbImage, roles: &ChannelRoles) -> Vec<u8>
{
    extract_with(image, roles, GroupBoundary::Continuous)
}

/// Extracts the LSB stream for `roles` honouring the given group boundary
/// policy.
///
/// Returns an empty buffer when `roles` includes no channel.
#[must_use]
pub fn extract_with(
    image: &RgbImage,
    roles: &ChannelRoles,
    boundary: GroupBoundary,
) -> Vec<u8>
{
    let Some(variant) = Variant::for_roles(roles)
    else
    {
        return Vec::new();
    };

    let mut packer = GroupPacker::new(variant, capacity(image, variant));
    match boundary
    {
        GroupBoundary::Continuous =>
        {
            for pixel in image.pixels()
            {
                packer.push(pixel_bits(*pixel, roles));
            }
        },
        GroupBoundary::RowAligned =>
        {
            for row in image.rows()
            {
                packer.reset();
                for pixel in row
                {
                    packer.push(pixel_bits(*pixel, roles));
                }
            }
        },
    }

    packer.finish()
}

/// Upper bound on the output length, used to size the buffer once.
fn capacity(image: &RgbImage, variant: Variant) -> usize
{
    let pixels = (image.width() as usize) * (image.height() as usize);
    pixels / variant.pixels_per_group() * variant.bytes_per_group()
}

/// Lowest bit of every included channel, position 0 in the highest bit.
fn pixel_bits(pixel: Rgb<u8>, roles: &ChannelRoles) -> u32
{
    let projected = roles.project(pixel);

    (0..roles.included()).fold(0, |bits, position| {
        let shift = 8 * (roles.included() - 1 - position);
        (bits << 1) | ((projected >> shift) & 1)
    })
}

/// Accumulates per-pixel bit groups and flushes whole groups as bytes.
struct GroupPacker
{
    variant: Variant,
    /// Bits of the group being filled, newest in the low bits
    group: u32,
    /// Pixels pushed into the current group
    filled: usize,
    out: Vec<u8>,
}

impl GroupPacker
{
    fn new(variant: Variant, capacity: usize) -> Self
    {
        Self {
            variant,
            group: 0,
            filled: 0,
            out: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, bits: u32)
    {
        self.group = (self.group << self.variant.bits_per_pixel()) | bits;
        self.filled += 1;

        if self.filled == self.variant.pixels_per_group()
        {
            // a full group occupies exactly the low bytes_per_group bytes
            let bytes = self.group.to_be_bytes();
            let start = bytes.len() - self.variant.bytes_per_group();
            self.out.extend_from_slice(&bytes[start..]);
            self.reset();
        }
    }

    /// Drops whatever partial group is pending.
    fn reset(&mut self)
    {
        self.group = 0;
        self.filled = 0;
    }

    fn finish(self) -> Vec<u8>
    {
        self.out
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::stego::channels::Channel;

    /// Builds a one-row image whose pixels carry the given LSBs in red,
    /// green and blue, on top of otherwise busy channel values.
    fn strip(lsbs: &[[u8; 3]]) -> RgbImage
    {
        let width = u32::try_from(lsbs.len()).expect("test strip fits in u32");
        let mut image = RgbImage::new(width, 1);
        for (pixel, bits) in image.pixels_mut().zip(lsbs)
        {
            *pixel = Rgb([0xA4 | bits[0], 0x3E | bits[1], 0x70 | bits[2]]);
        }
        image
    }

    fn red() -> ChannelRoles
    {
        ChannelRoles::from_order(&[Channel::Red])
    }

    #[test]
    fn single_channel_packs_eight_pixels_msb_first()
    {
        let bits = [1, 0, 1, 1, 0, 0, 1, 0].map(|bit| [bit, 0, 0]);
        let image = strip(&bits);

        assert_eq!(extract(&image, &red()), vec![0xB2]);
    }

    #[test]
    fn single_channel_reads_only_the_selected_channel()
    {
        let bits = [1, 0, 1, 1, 0, 0, 1, 0].map(|bit| [1, bit, 1]);
        let image = strip(&bits);
        let green = ChannelRoles::from_order(&[Channel::Green]);

        assert_eq!(extract(&image, &green), vec![0xB2]);
        assert_eq!(extract(&image, &red()), vec![0xFF]);
    }

    #[test]
    fn pair_packs_four_two_bit_fields()
    {
        // (2, 1, 3, 0) as (first, second) channel bits
        let image = strip(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 0]]);
        let rg = ChannelRoles::from_order(&[Channel::Red, Channel::Green]);

        assert_eq!(extract(&image, &rg), vec![0x9C]);
    }

    #[test]
    fn pair_respects_channel_order()
    {
        let image = strip(&[[1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 0]]);
        let gr = ChannelRoles::from_order(&[Channel::Green, Channel::Red]);

        // (1, 2, 3, 0) -> 01 10 11 00
        assert_eq!(extract(&image, &gr), vec![0x6C]);
    }

    #[test]
    fn triple_slices_24_bits_across_byte_boundaries()
    {
        // bit triples 5, 2, 7, 0, 3, 6, 1, 4
        let image = strip(&[
            [1, 0, 1],
            [0, 1, 0],
            [1, 1, 1],
            [0, 0, 0],
            [0, 1, 1],
            [1, 1, 0],
            [0, 0, 1],
            [1, 0, 0],
        ]);
        let rgb = ChannelRoles::from_order(&[
            Channel::Red,
            Channel::Green,
            Channel::Blue,
        ]);

        // 101 010 111 000 011 110 001 100
        assert_eq!(extract(&image, &rgb), vec![0xAB, 0x87, 0x8C]);
    }

    #[test]
    fn triple_respects_channel_order()
    {
        let image = strip(&[[1, 0, 0]; 8]);
        let bgr = ChannelRoles::from_order(&[
            Channel::Blue,
            Channel::Green,
            Channel::Red,
        ]);

        // every pixel contributes 001
        assert_eq!(extract(&image, &bgr), vec![0x24, 0x92, 0x49]);
    }

    #[test]
    fn trailing_pixels_are_dropped()
    {
        let image = strip(&[[1, 1, 1]; 13]);
        let rg = ChannelRoles::from_order(&[Channel::Red, Channel::Green]);
        let rgb = ChannelRoles::from_order(&[
            Channel::Red,
            Channel::Green,
            Channel::Blue,
        ]);

        assert_eq!(extract(&image, &red()), vec![0xFF]);
        assert_eq!(extract(&image, &rg), vec![0xFF; 3]);
        assert_eq!(extract(&image, &rgb), vec![0xFF; 3]);
    }

    #[test]
    fn too_few_pixels_yield_nothing()
    {
        let image = strip(&[[1, 1, 1]; 3]);
        assert!(extract(&image, &red()).is_empty());
        assert!(extract(&RgbImage::new(0, 0), &red()).is_empty());
    }

    #[test]
    fn output_length_is_floor_of_whole_groups()
    {
        let image = RgbImage::from_pixel(7, 5, Rgb([1, 1, 1]));
        let pixels = 35;

        for (order, group, bytes) in [
            (&[Channel::Blue][..], 8, 1),
            (&[Channel::Blue, Channel::Red][..], 4, 1),
            (&[Channel::Blue, Channel::Red, Channel::Green][..], 8, 3),
        ]
        {
            let roles = ChannelRoles::from_order(order);
            let out = extract(&image, &roles);
            assert_eq!(out.len(), pixels / group * bytes);
        }
    }

    #[test]
    fn continuous_groups_span_row_ends()
    {
        // width 3: the first group takes rows 0, 1 and two pixels of row 2
        let mut image = RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]));
        image.put_pixel(0, 1, Rgb([1, 0, 0]));
        image.put_pixel(1, 2, Rgb([1, 0, 0]));

        // pixel indices 3 and 7 are set: 0001 0001
        assert_eq!(extract(&image, &red()), vec![0x11]);
    }

    #[test]
    fn row_aligned_discards_partial_groups_per_row()
    {
        // width 10: each row yields one byte, its last two pixels are lost
        let mut image = RgbImage::from_pixel(10, 2, Rgb([0, 0, 0]));
        for x in 0..10
        {
            image.put_pixel(x, 0, Rgb([1, 0, 0]));
        }
        image.put_pixel(0, 1, Rgb([1, 0, 0]));

        let aligned = extract_with(&image, &red(), GroupBoundary::RowAligned);
        assert_eq!(aligned, vec![0xFF, 0x80]);

        // continuous: 8 ones, then 1 1 | 1 0 0 0 0 0 -> 0xE0, 4 pixels left
        let continuous = extract(&image, &red());
        assert_eq!(continuous, vec![0xFF, 0xE0]);
    }

    #[test]
    fn policies_agree_when_width_is_a_group_multiple()
    {
        let mut image = RgbImage::new(8, 4);
        for (x, y, pixel) in image.enumerate_pixels_mut()
        {
            let seed = (x * 7 + y * 13) as u8;
            *pixel = Rgb([seed, seed.rotate_left(3), seed ^ 0x5A]);
        }

        for order in [
            &[Channel::Green][..],
            &[Channel::Red, Channel::Blue][..],
            &[Channel::Blue, Channel::Green, Channel::Red][..],
        ]
        {
            let roles = ChannelRoles::from_order(order);
            assert_eq!(
                extract(&image, &roles),
                extract_with(&image, &roles, GroupBoundary::RowAligned),
            );
        }
    }

    #[test]
    fn row_aligned_triple_drops_short_rows_entirely()
    {
        let image = RgbImage::from_pixel(5, 4, Rgb([1, 1, 1]));
        let rgb = ChannelRoles::from_order(&[
            Channel::Red,
            Channel::Green,
            Channel::Blue,
        ]);

        assert!(
            extract_with(&image, &rgb, GroupBoundary::RowAligned).is_empty()
        );
        // 20 pixels continuous: two full groups
        assert_eq!(extract(&image, &rgb).len(), 6);
    }

    #[test]
    fn empty_assignment_extracts_nothing()
    {
        let image = RgbImage::from_pixel(8, 8, Rgb([1, 1, 1]));
        assert!(extract(&image, &ChannelRoles::default()).is_empty());
    }

    #[test]
    fn variant_layouts_fill_whole_bytes()
    {
        for variant in [Variant::Single, Variant::Pair, Variant::Triple]
        {
            let bits = variant.bits_per_pixel() as usize
                * variant.pixels_per_group();
            assert_eq!(bits, variant.bytes_per_group() * 8);
        }
    }
}
