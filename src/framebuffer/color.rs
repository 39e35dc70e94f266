//! Color palette and RGB565 wire encoding
use embedded_graphics_core::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics_core::pixelcolor::Rgb565;

use crate::framebuffer::format::PixelFormat;

/// 16-entry ANSI-style palette index
///
/// Text control bytes select entries by their low nibble:
/// `0xF0..=0xFF` for the foreground, `0xB0..=0xBF` for the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ansi {
    Black = 0x0,
    Red = 0x1,
    Green = 0x2,
    Yellow = 0x3,
    Blue = 0x4,
    Purple = 0x5,
    Cyan = 0x6,
    White = 0x7,
    BlackBright = 0x8,
    RedBright = 0x9,
    GreenBright = 0xA,
    YellowBright = 0xB,
    BlueBright = 0xC,
    PurpleBright = 0xD,
    CyanBright = 0xE,
    WhiteBright = 0xF,
}

const ANSI_HEX: [u32; 16] = [
    // standard
    0x000000, // black
    0x800000, // red
    0x008000, // green
    0x808000, // yellow
    0x000080, // blue
    0x800080, // purple
    0x007080, // cyan
    0x808080, // white
    // intense
    0x606060, // bright black
    0xFF2020, // bright red
    0x20CF20, // bright green
    0xFFFF00, // bright yellow
    0x2020FF, // bright blue
    0xFF20FF, // bright purple
    0x00DFCF, // bright cyan
    0xFFFFFF, // bright white
];

impl Ansi {
    /// Palette entry addressed by the low nibble of `value`
    pub const fn from_nibble(value: u8) -> Self {
        match value & 0x0F {
            0x0 => Ansi::Black,
            0x1 => Ansi::Red,
            0x2 => Ansi::Green,
            0x3 => Ansi::Yellow,
            0x4 => Ansi::Blue,
            0x5 => Ansi::Purple,
            0x6 => Ansi::Cyan,
            0x7 => Ansi::White,
            0x8 => Ansi::BlackBright,
            0x9 => Ansi::RedBright,
            0xA => Ansi::GreenBright,
            0xB => Ansi::YellowBright,
            0xC => Ansi::BlueBright,
            0xD => Ansi::PurpleBright,
            0xE => Ansi::CyanBright,
            _ => Ansi::WhiteBright,
        }
    }

    /// 8-bit channels of this entry
    pub const fn rgb(self) -> (u8, u8, u8) {
        from_hex(ANSI_HEX[self as usize])
    }

    /// This entry in the color space of format `F`
    pub fn color<F: PixelFormat>(self) -> F::Color {
        let (r, g, b) = self.rgb();
        F::from_rgb(r, g, b)
    }
}

pub const fn from_hex(hex: u32) -> (u8, u8, u8) {
    (
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    )
}

/// Packed RGB565 in big-endian byte order, as the panel expects it on the wire
#[inline]
pub fn encode_rgb565(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner().to_be()
}

/// Inverse of [`encode_rgb565`]
#[inline]
pub fn decode_rgb565(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(u16::from_be(raw)))
}
