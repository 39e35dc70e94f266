use crate::framebuffer::color::Ansi;
use crate::framebuffer::format::PixelFormat;
use crate::gfx::font::{fonts, Font};

/// Canvas defaults for format `F`
#[derive(Debug, Clone, Copy)]
pub struct Theme<F: PixelFormat> {
    pub font: &'static Font,
    pub foreground: F::Color,
    pub background: F::Color,
    pub auto_next_line: bool,
}

impl<F: PixelFormat> Theme<F> {
    /// Bright text on black with the 5x7 font and wrapping
    pub fn dark() -> Self {
        Self {
            font: &fonts::FONT_5X7,
            foreground: Ansi::WhiteBright.color::<F>(),
            background: Ansi::Black.color::<F>(),
            auto_next_line: true,
        }
    }

    /// Black text on bright white with the 5x7 font and wrapping
    pub fn light() -> Self {
        Self {
            font: &fonts::FONT_5X7,
            foreground: Ansi::Black.color::<F>(),
            background: Ansi::WhiteBright.color::<F>(),
            auto_next_line: true,
        }
    }

    /// Palette colors straight from the format defaults
    pub fn format_default() -> Self {
        Self {
            font: Font::blank(),
            foreground: F::FOREGROUND_DEFAULT,
            background: F::BACKGROUND_DEFAULT,
            auto_next_line: false,
        }
    }
}

/// Blank font, bright white on black, no wrapping
impl<F: PixelFormat> Default for Theme<F> {
    fn default() -> Self {
        Self {
            font: Font::blank(),
            foreground: Ansi::WhiteBright.color::<F>(),
            background: Ansi::Black.color::<F>(),
            auto_next_line: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::format::{Monochrome, Rgb565Format};
    use crate::framebuffer::view::RegionView;
    use crate::gfx::canvas::Canvas;
    use embedded_graphics_core::pixelcolor::{BinaryColor, Rgb565, RgbColor};

    #[test_log::test]
    fn presets_are_inverse_of_each_other() {
        let dark = Theme::<Rgb565Format>::dark();
        let light = Theme::<Rgb565Format>::light();

        assert_eq!((dark.foreground, dark.background), (Rgb565::WHITE, Rgb565::BLACK));
        assert_eq!((light.foreground, light.background), (dark.background, dark.foreground));
        assert!(dark.auto_next_line && light.auto_next_line);
    }

    #[test_log::test]
    fn canvas_picks_up_theme() {
        let mut raw = [0u8; 16];
        let view = RegionView::<Monochrome>::from_slice(&mut raw, 16, 16, 8).unwrap();

        let canvas = Canvas::with_theme(view, &Theme::light());
        assert_eq!(canvas.foreground(), BinaryColor::Off);
        assert_eq!(canvas.background(), BinaryColor::On);
        assert!(canvas.auto_next_line());
        assert_eq!(canvas.glyph_width(), 6);

        let plain = Canvas::new(view);
        assert!(plain.font().is_blank());
        assert!(!plain.auto_next_line());
        assert_eq!(Theme::<Monochrome>::format_default().foreground, BinaryColor::On);
    }
}
