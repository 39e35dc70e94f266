//! In-band styled text
//!
//! Text is a byte stream. Printable ASCII draws glyphs from the canvas font,
//! a handful of bytes above 0x7F change colors, and `\n` / `\t` move the
//! cursor:
//!
//! | byte          | effect                                        |
//! |---------------|-----------------------------------------------|
//! | `0x80`        | back to the canvas colors                     |
//! | `0x81`        | inverted canvas colors                        |
//! | `0x82`        | swap the current foreground and background    |
//! | `0x83` `0x84` | reserved, ignored                             |
//! | `0xF0..=0xFF` | foreground = palette entry of the low nibble  |
//! | `0xB0..=0xBF` | background = palette entry of the low nibble  |
//! | `\n`          | clear to end of line, next row at start x     |
//! | `\t`          | clear up to the next tab stop                 |
//!
//! Anything else without a glyph is drawn as an outline box.

use core::fmt;

use crate::framebuffer::color::Ansi;
use crate::framebuffer::format::{Pixel, PixelFormat};
use crate::gfx::canvas::Canvas;
use crate::gfx::font::Font;

pub const RESET: u8 = 0x80;
pub const INVERT: u8 = 0x81;
pub const SWAP: u8 = 0x82;

/// Cursor over a canvas, carrying colors and position across writes
///
/// Once the text runs off the bottom (or off the right edge without
/// wrapping) the cursor stops and ignores further input.
#[derive(Debug)]
pub struct TextCursor<'c, 'a, F: PixelFormat> {
    canvas: &'c Canvas<'a, F>,
    start_x: Pixel,
    x: Pixel,
    y: Pixel,
    foreground: F::Color,
    background: F::Color,
    stopped: bool,
}

impl<'c, 'a, F: PixelFormat> TextCursor<'c, 'a, F> {
    pub fn new(canvas: &'c Canvas<'a, F>, x: Pixel, y: Pixel) -> Self {
        Self {
            canvas,
            start_x: x,
            x,
            y,
            foreground: canvas.foreground(),
            background: canvas.background(),
            stopped: false,
        }
    }

    pub const fn position(&self) -> (Pixel, Pixel) {
        (self.x, self.y)
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current (foreground, background)
    pub fn colors(&self) -> (F::Color, F::Color) {
        (self.foreground, self.background)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.stopped {
                return;
            }
            self.put(byte);
        }
    }

    fn put(&mut self, byte: u8) {
        match byte {
            RESET => {
                self.foreground = self.canvas.foreground();
                self.background = self.canvas.background();
            }
            INVERT => {
                self.foreground = self.canvas.background();
                self.background = self.canvas.foreground();
            }
            SWAP => core::mem::swap(&mut self.foreground, &mut self.background),
            0x83 | 0x84 => {}
            0xF0..=0xFF => self.foreground = Ansi::from_nibble(byte).color::<F>(),
            0xB0..=0xBF => self.background = Ansi::from_nibble(byte).color::<F>(),
            b'\n' => {
                self.clear_line(self.canvas.max_x());
                self.x = self.start_x;
                self.y = self.y.saturating_add(self.canvas.glyph_height());
            }
            b'\t' => {
                let tab = self.canvas.tab_width();
                let next = (self.x / tab).saturating_add(1).saturating_mul(tab);
                self.clear_line(next - 1);
                self.x = next;
            }
            _ => self.glyph(byte),
        }
    }

    fn glyph(&mut self, byte: u8) {
        let font = self.canvas.font();
        let glyph_width = Pixel::from(font.glyph_width());
        let glyph_height = Pixel::from(font.glyph_height());

        if self.x > self.canvas.width() - glyph_width {
            self.clear_line(self.canvas.max_x());
            if !self.canvas.auto_next_line() {
                self.stopped = true;
                return;
            }
            self.x = 0;
            self.y = self.y.saturating_add(self.canvas.glyph_height());
        }

        if self.y > self.canvas.height() - glyph_height {
            self.stopped = true;
            return;
        }

        match font.glyph(byte) {
            Some(columns) => self.draw_columns(font, columns),
            None => self.draw_missing(font),
        }

        self.x += glyph_width;
        if self.x < self.canvas.width() {
            self.canvas
                .vertical_span(self.x, self.y, self.y + glyph_height, self.background);
        }
        self.x = self.x.saturating_add(1);
    }

    fn draw_columns(&self, font: &Font, columns: &[u8]) {
        let view = self.canvas.view();
        let bottom = self.y + Pixel::from(font.glyph_height());

        for (col, &bits) in columns.iter().enumerate() {
            let x = self.x + col as Pixel;
            for row in 0..font.glyph_height().min(Font::MAX_GLYPH_HEIGHT) {
                let color = if bits >> row & 1 != 0 {
                    self.foreground
                } else {
                    self.background
                };
                view.set_pixel(x, self.y + Pixel::from(row), color);
            }
            view.set_pixel(x, bottom, self.background);
        }
    }

    fn draw_missing(&self, font: &Font) {
        let right = self.x + Pixel::from(font.glyph_width()) - 1;
        let bottom = self.y + Pixel::from(font.glyph_height()) - 1;

        self.canvas.horizontal_span(self.x, self.y, right, self.foreground);
        self.canvas.horizontal_span(self.x, bottom, right, self.foreground);
        self.canvas.vertical_span(self.x, self.y, bottom, self.foreground);
        self.canvas.vertical_span(right, self.y, bottom, self.foreground);
    }

    /// Paint one text row with the background from the cursor to `end_x`
    fn clear_line(&self, end_x: Pixel) {
        if self.x <= end_x {
            self.canvas.view().fill_area(
                self.x,
                self.y,
                end_x,
                self.y.saturating_add(self.canvas.glyph_height() - 1),
                self.background,
            );
        }
    }
}

/// Characters U+0080..=U+00FF map to the control bytes of the same value;
/// anything past U+00FF has no glyph.
impl<F: PixelFormat> fmt::Write for TextCursor<'_, '_, F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.stopped {
                break;
            }
            self.put(u8::try_from(c).unwrap_or(Font::END_CHAR));
        }
        Ok(())
    }
}
