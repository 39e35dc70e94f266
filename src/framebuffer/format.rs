//! Pixel format policies
//!
//! A format decides how pixels are packed into raw storage and provides the
//! three primitives every drawing call ends up in: `set_pixel`, `fill` and
//! `copy`. All coordinates here are absolute buffer coordinates. Writes that
//! land outside the buffer are skipped, never reported.

use core::cell::Cell;
use core::fmt::Debug;

use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor, Rgb565, RgbColor};

use crate::framebuffer::color::{decode_rgb565, encode_rgb565};

/// Pixel coordinate / extent unit
pub type Pixel = i32;

/// Runtime tag for the supported encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 1 bit per pixel, 8 vertical pixels per byte
    Monochrome,
    /// 16 bits per pixel, row-major
    Rgb565,
}

/// Clip rectangle in absolute buffer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub x: Pixel,
    pub y: Pixel,
    pub width: Pixel,
    pub height: Pixel,
}

impl Window {
    pub const fn new(x: Pixel, y: Pixel, width: Pixel, height: Pixel) -> Self {
        Self { x, y, width, height }
    }

    pub const fn right(&self) -> Pixel {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> Pixel {
        self.y.saturating_add(self.height)
    }
}

/// Storage and color policy of one framebuffer encoding
pub trait PixelFormat: Copy + Debug + 'static {
    /// Raw storage element
    type Buffer: Copy + Default + Debug;
    /// Color handed to drawing calls
    type Color: PixelColor + Debug;

    const FORMAT: Format;
    const BITS_PER_PIXEL: u8;
    const FOREGROUND_DEFAULT: Self::Color;
    const BACKGROUND_DEFAULT: Self::Color;

    /// Number of `Buffer` elements needed for a `width` x `height` image
    fn buffer_len(width: usize, height: usize) -> usize;

    /// Nearest representable color for an 8-bit-per-channel triple
    fn from_rgb(r: u8, g: u8, b: u8) -> Self::Color;

    fn set_pixel(buffer: &[Cell<Self::Buffer>], stride: Pixel, x: Pixel, y: Pixel, color: Self::Color);

    /// Read back one pixel, `None` when (x, y) is outside the buffer
    fn get_pixel(buffer: &[Cell<Self::Buffer>], stride: Pixel, x: Pixel, y: Pixel) -> Option<Self::Color>;

    fn fill(
        buffer: &[Cell<Self::Buffer>],
        stride: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
        width: Pixel,
        height: Pixel,
        color: Self::Color,
    );

    /// Blit a tightly packed `source` image into `dest` at (`dest_x`, `dest_y`),
    /// dropping everything that falls outside `window`.
    #[allow(clippy::too_many_arguments)]
    fn copy(
        source: &[Self::Buffer],
        source_width: Pixel,
        source_height: Pixel,
        dest: &[Cell<Self::Buffer>],
        dest_stride: Pixel,
        window: Window,
        dest_x: Pixel,
        dest_y: Pixel,
    );
}

/// Storage cell at `row * stride + x`, if it exists
#[inline]
fn cell_at<T>(buffer: &[Cell<T>], stride: Pixel, x: Pixel, row: Pixel) -> Option<&Cell<T>> {
    if x < 0 || row < 0 || x >= stride {
        return None;
    }
    buffer.get(row as usize * stride as usize + x as usize)
}

/// Source region that survives clipping, as half-open (cols, rows)
fn visible_span(
    source_width: Pixel,
    source_height: Pixel,
    dest_stride: Pixel,
    window: Window,
    dest_x: Pixel,
    dest_y: Pixel,
) -> Option<((Pixel, Pixel), (Pixel, Pixel))> {
    let col_start = 0
        .max(window.x.saturating_sub(dest_x))
        .max(0i32.saturating_sub(dest_x));
    let col_end = source_width
        .min(window.right().saturating_sub(dest_x))
        .min(dest_stride.saturating_sub(dest_x));
    let row_start = 0
        .max(window.y.saturating_sub(dest_y))
        .max(0i32.saturating_sub(dest_y));
    let row_end = source_height.min(window.bottom().saturating_sub(dest_y));

    if col_start >= col_end || row_start >= row_end {
        return None;
    }
    Some(((col_start, col_end), (row_start, row_end)))
}

/// 1 bit per pixel, page addressed (SSD1306 style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Monochrome;

impl Monochrome {
    /// Vertical pixels packed into one byte
    pub const PAGE_HEIGHT: Pixel = 8;

    pub const fn pages(height: usize) -> usize {
        (height + 7) / 8
    }

    /// Bits of `page` covered by rows [offset_y, offset_y + height)
    pub fn page_mask(page: Pixel, offset_y: Pixel, height: Pixel) -> u8 {
        let page_top = page * Self::PAGE_HEIGHT;
        let page_bottom = page_top + Self::PAGE_HEIGHT - 1;

        let visible_top = offset_y.max(page_top);
        let visible_bottom = offset_y.saturating_add(height).min(page_bottom + 1);

        if visible_top >= visible_bottom {
            return 0;
        }

        bit_range_mask(
            (visible_top - page_top) as u8,
            (visible_bottom - page_top - 1) as u8,
        )
    }

    #[inline]
    fn write_masked(buffer: &[Cell<u8>], stride: Pixel, x: Pixel, page: Pixel, mask: u8, bits: u8) {
        if mask == 0 {
            return;
        }
        if let Some(cell) = cell_at(buffer, stride, x, page) {
            cell.set((cell.get() & !mask) | (bits & mask));
        }
    }
}

/// Mask covering bits [start_bit, end_bit], both inclusive
pub const fn bit_range_mask(start_bit: u8, end_bit: u8) -> u8 {
    if start_bit > end_bit || end_bit > 7 {
        return 0;
    }
    (((1u16 << (end_bit + 1)) - 1) ^ ((1u16 << start_bit) - 1)) as u8
}

impl PixelFormat for Monochrome {
    type Buffer = u8;
    type Color = BinaryColor;

    const FORMAT: Format = Format::Monochrome;
    const BITS_PER_PIXEL: u8 = 1;
    const FOREGROUND_DEFAULT: BinaryColor = BinaryColor::On;
    const BACKGROUND_DEFAULT: BinaryColor = BinaryColor::Off;

    fn buffer_len(width: usize, height: usize) -> usize {
        width * Self::pages(height)
    }

    fn from_rgb(r: u8, g: u8, b: u8) -> BinaryColor {
        if r.max(g).max(b) >= 0x80 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    fn set_pixel(buffer: &[Cell<u8>], stride: Pixel, x: Pixel, y: Pixel, color: BinaryColor) {
        if y < 0 {
            return;
        }
        let page = y / Self::PAGE_HEIGHT;
        let bit = 1u8 << (y % Self::PAGE_HEIGHT);

        if let Some(cell) = cell_at(buffer, stride, x, page) {
            let byte = cell.get();
            cell.set(if color == BinaryColor::On { byte | bit } else { byte & !bit });
        }
    }

    fn get_pixel(buffer: &[Cell<u8>], stride: Pixel, x: Pixel, y: Pixel) -> Option<BinaryColor> {
        if y < 0 {
            return None;
        }
        let bit = 1u8 << (y % Self::PAGE_HEIGHT);
        let byte = cell_at(buffer, stride, x, y / Self::PAGE_HEIGHT)?.get();
        Some(if byte & bit != 0 { BinaryColor::On } else { BinaryColor::Off })
    }

    fn fill(
        buffer: &[Cell<u8>],
        stride: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
        width: Pixel,
        height: Pixel,
        color: BinaryColor,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }

        let top = offset_y.max(0);
        let bottom = offset_y.saturating_add(height);
        if top >= bottom {
            return;
        }

        let pages = Pixel::try_from(buffer.len()).unwrap_or(Pixel::MAX) / stride.max(1);
        let start_page = top / Self::PAGE_HEIGHT;
        let end_page = (bottom.saturating_add(Self::PAGE_HEIGHT - 1) / Self::PAGE_HEIGHT).min(pages);
        let x_start = offset_x.max(0);
        let x_end = offset_x.saturating_add(width).min(stride);
        let fill_byte = if color == BinaryColor::On { 0xFF } else { 0x00 };

        for page in start_page..end_page {
            let mask = Self::page_mask(page, offset_y, height);
            if mask == 0 {
                continue;
            }

            for x in x_start..x_end {
                Self::write_masked(buffer, stride, x, page, mask, fill_byte);
            }
        }
    }

    fn copy(
        source: &[u8],
        source_width: Pixel,
        source_height: Pixel,
        dest: &[Cell<u8>],
        dest_stride: Pixel,
        window: Window,
        dest_x: Pixel,
        dest_y: Pixel,
    ) {
        let Some(((col_start, col_end), (row_start, row_end))) =
            visible_span(source_width, source_height, dest_stride, window, dest_x, dest_y)
        else {
            return;
        };

        let first_page = row_start / Self::PAGE_HEIGHT;
        let end_page = row_end.saturating_add(Self::PAGE_HEIGHT - 1) / Self::PAGE_HEIGHT;

        for source_page in first_page..end_page {
            let page_top = source_page * Self::PAGE_HEIGHT;
            let first_row = page_top.max(row_start);
            let last_row = page_top.saturating_add(Self::PAGE_HEIGHT).min(row_end);
            if first_row >= last_row {
                continue;
            }

            let rows = (last_row - first_row) as u32;
            let source_shift = (first_row - page_top) as u32;

            // rows land at dest_row.. which may straddle two destination pages
            let dest_row = dest_y + first_row;
            let dest_page = dest_row / Self::PAGE_HEIGHT;
            let dest_shift = (dest_row % Self::PAGE_HEIGHT) as u32;

            let row_bits = (1u16 << rows) - 1;
            let dest_mask = row_bits << dest_shift;

            for col in col_start..col_end {
                let Some(&source_byte) = source.get((source_page * source_width + col) as usize) else {
                    continue;
                };

                let bits = ((u16::from(source_byte) >> source_shift) & row_bits) << dest_shift;
                let x = dest_x + col;

                Self::write_masked(dest, dest_stride, x, dest_page, dest_mask as u8, bits as u8);
                Self::write_masked(
                    dest,
                    dest_stride,
                    x,
                    dest_page + 1,
                    (dest_mask >> 8) as u8,
                    (bits >> 8) as u8,
                );
            }
        }
    }
}

/// 16 bits per pixel, row-major, big-endian wire order (ST7735 style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb565Format;

impl PixelFormat for Rgb565Format {
    type Buffer = u16;
    type Color = Rgb565;

    const FORMAT: Format = Format::Rgb565;
    const BITS_PER_PIXEL: u8 = 16;
    const FOREGROUND_DEFAULT: Rgb565 = <Rgb565 as RgbColor>::WHITE;
    const BACKGROUND_DEFAULT: Rgb565 = <Rgb565 as RgbColor>::BLACK;

    fn buffer_len(width: usize, height: usize) -> usize {
        width * height
    }

    fn from_rgb(r: u8, g: u8, b: u8) -> Rgb565 {
        Rgb565::new(r >> 3, g >> 2, b >> 3)
    }

    fn set_pixel(buffer: &[Cell<u16>], stride: Pixel, x: Pixel, y: Pixel, color: Rgb565) {
        if let Some(cell) = cell_at(buffer, stride, x, y) {
            cell.set(encode_rgb565(color));
        }
    }

    fn get_pixel(buffer: &[Cell<u16>], stride: Pixel, x: Pixel, y: Pixel) -> Option<Rgb565> {
        cell_at(buffer, stride, x, y).map(|cell| decode_rgb565(cell.get()))
    }

    fn fill(
        buffer: &[Cell<u16>],
        stride: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
        width: Pixel,
        height: Pixel,
        color: Rgb565,
    ) {
        let raw = encode_rgb565(color);
        let x_start = offset_x.max(0);
        let x_end = offset_x.saturating_add(width).min(stride);
        let rows = Pixel::try_from(buffer.len()).unwrap_or(Pixel::MAX) / stride.max(1);

        for y in offset_y.max(0)..offset_y.saturating_add(height).min(rows) {
            for x in x_start..x_end {
                if let Some(cell) = cell_at(buffer, stride, x, y) {
                    cell.set(raw);
                }
            }
        }
    }

    fn copy(
        source: &[u16],
        source_width: Pixel,
        source_height: Pixel,
        dest: &[Cell<u16>],
        dest_stride: Pixel,
        window: Window,
        dest_x: Pixel,
        dest_y: Pixel,
    ) {
        let Some(((col_start, col_end), (row_start, row_end))) =
            visible_span(source_width, source_height, dest_stride, window, dest_x, dest_y)
        else {
            return;
        };

        for row in row_start..row_end {
            let source_row = (row * source_width) as usize;
            for col in col_start..col_end {
                let Some(&value) = source.get(source_row + col as usize) else {
                    break;
                };
                if let Some(cell) = cell_at(dest, dest_stride, dest_x + col, dest_y + row) {
                    cell.set(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells<T>(buffer: &mut [T]) -> &[Cell<T>] {
        Cell::from_mut(buffer).as_slice_of_cells()
    }

    #[test_log::test]
    fn bit_range_mask_covers_inclusive_range() {
        assert_eq!(bit_range_mask(0, 7), 0xFF);
        assert_eq!(bit_range_mask(5, 7), 0b1110_0000);
        assert_eq!(bit_range_mask(0, 0), 0b0000_0001);
        assert_eq!(bit_range_mask(2, 4), 0b0001_1100);
        assert_eq!(bit_range_mask(4, 2), 0);
    }

    #[test_log::test]
    fn page_mask_clips_to_target_rows() {
        // rows [5, 15) touch page 0 bits 5..7 and page 1 bits 0..6
        assert_eq!(Monochrome::page_mask(0, 5, 10), 0b1110_0000);
        assert_eq!(Monochrome::page_mask(1, 5, 10), 0b0111_1111);
        assert_eq!(Monochrome::page_mask(2, 5, 10), 0);
        assert_eq!(Monochrome::page_mask(1, 8, 8), 0xFF);
    }

    #[test_log::test]
    fn mono_set_pixel_touches_one_bit() {
        let mut raw = [0b1010_1010u8; 4 * 2];
        let buffer = cells(&mut raw);

        Monochrome::set_pixel(buffer, 4, 1, 0, BinaryColor::On);
        Monochrome::set_pixel(buffer, 4, 2, 9, BinaryColor::Off);

        assert_eq!(raw[1], 0b1010_1011);
        assert_eq!(raw[4 + 2], 0b1010_1000);
        assert_eq!(raw[0], 0b1010_1010);
    }

    #[test_log::test]
    fn mono_fill_preserves_bits_outside_rows() {
        let sentinel = 0b0101_1010u8;
        let mut raw = [sentinel; 3 * 3];
        let buffer = cells(&mut raw);

        Monochrome::fill(buffer, 3, 1, 5, 1, 10, BinaryColor::On);

        // column 1 only, page 0 rows 5..7, page 1 rows 0..6
        assert_eq!(raw[1], (sentinel & !0b1110_0000) | 0b1110_0000);
        assert_eq!(raw[3 + 1], (sentinel & !0b0111_1111) | 0b0111_1111);
        assert_eq!(raw[6 + 1], sentinel);
        for (i, &b) in raw.iter().enumerate() {
            if i % 3 != 1 {
                assert_eq!(b, sentinel, "byte {i} changed");
            }
        }
    }

    #[test_log::test]
    fn mono_fill_skips_columns_past_stride() {
        let mut raw = [0u8; 4];
        Monochrome::fill(cells(&mut raw), 4, 2, 0, 10, 8, BinaryColor::On);
        assert_eq!(raw, [0, 0, 0xFF, 0xFF]);
    }

    #[test_log::test]
    fn mono_copy_aligned_page() {
        let source = [0x81u8, 0x42, 0x24];
        let mut raw = [0u8; 8 * 2];
        let dest = cells(&mut raw);

        Monochrome::copy(&source, 3, 8, dest, 8, Window::new(0, 0, 8, 16), 2, 8);

        assert_eq!(&raw[8 + 2..8 + 5], &source);
        assert!(raw[..8].iter().all(|&b| b == 0));
    }

    #[test_log::test]
    fn mono_copy_straddles_pages_without_loss() {
        let source = [0xFFu8, 0xA5];
        let mut raw = [0u8; 2 * 3];
        let dest = cells(&mut raw);

        Monochrome::copy(&source, 2, 8, dest, 2, Window::new(0, 0, 2, 24), 0, 3);

        assert_eq!(raw[0], 0xF8);
        assert_eq!(raw[2], 0x07);
        assert_eq!(raw[1], 0xA5 << 3);
        assert_eq!(raw[3], 0xA5 >> 5);
        assert_eq!(raw[4], 0);
        assert_eq!(raw[5], 0);
    }

    #[test_log::test]
    fn mono_copy_respects_window() {
        let source = [0xFFu8; 4];
        let mut raw = [0u8; 4];
        let dest = cells(&mut raw);

        Monochrome::copy(&source, 4, 8, dest, 4, Window::new(1, 2, 2, 3), -1, 0);

        // columns 1..3 of dest, rows 2..5
        assert_eq!(raw, [0, 0b0001_1100, 0b0001_1100, 0]);
    }

    #[test_log::test]
    fn rgb565_fill_and_copy_clip_to_window() {
        let mut raw = [0u16; 4 * 3];
        let dest = cells(&mut raw);
        let red = <Rgb565 as RgbColor>::RED;

        Rgb565Format::fill(dest, 4, 3, 1, 5, 5, red);
        assert_eq!(decode_rgb565(raw[4 + 3]), red);
        assert_eq!(raw[4 + 2], 0);

        let source = [1u16, 2, 3, 4];
        let dest = cells(&mut raw);
        Rgb565Format::copy(&source, 2, 2, dest, 4, Window::new(0, 0, 4, 3), -1, 2);
        assert_eq!(raw[8], 2);
        assert_eq!(raw[9], 0);
    }

    #[test_log::test]
    fn extreme_offsets_are_clipped() {
        let mut raw = [0u8; 4 * 2];
        let mono = cells(&mut raw);
        let everything = Window::new(0, 0, Pixel::MAX, Pixel::MAX);
        let (min, max) = (Pixel::MIN, Pixel::MAX);

        Monochrome::fill(mono, 4, max - 1, max - 1, max, max, BinaryColor::On);
        Monochrome::fill(mono, 4, min, 0, max, max, BinaryColor::On);
        Monochrome::copy(&[0xFF; 4], 4, 8, mono, 4, everything, min, max);
        Monochrome::copy(&[0xFF; 4], 4, 8, mono, 4, Window::new(max, 0, 4, 16), min, 0);
        Monochrome::copy(&[0xFF; 4], 4, max, mono, 4, everything, 0, min);
        assert_eq!(raw, [0; 8]);

        let mut raw = [0u16; 4 * 2];
        let rgb = cells(&mut raw);
        Rgb565Format::fill(rgb, 4, max - 1, 0, 10, max, <Rgb565 as RgbColor>::RED);
        Rgb565Format::copy(&[1; 4], 2, 2, rgb, 4, everything, max, min);
        assert_eq!(raw, [0; 8]);
    }

    #[test_log::test]
    fn buffer_len_counts_pages() {
        assert_eq!(Monochrome::buffer_len(128, 64), 1024);
        assert_eq!(Monochrome::buffer_len(10, 9), 20);
        assert_eq!(Rgb565Format::buffer_len(160, 128), 160 * 128);
    }
}
