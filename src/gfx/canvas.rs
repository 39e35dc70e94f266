//! Drawing context over a region view
//!
//! A [`Canvas`] owns nothing but a [`RegionView`] plus the drawing state:
//! current font, foreground and background colors and the text wrap flag.
//! Every primitive resolves to `set_pixel` / `fill_area` / `copy_from` on the
//! view, so all output is clipped to the canvas rectangle.

use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    primitives::Rectangle,
    Pixel as EgPixel,
};

use crate::framebuffer::color::Ansi;
use crate::framebuffer::format::{Pixel, PixelFormat};
use crate::framebuffer::view::{RegionError, RegionView};
use crate::gfx::font::Font;
use crate::gfx::image::StaticImage;
use crate::gfx::text::TextCursor;
use crate::ui::theme::Theme;

/// Drawing and text context for format `F`
#[derive(Debug, Clone, Copy)]
pub struct Canvas<'a, F: PixelFormat> {
    view: RegionView<'a, F>,
    font: &'static Font,
    foreground: F::Color,
    background: F::Color,
    auto_next_line: bool,
}

impl<'a, F: PixelFormat> Canvas<'a, F> {
    /// Canvas with the blank font, bright white on black, no wrapping
    pub fn new(view: RegionView<'a, F>) -> Self {
        Self::with_theme(view, &Theme::default())
    }

    pub fn with_theme(view: RegionView<'a, F>, theme: &Theme<F>) -> Self {
        Self {
            view,
            font: theme.font,
            foreground: theme.foreground,
            background: theme.background,
            auto_next_line: theme.auto_next_line,
        }
    }

    pub fn with_colors(
        view: RegionView<'a, F>,
        font: &'static Font,
        foreground: F::Color,
        background: F::Color,
    ) -> Self {
        Self {
            view,
            font,
            foreground,
            background,
            auto_next_line: false,
        }
    }

    /// Sub-canvas that inherits font and colors. Offsets are relative.
    pub fn sub(&self, width: Pixel, height: Pixel, offset_x: Pixel, offset_y: Pixel) -> Result<Self, RegionError> {
        let view = self.view.sub(width, height, offset_x, offset_y)?;
        Ok(self.derive(view))
    }

    pub fn sub_unchecked(&self, width: Pixel, height: Pixel, offset_x: Pixel, offset_y: Pixel) -> Self {
        self.derive(self.view.sub_unchecked(width, height, offset_x, offset_y))
    }

    fn derive(&self, view: RegionView<'a, F>) -> Self {
        Self::with_colors(view, self.font, self.foreground, self.background)
    }

    /// Partition the canvas into `N` side by side (horizontal) or stacked
    /// canvases sized by `weights`.
    ///
    /// Zero weights count as 1. Each segment gets `extent * weight / total`
    /// pixels and the last one takes whatever is left, so the segments tile
    /// the canvas exactly. A segment can come out zero-sized; drawing on it
    /// does nothing.
    pub fn split<const N: usize>(&self, mut weights: [usize; N], horizontal: bool) -> [Self; N] {
        for weight in weights.iter_mut().filter(|w| **w == 0) {
            log::debug!("split: zero weight promoted to 1");
            *weight = 1;
        }

        let total = weights.iter().fold(0u64, |acc, &w| acc.saturating_add(w as u64));
        let extent = (if horizontal { self.width() } else { self.height() }).max(0);
        let mut offset: Pixel = 0;

        core::array::from_fn(|i| {
            let size = if i + 1 == N {
                extent - offset
            } else {
                (u64::from(extent as u32).saturating_mul(weights[i] as u64) / total) as Pixel
            };

            log::trace!("split: segment {} at {} size {}", i, offset, size);

            let segment = if horizontal {
                self.sub_unchecked(size, self.height(), offset, 0)
            } else {
                self.sub_unchecked(self.width(), size, 0, offset)
            };
            offset += size;
            segment
        })
    }

    // Geometry

    pub const fn width(&self) -> Pixel {
        self.view.width()
    }

    pub const fn height(&self) -> Pixel {
        self.view.height()
    }

    /// Rightmost column
    pub const fn max_x(&self) -> Pixel {
        self.width() - 1
    }

    /// Bottom row
    pub const fn max_y(&self) -> Pixel {
        self.height() - 1
    }

    pub const fn center_x(&self) -> Pixel {
        self.max_x() / 2
    }

    pub const fn center_y(&self) -> Pixel {
        self.max_y() / 2
    }

    /// Four glyph advances
    pub const fn tab_width(&self) -> Pixel {
        self.glyph_width() * 4
    }

    pub const fn width_in_glyphs(&self) -> Pixel {
        self.width() / self.glyph_width()
    }

    pub const fn height_in_glyphs(&self) -> Pixel {
        self.height() / self.glyph_height()
    }

    /// Horizontal advance per glyph, gap included
    pub const fn glyph_width(&self) -> Pixel {
        self.font.width_total() as Pixel
    }

    /// Line height, gap included
    pub const fn glyph_height(&self) -> Pixel {
        self.font.height_total() as Pixel
    }

    pub const fn view(&self) -> &RegionView<'a, F> {
        &self.view
    }

    // State

    pub const fn font(&self) -> &'static Font {
        self.font
    }

    pub fn set_font(&mut self, font: &'static Font) {
        self.font = font;
    }

    pub fn foreground(&self) -> F::Color {
        self.foreground
    }

    pub fn set_foreground(&mut self, color: F::Color) {
        self.foreground = color;
    }

    pub fn background(&self) -> F::Color {
        self.background
    }

    pub fn set_background(&mut self, color: F::Color) {
        self.background = color;
    }

    /// Set the foreground from the palette
    pub fn set_foreground_ansi(&mut self, color: Ansi) {
        self.foreground = color.color::<F>();
    }

    /// Set the background from the palette
    pub fn set_background_ansi(&mut self, color: Ansi) {
        self.background = color.color::<F>();
    }

    pub fn swap_colors(&mut self) {
        core::mem::swap(&mut self.foreground, &mut self.background);
    }

    pub const fn auto_next_line(&self) -> bool {
        self.auto_next_line
    }

    /// Wrap text to the next row instead of stopping at the right edge
    pub fn set_auto_next_line(&mut self, enable: bool) {
        self.auto_next_line = enable;
    }

    // Drawing

    /// Fill the whole canvas with the background color
    pub fn fill(&self) {
        self.view.fill(self.background);
    }

    pub fn dot(&self, x: Pixel, y: Pixel) {
        self.view.set_pixel(x, y, self.foreground);
    }

    /// Blit `image` with its top-left corner at (x, y)
    pub fn image(&self, x: Pixel, y: Pixel, image: &StaticImage<F>) {
        self.view.copy_from(image.data(), image.width(), image.height(), x, y);
    }

    pub fn line(&self, x0: Pixel, y0: Pixel, x1: Pixel, y1: Pixel) {
        if x0 == x1 {
            self.vertical_span(x0, y0, y1, self.foreground);
        } else if y0 == y1 {
            self.horizontal_span(x0, y0, x1, self.foreground);
        } else {
            bresenham(x0, y0, x1, y1, self.width(), self.height(), |x, y| {
                self.view.set_pixel(x, y, self.foreground)
            });
        }
    }

    /// Rectangle with inclusive corners, in any order
    pub fn rect(&self, x0: Pixel, y0: Pixel, x1: Pixel, y1: Pixel, fill: bool) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));

        if fill {
            self.view.fill_area(left, top, right, bottom, self.foreground);
            return;
        }

        self.horizontal_span(left, top, right, self.foreground);
        self.horizontal_span(left, bottom, right, self.foreground);
        if bottom.abs_diff(top) > 1 {
            self.vertical_span(left, top + 1, bottom - 1, self.foreground);
            self.vertical_span(right, top + 1, bottom - 1, self.foreground);
        }
    }

    /// Circle of radius `r` around (cx, cy); negative radii draw nothing
    pub fn circle(&self, cx: Pixel, cy: Pixel, r: Pixel, fill: bool) {
        if r < 0 {
            return;
        }

        if fill {
            let r_squared = f64::from(r) * f64::from(r);
            // only rows that land inside the view
            let first = (-r).max(0i32.saturating_sub(cy));
            let last = r.min(self.max_y().saturating_sub(cy));
            for y in first..=last {
                let half = libm::sqrt(r_squared - f64::from(y) * f64::from(y)) as Pixel;
                self.view.fill_area(
                    cx.saturating_sub(half),
                    cy + y,
                    cx.saturating_add(half),
                    cy + y,
                    self.foreground,
                );
            }
            return;
        }

        // err tracks x^2 + y^2 - r^2
        let mut x = r;
        let mut y = 0;
        let mut err: i64 = 0;

        while x >= y {
            self.circle_points(cx, cy, x, y);
            if x != y {
                self.circle_points(cx, cy, y, x);
            }

            y += 1;
            err += 2 * i64::from(y) - 1;
            if err > 0 {
                x -= 1;
                err -= 2 * i64::from(x) + 1;
            }
        }
    }

    /// Render `text` starting at (x, y), see [`TextCursor`]
    pub fn text(&self, x: Pixel, y: Pixel, text: &[u8]) {
        self.cursor(x, y).write_bytes(text);
    }

    /// Text cursor at (x, y) for incremental or formatted output
    pub fn cursor(&self, x: Pixel, y: Pixel) -> TextCursor<'_, 'a, F> {
        TextCursor::new(self, x, y)
    }

    // Backends shared with the text engine

    pub(crate) fn horizontal_span(&self, x0: Pixel, y: Pixel, x1: Pixel, color: F::Color) {
        self.view.fill_area(x0.min(x1), y, x0.max(x1), y, color);
    }

    pub(crate) fn vertical_span(&self, x: Pixel, y0: Pixel, y1: Pixel, color: F::Color) {
        self.view.fill_area(x, y0.min(y1), x, y0.max(y1), color);
    }

    fn circle_points(&self, cx: Pixel, cy: Pixel, dx: Pixel, dy: Pixel) {
        let color = self.foreground;
        let (left, right) = (cx.saturating_sub(dx), cx.saturating_add(dx));
        let (top, bottom) = (cy.saturating_sub(dy), cy.saturating_add(dy));
        self.view.set_pixel(right, bottom, color);
        self.view.set_pixel(left, bottom, color);
        self.view.set_pixel(left, top, color);
        self.view.set_pixel(right, top, color);
    }
}

/// Integer Bresenham line from (x0, y0) to (x1, y1), both ends included,
/// limited to the steps whose major-axis coordinate lies in
/// `[0, width) x [0, height)`.
///
/// Step `k` along the major axis moves the minor axis by
/// `(2 * minor * k + major) / (2 * major)`, the same pixels the error walk
/// visits, so far off-screen endpoints cost nothing.
fn bresenham(
    x0: Pixel,
    y0: Pixel,
    x1: Pixel,
    y1: Pixel,
    width: Pixel,
    height: Pixel,
    mut plot: impl FnMut(Pixel, Pixel),
) {
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let x_major = dx >= dy;
    let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
    let (origin, step, limit) = if x_major {
        (x0, sx, i64::from(width))
    } else {
        (y0, sy, i64::from(height))
    };

    let (k_min, k_max) = if step > 0 {
        (-origin, limit - 1 - origin)
    } else {
        (origin - (limit - 1), origin)
    };

    for k in k_min.max(0)..=k_max.min(major) {
        let offset = if major == 0 {
            0
        } else {
            ((2 * i128::from(minor) * i128::from(k) + i128::from(major)) / (2 * i128::from(major))) as i64
        };

        let (x, y) = if x_major {
            (x0 + sx * k, y0 + sy * offset)
        } else {
            (x0 + sx * offset, y0 + sy * k)
        };

        if let (Ok(x), Ok(y)) = (Pixel::try_from(x), Pixel::try_from(y)) {
            plot(x, y);
        }
    }
}

impl<F: PixelFormat> OriginDimensions for Canvas<'_, F> {
    fn size(&self) -> Size {
        self.view.size()
    }
}

impl<F: PixelFormat> DrawTarget for Canvas<'_, F> {
    type Color = F::Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = EgPixel<Self::Color>>,
    {
        self.view.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.view.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.view.clear(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::format::Monochrome;
    use embedded_graphics_core::pixelcolor::BinaryColor;

    const W: Pixel = 32;
    const H: Pixel = 32;

    fn lit(canvas: &Canvas<'_, Monochrome>) -> Vec<(Pixel, Pixel)> {
        let mut points = Vec::new();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.view().get_pixel(x, y) == Some(BinaryColor::On) {
                    points.push((x, y));
                }
            }
        }
        points
    }

    fn bresenham_points(x0: Pixel, y0: Pixel, x1: Pixel, y1: Pixel) -> Vec<(Pixel, Pixel)> {
        let mut points = Vec::new();
        bresenham(x0, y0, x1, y1, Pixel::MAX, Pixel::MAX, |x, y| points.push((x, y)));
        points.sort_by_key(|&(x, y)| (y, x));
        points
    }

    /// Classic error-term walk, stepping one pixel at a time
    fn error_walk(mut x0: Pixel, mut y0: Pixel, x1: Pixel, y1: Pixel) -> Vec<(Pixel, Pixel)> {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut points = Vec::new();

        loop {
            points.push((x0, y0));
            if x0 == x1 && y0 == y1 {
                break;
            }
            let double_err = 2 * err;
            if double_err >= dy {
                if x0 == x1 {
                    break;
                }
                err += dy;
                x0 += sx;
            }
            if double_err <= dx {
                if y0 == y1 {
                    break;
                }
                err += dx;
                y0 += sy;
            }
        }
        points.sort_by_key(|&(x, y)| (y, x));
        points
    }

    #[test_log::test]
    fn split_tiles_extent_by_weight() {
        let mut raw = [0u8; 10];
        let root = RegionView::<Monochrome>::from_slice(&mut raw, 10, 10, 8).unwrap();
        let canvas = Canvas::new(root);

        let parts = canvas.split([1, 1, 1], true);
        let widths: Vec<_> = parts.iter().map(|c| c.width()).collect();
        let offsets: Vec<_> = parts.iter().map(|c| c.view().offset().0).collect();

        assert_eq!(widths, [3, 3, 4]);
        assert_eq!(offsets, [0, 3, 6]);
        assert!(parts.iter().all(|c| c.height() == 8));
    }

    #[test_log::test]
    fn split_promotes_zero_weights_and_stacks_vertically() {
        let mut raw = [0u8; 4 * 2];
        let root = RegionView::<Monochrome>::from_slice(&mut raw, 4, 4, 16).unwrap();
        let canvas = Canvas::new(root);

        let [top, bottom] = canvas.split([0, 3], false);
        assert_eq!((top.height(), top.view().offset()), (4, (0, 0)));
        assert_eq!((bottom.height(), bottom.view().offset()), (12, (0, 4)));
    }

    #[test_log::test]
    fn straight_lines_match_bresenham() {
        let cases = [(2, 5, 20, 5), (20, 5, 2, 5), (7, 1, 7, 30), (7, 30, 7, 1), (4, 4, 4, 4)];

        for (x0, y0, x1, y1) in cases {
            let mut raw = [0u8; (W * H / 8) as usize];
            let canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, W, W, H).unwrap());
            canvas.line(x0, y0, x1, y1);
            assert_eq!(lit(&canvas), bresenham_points(x0, y0, x1, y1), "line {x0},{y0} -> {x1},{y1}");
        }
    }

    #[test_log::test]
    fn stepped_line_matches_error_walk_in_every_octant() {
        for x1 in 0..=12 {
            for y1 in 0..=12 {
                let ends = [(6, 6, x1, y1), (x1, y1, 6, 6), (0, 12, x1, y1), (12, 0, x1, y1)];
                for (x0, y0, x1, y1) in ends {
                    assert_eq!(
                        bresenham_points(x0, y0, x1, y1),
                        error_walk(x0, y0, x1, y1),
                        "line {x0},{y0} -> {x1},{y1}"
                    );
                }
            }
        }
    }

    #[test_log::test]
    fn far_off_screen_endpoints_are_clipped() {
        let mut raw = [0u8; (W * H / 8) as usize];
        let canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, W, W, H).unwrap());

        canvas.line(-2_000_000_000, 1, 2_000_000_000, 5);
        let expected: Vec<_> = (0..W).map(|x| (x, 3)).collect();
        assert_eq!(lit(&canvas), expected);

        canvas.line(Pixel::MIN, Pixel::MIN, Pixel::MAX, Pixel::MAX - 1);
        canvas.rect(Pixel::MIN, Pixel::MIN, Pixel::MAX, Pixel::MAX, false);
        canvas.circle(Pixel::MAX, Pixel::MIN, Pixel::MAX, true);
        canvas.circle(Pixel::MIN, 0, 3, false);
    }

    #[test_log::test]
    fn palette_setters_convert_to_format() {
        let mut raw = [0u8; 8];
        let mut canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, 8, 8, 8).unwrap());
        canvas.set_foreground_ansi(Ansi::BlackBright);
        canvas.set_background_ansi(Ansi::Yellow);
        assert_eq!((canvas.foreground(), canvas.background()), (BinaryColor::Off, BinaryColor::On));
    }

    #[test_log::test]
    fn diagonal_line_hits_both_ends() {
        let mut raw = [0u8; (W * H / 8) as usize];
        let canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, W, W, H).unwrap());
        canvas.line(1, 2, 9, 5);

        let points = lit(&canvas);
        assert!(points.contains(&(1, 2)));
        assert!(points.contains(&(9, 5)));
        assert_eq!(points.len(), 9);
    }

    #[test_log::test]
    fn circle_outline_lies_inside_fill() {
        for r in 0..=9 {
            let mut outline_raw = [0u8; (W * H / 8) as usize];
            let mut fill_raw = [0u8; (W * H / 8) as usize];
            let outline = Canvas::new(RegionView::<Monochrome>::from_slice(&mut outline_raw, W, W, H).unwrap());
            let filled = Canvas::new(RegionView::<Monochrome>::from_slice(&mut fill_raw, W, W, H).unwrap());

            outline.circle(15, 15, r, false);
            filled.circle(15, 15, r, true);

            let inside = lit(&filled);
            for point in lit(&outline) {
                assert!(inside.contains(&point), "r={r}: {point:?} not covered by fill");
            }
        }
    }

    #[test_log::test]
    fn negative_radius_draws_nothing() {
        let mut raw = [0u8; 8];
        let canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, 8, 8, 8).unwrap());
        canvas.circle(4, 4, -1, true);
        canvas.circle(4, 4, -1, false);
        assert_eq!(raw, [0; 8]);
    }

    #[test_log::test]
    fn rect_outline_is_closed_and_hollow() {
        let mut raw = [0u8; 8];
        let canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, 8, 8, 8).unwrap());
        canvas.rect(5, 6, 1, 1, false);

        let points = lit(&canvas);
        assert_eq!(points.len(), 2 * 5 + 2 * 4);
        assert!(points.contains(&(1, 1)) && points.contains(&(5, 6)));
        assert!(!points.contains(&(3, 3)));
    }

    #[test_log::test]
    fn drawing_is_clipped_to_sub_canvas() {
        let mut raw = [0u8; 16];
        let root = RegionView::<Monochrome>::from_slice(&mut raw, 16, 16, 8).unwrap();
        let canvas = Canvas::new(root).sub(4, 4, 2, 2).unwrap();

        canvas.rect(-10, -10, 10, 10, true);

        let mut expected = [0u8; 16];
        expected[2..6].fill(0b0011_1100);
        assert_eq!(raw, expected);
    }

    #[test_log::test]
    fn geometry_follows_font() {
        let mut raw = [0u8; 128 * 8];
        let mut canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, 128, 128, 64).unwrap());
        canvas.set_font(&crate::gfx::font::fonts::FONT_5X7);

        assert_eq!((canvas.max_x(), canvas.max_y()), (127, 63));
        assert_eq!((canvas.center_x(), canvas.center_y()), (63, 31));
        assert_eq!((canvas.glyph_width(), canvas.glyph_height()), (6, 8));
        assert_eq!(canvas.tab_width(), 24);
        assert_eq!((canvas.width_in_glyphs(), canvas.height_in_glyphs()), (21, 8));
    }

    #[test_log::test]
    fn swap_colors_exchanges_fill_color() {
        let mut raw = [0u8; 8];
        let mut canvas = Canvas::new(RegionView::<Monochrome>::from_slice(&mut raw, 8, 8, 8).unwrap());
        canvas.swap_colors();
        assert_eq!(canvas.background(), BinaryColor::On);
        canvas.fill();
        assert_eq!(raw, [0xFF; 8]);
    }
}
