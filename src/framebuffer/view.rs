//! Region views over a shared framebuffer
use core::cell::Cell;
use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    primitives::Rectangle,
    Pixel as EgPixel,
};

use crate::framebuffer::format::{Pixel, PixelFormat, Window};

/// Reasons a region view cannot be built
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// Backing buffer is empty
    #[error("frame buffer is not initialized")]
    BufferNotInit,

    /// Width or height is below one pixel
    #[error("region must be at least 1x1 pixels")]
    SizeTooSmall,

    /// Sub-region does not fit in the parent's remaining extent
    #[error("sub-region exceeds parent bounds")]
    SizeTooLarge,

    /// Sub-region origin lies outside the parent
    #[error("sub-region offset falls outside parent region")]
    OffsetOutOfBounds,
}

/// Rectangular window into a framebuffer it does not own
///
/// Views are cheap `Copy` values. Several views may alias the same storage;
/// the cells make writes through any of them visible to all, and keep the
/// whole family on one thread.
#[derive(Debug)]
pub struct RegionView<'a, F: PixelFormat> {
    buffer: &'a [Cell<F::Buffer>],
    stride: Pixel,
    offset_x: Pixel,
    offset_y: Pixel,
    width: Pixel,
    height: Pixel,
}

impl<F: PixelFormat> Clone for RegionView<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: PixelFormat> Copy for RegionView<'_, F> {}

impl<'a, F: PixelFormat> RegionView<'a, F> {
    /// Build a validated view
    pub fn new(
        buffer: &'a [Cell<F::Buffer>],
        stride: Pixel,
        width: Pixel,
        height: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
    ) -> Result<Self, RegionError> {
        if buffer.is_empty() {
            log::debug!("region rejected: empty buffer");
            return Err(RegionError::BufferNotInit);
        }

        if width < 1 || height < 1 {
            log::debug!("region rejected: {}x{} is too small", width, height);
            return Err(RegionError::SizeTooSmall);
        }

        Ok(Self::new_unchecked(buffer, stride, width, height, offset_x, offset_y))
    }

    /// View covering a whole framebuffer of `width` x `height` pixels
    pub fn from_slice(
        buffer: &'a mut [F::Buffer],
        stride: Pixel,
        width: Pixel,
        height: Pixel,
    ) -> Result<Self, RegionError> {
        Self::new(Cell::from_mut(buffer).as_slice_of_cells(), stride, width, height, 0, 0)
    }

    /// Build a view without validation.
    ///
    /// Drawing through a degenerate view is harmless (every write is
    /// clipped away), so this is safe, just unchecked.
    pub const fn new_unchecked(
        buffer: &'a [Cell<F::Buffer>],
        stride: Pixel,
        width: Pixel,
        height: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
    ) -> Self {
        Self {
            buffer,
            stride,
            offset_x,
            offset_y,
            width,
            height,
        }
    }

    /// Validated sub-region; offsets are relative to this view
    pub fn sub(
        &self,
        width: Pixel,
        height: Pixel,
        offset_x: Pixel,
        offset_y: Pixel,
    ) -> Result<Self, RegionError> {
        if offset_x < 0 || offset_y < 0 || offset_x >= self.width || offset_y >= self.height {
            log::debug!(
                "sub-region rejected: offset ({}, {}) outside {}x{}",
                offset_x,
                offset_y,
                self.width,
                self.height
            );
            return Err(RegionError::OffsetOutOfBounds);
        }

        if width > self.width - offset_x || height > self.height - offset_y {
            log::debug!(
                "sub-region rejected: {}x{} at ({}, {}) exceeds {}x{}",
                width,
                height,
                offset_x,
                offset_y,
                self.width,
                self.height
            );
            return Err(RegionError::SizeTooLarge);
        }

        Self::new(
            self.buffer,
            self.stride,
            width,
            height,
            self.offset_x + offset_x,
            self.offset_y + offset_y,
        )
    }

    /// Sub-region without bounds checks
    pub const fn sub_unchecked(&self, width: Pixel, height: Pixel, offset_x: Pixel, offset_y: Pixel) -> Self {
        Self::new_unchecked(
            self.buffer,
            self.stride,
            width,
            height,
            self.offset_x.saturating_add(offset_x),
            self.offset_y.saturating_add(offset_y),
        )
    }

    pub const fn width(&self) -> Pixel {
        self.width
    }

    pub const fn height(&self) -> Pixel {
        self.height
    }

    pub const fn stride(&self) -> Pixel {
        self.stride
    }

    /// Absolute origin inside the framebuffer
    pub const fn offset(&self) -> (Pixel, Pixel) {
        (self.offset_x, self.offset_y)
    }

    /// Absolute rectangle covered by this view
    pub const fn window(&self) -> Window {
        Window::new(self.offset_x, self.offset_y, self.width, self.height)
    }

    /// Backing storage, e.g. for handing a finished frame to the transport
    pub const fn buffer(&self) -> &'a [Cell<F::Buffer>] {
        self.buffer
    }

    pub const fn is_inside_x(&self, x: Pixel) -> bool {
        x >= 0 && x < self.width
    }

    pub const fn is_inside_y(&self, y: Pixel) -> bool {
        y >= 0 && y < self.height
    }

    pub const fn is_inside(&self, x: Pixel, y: Pixel) -> bool {
        self.is_inside_x(x) && self.is_inside_y(y)
    }

    /// Set one pixel; coordinates outside the view are ignored
    #[inline]
    pub fn set_pixel(&self, x: Pixel, y: Pixel, color: F::Color) {
        if self.is_inside(x, y) {
            F::set_pixel(
                self.buffer,
                self.stride,
                self.offset_x.saturating_add(x),
                self.offset_y.saturating_add(y),
                color,
            );
        }
    }

    /// Read one pixel relative to the view origin
    pub fn get_pixel(&self, x: Pixel, y: Pixel) -> Option<F::Color> {
        if !self.is_inside(x, y) {
            return None;
        }
        F::get_pixel(
            self.buffer,
            self.stride,
            self.offset_x.saturating_add(x),
            self.offset_y.saturating_add(y),
        )
    }

    /// Fill the whole view
    pub fn fill(&self, color: F::Color) {
        F::fill(
            self.buffer,
            self.stride,
            self.offset_x,
            self.offset_y,
            self.width,
            self.height,
            color,
        );
    }

    /// Fill the rectangle with inclusive corners (x0, y0) and (x1, y1),
    /// clipped to the view. Corners must already be ordered.
    pub fn fill_area(&self, x0: Pixel, y0: Pixel, x1: Pixel, y1: Pixel, color: F::Color) {
        let left = x0.max(0);
        let top = y0.max(0);
        let right = x1.min(self.width - 1);
        let bottom = y1.min(self.height - 1);

        if left > right || top > bottom {
            return;
        }

        F::fill(
            self.buffer,
            self.stride,
            self.offset_x.saturating_add(left),
            self.offset_y.saturating_add(top),
            right - left + 1,
            bottom - top + 1,
            color,
        );
    }

    /// Blit a packed image with its top-left corner at (x, y)
    pub fn copy_from(&self, source: &[F::Buffer], source_width: Pixel, source_height: Pixel, x: Pixel, y: Pixel) {
        F::copy(
            source,
            source_width,
            source_height,
            self.buffer,
            self.stride,
            self.window(),
            self.offset_x.saturating_add(x),
            self.offset_y.saturating_add(y),
        );
    }
}

impl<F: PixelFormat> OriginDimensions for RegionView<'_, F> {
    fn size(&self) -> Size {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }
}

impl<F: PixelFormat> DrawTarget for RegionView<'_, F> {
    type Color = F::Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = EgPixel<Self::Color>>,
    {
        for EgPixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        if let Some(bottom_right) = area.bottom_right() {
            self.fill_area(area.top_left.x, area.top_left.y, bottom_right.x, bottom_right.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
