//! Immutable pre-encoded bitmaps
use core::marker::PhantomData;

use crate::framebuffer::format::{Pixel, PixelFormat};

/// Bitmap already packed in the storage layout of format `F`
///
/// Monochrome images are page addressed with a stride equal to their width,
/// RGB565 images are row-major with big-endian elements.
#[derive(Debug)]
pub struct StaticImage<F: PixelFormat> {
    data: &'static [F::Buffer],
    width: Pixel,
    height: Pixel,
    _format: PhantomData<F>,
}

impl<F: PixelFormat> Clone for StaticImage<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: PixelFormat> Copy for StaticImage<F> {}

impl<F: PixelFormat> StaticImage<F> {
    pub const fn new(data: &'static [F::Buffer], width: Pixel, height: Pixel) -> Self {
        Self {
            data,
            width,
            height,
            _format: PhantomData,
        }
    }

    pub const fn data(&self) -> &'static [F::Buffer] {
        self.data
    }

    pub const fn width(&self) -> Pixel {
        self.width
    }

    pub const fn height(&self) -> Pixel {
        self.height
    }

    /// True when `data` holds at least `buffer_len(width, height)` elements
    pub fn is_complete(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() >= F::buffer_len(self.width as usize, self.height as usize)
    }
}
