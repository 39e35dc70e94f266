//! # Framebuffer Module
//!
//! Raw pixel storage and the per-format primitives everything else is
//! built on.
//!
//! ## Modules
//!
//! - `format`: `PixelFormat` policies (`Monochrome`, `Rgb565Format`)
//! - `color`: ANSI palette and RGB565 wire encoding
//! - `view`: `RegionView`, a bounded window into a shared buffer
//!
//! ## Memory Layout
//!
//! Monochrome buffers are page addressed: the byte at `page * stride + x`
//! holds rows `page * 8 ..= page * 8 + 7` of column `x`, bit 0 on top.
//! RGB565 buffers are row-major, one big-endian `u16` per pixel at
//! `y * stride + x`.

pub mod color;
pub mod format;
pub mod view;

pub use color::Ansi;
pub use format::{Format, Monochrome, Pixel, PixelFormat, Rgb565Format, Window};
pub use view::{RegionError, RegionView};
