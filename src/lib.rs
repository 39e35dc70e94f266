//! # pagefb
//!
//! Allocation-free 2D rendering for small displays.
//!
//! Drawing commands (lines, rectangles, circles, images, styled text) are
//! turned into writes against a caller-owned framebuffer in one of two
//! encodings: page-addressed 1-bit monochrome (SSD1306 style) or linear
//! RGB565 (ST7735 style). Getting the finished buffer onto the panel is up
//! to the caller.
//!
//! ## Modules
//!
//! - `framebuffer`: pixel formats, palette, `RegionView`
//! - `gfx`: `Canvas`, fonts, images, the text engine
//! - `ui`: `Theme` presets

#![cfg_attr(not(test), no_std)]

pub mod framebuffer;
pub mod gfx;
pub mod ui;

pub use framebuffer::{Ansi, Format, Monochrome, Pixel, PixelFormat, RegionError, RegionView, Rgb565Format, Window};
pub use gfx::{fonts, Canvas, Font, StaticImage, TextCursor};
pub use ui::Theme;
