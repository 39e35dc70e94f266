//! # Graphics Module
//!
//! Drawing on top of a `RegionView`.
//!
//! ## Modules
//!
//! - `canvas`: `Canvas` with lines, rectangles, circles, images and layout
//! - `text`: control-byte text interpreter and `TextCursor`
//! - `font`: bitmap fonts and the built-in 5x7 font
//! - `image`: `StaticImage`, pre-encoded bitmaps for `Canvas::image`
//!
//! ## Example
//!
//! ```ignore
//! let mut buffer = [0u8; 128 * 8];
//! let view = RegionView::<Monochrome>::from_slice(&mut buffer, 128, 128, 64)?;
//! let canvas = Canvas::with_theme(view, &Theme::dark());
//!
//! let [left, right] = canvas.split([2, 1], true);
//! left.text(0, 0, b"\x81 menu \x80");
//! right.circle(right.center_x(), right.center_y(), 10, true);
//! ```

pub mod canvas;
pub mod font;
pub mod image;
pub mod text;

pub use canvas::Canvas;
pub use font::{fonts, Font};
pub use image::StaticImage;
pub use text::TextCursor;
