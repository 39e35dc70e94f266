//! # User Interface Module
//!
//! Presentation defaults shared by every canvas of an application.
//!
//! ## Modules
//!
//! - `theme`: font, colors and wrapping applied by `Canvas::with_theme`

pub mod theme;
pub use theme::Theme;
