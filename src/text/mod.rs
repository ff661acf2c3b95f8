//! Fonts and text sanitizing
//!
//! Fonts are located and loaded once per composer; per-draw calls only
//! measure and rasterize.

pub mod font;
pub mod sanitize;

pub use font::{Font, FontCache, FontRole, FontSet};
pub use sanitize::sanitize;
