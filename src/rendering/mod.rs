//! Rendering module: geometry, drawing primitives and the raster target

pub mod layout;
pub mod paint;
pub mod raster;

pub use layout::{AgendaLayout, RankingLayout, Rect, RosterLayout};
