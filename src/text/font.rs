//! Font discovery, loading and the built-in fallback.

use ab_glyph::{Font as _, FontArc, PxScale};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_8X13, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::{Rgb, RgbImage};
use std::convert::Infallible;
use std::path::{Path, PathBuf};

use crate::Color;

/// Extensions recognized when scanning for a font file (compared lowercase)
pub const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Bitmap fonts used when no outline font is available, smallest first.
const BUILTIN_FONTS: [&MonoFont<'static>; 4] = [&FONT_6X10, &FONT_8X13, &FONT_9X15, &FONT_10X20];

/// A font loaded at a fixed size.
#[derive(Clone)]
pub enum Font {
    /// TrueType/OpenType outlines at `scale`
    Outline { font: FontArc, scale: PxScale },
    /// Monospaced ASCII bitmap font compiled into the crate
    Builtin(&'static MonoFont<'static>),
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Font::Outline { scale, .. } => f
                .debug_struct("Outline")
                .field("scale", &(scale.x, scale.y))
                .finish(),
            Font::Builtin(mono) => f
                .debug_tuple("Builtin")
                .field(&(mono.character_size.width, mono.character_size.height))
                .finish(),
        }
    }
}

impl Font {
    /// The built-in bitmap font closest to `size` without exceeding it.
    pub fn builtin(size: u32) -> Self {
        let pick = BUILTIN_FONTS
            .iter()
            .rev()
            .find(|f| f.character_size.height <= size)
            .copied()
            .unwrap_or(BUILTIN_FONTS[0]);
        Font::Builtin(pick)
    }

    /// Outline font whose em square is `size` pixels tall.
    pub fn outline(font: FontArc, size: u32) -> Self {
        let size = size as f32;
        let scale = match font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
            _ => PxScale::from(size),
        };
        Font::Outline { font, scale }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Font::Builtin(_))
    }

    /// Whether `c` has a real glyph in this font.
    pub fn supports(&self, c: char) -> bool {
        match self {
            Font::Outline { font, .. } => font.glyph_id(c).0 != 0,
            Font::Builtin(_) => matches!(c, ' '..='~'),
        }
    }

    /// Rendered `(width, height)` of `text`.
    ///
    /// `None` when the text is empty or holds a char the font cannot render.
    pub fn measure(&self, text: &str) -> Option<(u32, u32)> {
        if text.is_empty() || !text.chars().all(|c| self.supports(c)) {
            return None;
        }
        match self {
            Font::Outline { font, scale } => Some(imageproc::drawing::text_size(*scale, font, text)),
            Font::Builtin(mono) => {
                let n = text.chars().count() as u32;
                let width = n * mono.character_size.width + (n - 1) * mono.character_spacing;
                Some((width, mono.character_size.height))
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Color) {
        if text.is_empty() {
            return;
        }
        match self {
            Font::Outline { font, scale } => {
                imageproc::drawing::draw_text_mut(canvas, color.to_rgb(), x, y, *scale, font, text);
            }
            Font::Builtin(mono) => {
                let style = MonoTextStyle::new(*mono, Rgb888::new(color.0, color.1, color.2));
                let mut target = CanvasTarget(canvas);
                // Infallible target
                let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
                    .draw(&mut target);
            }
        }
    }
}

/// Lets embedded-graphics draw straight into an `RgbImage`, clipping at the edges.
struct CanvasTarget<'a>(&'a mut RgbImage);

impl OriginDimensions for CanvasTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for CanvasTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.0.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < w && y < h {
                self.0.put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}

/// Locates one font file and hands out sized instances of it.
///
/// Never fails: a missing or unreadable font is logged once and every
/// [`FontCache::load`] returns the built-in fallback instead.
#[derive(Clone)]
pub struct FontCache {
    path: Option<PathBuf>,
    font: Option<FontArc>,
}

impl FontCache {
    /// Scan `dir` for the first font file and parse it.
    pub fn new(dir: &Path) -> Self {
        let path = find_font_file(dir);
        let font = match &path {
            Some(p) => match std::fs::read(p) {
                Ok(bytes) => match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        log::info!("Loaded font {}", p.display());
                        Some(font)
                    }
                    Err(e) => {
                        log::warn!("Unable to parse font file {}: {}; using built-in font", p.display(), e);
                        None
                    }
                },
                Err(e) => {
                    log::warn!("Unable to read font file {}: {}; using built-in font", p.display(), e);
                    None
                }
            },
            None => {
                log::warn!("No font file found in {}; using built-in font", dir.display());
                None
            }
        };
        Self { path, font }
    }

    /// A cache that always hands out the built-in font.
    pub fn builtin() -> Self {
        Self { path: None, font: None }
    }

    /// Path of the discovered font file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_outline_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn load(&self, size: u32) -> Font {
        match &self.font {
            Some(font) => Font::outline(font.clone(), size),
            None => Font::builtin(size),
        }
    }
}

/// First `.ttf`/`.otf` file in `dir`, by file name order.
pub fn find_font_file(dir: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot scan font dir {}: {}", dir.display(), e);
            return None;
        }
    };
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_font_extension(p))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// What a font is used for; each purpose has a fixed point size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Nicknames in the roster
    RosterName,
    /// Badge, title and time lines in the roster
    RosterDetail,
    /// Roster and ranking headlines
    Title,
    /// Ranking nickname and duration
    RankingText,
    /// Ranking place number
    Rank,
    /// Ranking date range and course count
    Caption,
    AgendaMain,
    AgendaDetail,
    AgendaTitle,
}

impl FontRole {
    pub const ALL: [FontRole; 9] = [
        FontRole::RosterName,
        FontRole::RosterDetail,
        FontRole::Title,
        FontRole::RankingText,
        FontRole::Rank,
        FontRole::Caption,
        FontRole::AgendaMain,
        FontRole::AgendaDetail,
        FontRole::AgendaTitle,
    ];

    pub fn point_size(self) -> u32 {
        match self {
            FontRole::RosterName => 32,
            FontRole::RosterDetail => 24,
            FontRole::Title => 48,
            FontRole::RankingText => 28,
            FontRole::Rank => 36,
            FontRole::Caption => 24,
            FontRole::AgendaMain => 28,
            FontRole::AgendaDetail => 22,
            FontRole::AgendaTitle => 40,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One preloaded font per [`FontRole`]. Read-only after construction.
#[derive(Debug, Clone)]
pub struct FontSet {
    fonts: Vec<Font>,
}

impl FontSet {
    pub fn load(cache: &FontCache) -> Self {
        let fonts = FontRole::ALL.iter().map(|role| cache.load(role.point_size())).collect();
        Self { fonts }
    }

    pub fn get(&self, role: FontRole) -> &Font {
        &self.fonts[role.index()]
    }
}
