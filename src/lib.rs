//! Schedule Board
//!
//! Renders raster summaries of class-schedule data for a group chat:
//!
//! - **Roster**: what each member of a group is attending right now
//! - **Agenda**: one member's courses for the day
//! - **Ranking**: the weekly attendance leaderboard
//!
//! Callers hand already-parsed [`CourseEntry`] / [`RankingEntry`] records to an
//! [`ImageComposer`], which fetches avatars concurrently, lays out the canvas,
//! draws it and writes a PNG to a fresh temporary file whose path it returns.
//!
//! # Example
//!
//! ```no_run
//! use schedule_board::{CourseEntry, ImageComposer, RenderConfig};
//!
//! # async fn run() -> schedule_board::Result<()> {
//! let config = RenderConfig {
//!     font_dir: "assets/fonts".into(),
//!     ..Default::default()
//! };
//! let composer = ImageComposer::new(config)?;
//! let courses = vec![CourseEntry::new("10001").with_nickname("Alice")];
//! let path = composer.render_roster(&courses).await?;
//! println!("roster written to {}", path.display());
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod avatar;
pub mod composer;
pub mod model;
pub mod rendering;
pub mod status;
pub mod text;

pub use avatar::AvatarFetcher;
pub use composer::ImageComposer;
pub use model::{CourseEntry, RankingEntry};
pub use status::{classify, CourseStatus, StatusLabel};
pub use text::{Font, FontCache, FontRole, FontSet};

/// Placeholder substituted with the user identifier in avatar URL templates.
pub const USER_ID_PLACEHOLDER: &str = "{user_id}";

/// Configuration for the image composer
///
/// Built once and handed to [`ImageComposer::new`]; every style constant the
/// renderer uses lives here instead of in module globals. Hosts may also load
/// it from JSON, missing fields take their defaults.
///
/// # Examples
///
/// ```
/// let cfg = schedule_board::RenderConfig::default();
/// assert!(cfg.avatar_url_template.contains("{user_id}"));
/// assert_eq!(cfg.utc_offset_secs, 8 * 3600);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory scanned for the first `.ttf` / `.otf` font file
    pub font_dir: PathBuf,
    /// Avatar URL, `{user_id}` is replaced by the requested identifier
    pub avatar_url_template: String,
    /// Optional per-fetch timeout in milliseconds (`None` => transport default)
    pub avatar_timeout_ms: Option<u64>,
    /// Offset from UTC used to compute "now" for roster and agenda renders
    pub utc_offset_secs: i32,
    /// Group roster style
    pub roster: RosterStyle,
    /// Single-user agenda style
    pub agenda: AgendaStyle,
    /// Weekly ranking style
    pub ranking: RankingStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("fonts"),
            avatar_url_template: "http://q.qlogo.cn/headimg_dl?dst_uin={user_id}&spec=640&img_type=jpg"
                .to_string(),
            avatar_timeout_ms: None,
            utc_offset_secs: 8 * 3600,
            roster: RosterStyle::default(),
            agenda: AgendaStyle::default(),
            ranking: RankingStyle::default(),
        }
    }
}

/// An opaque RGB color.
///
/// Deserializes from a `"#RRGGBB"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b)
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Color(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.0, self.1, self.2])
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

/// Background / foreground pair for a status badge
pub type BadgeColors = (Color, Color);

/// Style of the group roster view
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterStyle {
    pub width: u32,
    pub padding: u32,
    pub row_height: u32,
    pub avatar_size: u32,
    pub background: Color,
    pub title_color: Color,
    pub font_color: Color,
    pub subtitle_color: Color,
    /// Vertical bar left of the title
    pub accent_color: Color,
    /// Underline below the title
    pub underline_color: Color,
    /// Row indicator triangle
    pub indicator_color: Color,
    pub in_progress: BadgeColors,
    pub up_next: BadgeColors,
    pub ended: BadgeColors,
}

impl Default for RosterStyle {
    fn default() -> Self {
        Self {
            width: 800,
            padding: 40,
            row_height: 140,
            avatar_size: 100,
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            title_color: Color::rgb(0x21, 0x21, 0x21),
            font_color: Color::rgb(0x21, 0x21, 0x21),
            subtitle_color: Color::rgb(0x75, 0x75, 0x75),
            accent_color: Color::rgb(0x26, 0xA6, 0x9A),
            underline_color: Color::rgb(0xA7, 0xFF, 0xEB),
            indicator_color: Color::rgb(0xBD, 0xBD, 0xBD),
            in_progress: (Color::rgb(0x43, 0xA0, 0x47), Color::rgb(0xFF, 0xFF, 0xFF)),
            up_next: (Color::rgb(0xFF, 0xB3, 0x00), Color::rgb(0x21, 0x21, 0x21)),
            ended: (Color::rgb(0x9E, 0x9E, 0x9E), Color::rgb(0xFF, 0xFF, 0xFF)),
        }
    }
}

/// Style of the single-user agenda view
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgendaStyle {
    pub width: u32,
    pub padding: u32,
    pub row_height: u32,
    /// Corner radius of a course card
    pub card_radius: u32,
    pub background: Color,
    pub card_color: Color,
    pub title_color: Color,
    pub font_color: Color,
    pub subtitle_color: Color,
}

impl Default for AgendaStyle {
    fn default() -> Self {
        Self {
            width: 720,
            padding: 40,
            row_height: 100,
            card_radius: 10,
            background: Color::rgb(0xFA, 0xFA, 0xFA),
            card_color: Color::rgb(0xE3, 0xF2, 0xFD),
            title_color: Color::rgb(0x0D, 0x47, 0xA1),
            font_color: Color::rgb(0x42, 0x42, 0x42),
            subtitle_color: Color::rgb(0x9E, 0x9E, 0x9E),
        }
    }
}

/// Style of the weekly ranking view
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingStyle {
    pub width: u32,
    pub padding: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub avatar_size: u32,
    pub background: Color,
    /// Fill of odd (zebra) rows
    pub stripe_color: Color,
    pub title_color: Color,
    pub subtitle_color: Color,
    pub font_color: Color,
    /// Rank number colors for places 1, 2 and 3
    pub podium_colors: [Color; 3],
}

impl Default for RankingStyle {
    fn default() -> Self {
        Self {
            width: 800,
            padding: 40,
            header_height: 160,
            row_height: 100,
            avatar_size: 80,
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            stripe_color: Color::rgb(0xF5, 0xF5, 0xF5),
            title_color: Color::rgb(0x21, 0x21, 0x21),
            subtitle_color: Color::rgb(0x75, 0x75, 0x75),
            font_color: Color::rgb(0x21, 0x21, 0x21),
            podium_colors: [
                Color::rgb(0xFF, 0xB3, 0x00),
                Color::rgb(0x9E, 0x9E, 0x9E),
                Color::rgb(0x8D, 0x6E, 0x63),
            ],
        }
    }
}

impl RankingStyle {
    /// Color of the rank number for a 1-based rank.
    pub fn rank_color(&self, rank: usize) -> Color {
        match rank {
            1..=3 => self.podium_colors[rank - 1],
            _ => self.font_color,
        }
    }
}
