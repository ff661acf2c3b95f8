//! Canvas geometry for the three views.
//!
//! Everything here is a pure function of the row count and the style; the
//! composer asks for coordinates and draws, nothing in this module touches
//! pixels or I/O.

use crate::{AgendaStyle, RankingStyle, RosterStyle};

/// Height of the roster title block
pub const ROSTER_HEADER_HEIGHT: u32 = 120;
/// Height of the agenda title block
pub const AGENDA_HEADER_HEIGHT: u32 = 100;
/// Gap left below each agenda card
pub const AGENDA_CARD_GAP: u32 = 10;

/// Width/height assumed for a rank number that cannot be measured
pub const RANK_FALLBACK_SIZE: (u32, u32) = (10, 10);
/// Width assumed for a duration that cannot be measured
pub const DURATION_FALLBACK_WIDTH: u32 = 100;
/// Width assumed for a course count that cannot be measured
pub const COUNT_FALLBACK_WIDTH: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Rectangle covering `(x1, y1)..=(x2, y2)`, both corners included.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Rect {
            x: x1,
            y: y1,
            width: (x2 - x1 + 1).max(0) as u32,
            height: (y2 - y1 + 1).max(0) as u32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }
}

pub type Origin = (i32, i32);

fn stacked_height(fixed: u32, rows: usize, row_height: u32) -> Option<u32> {
    let rows = u32::try_from(rows).ok()?;
    rows.checked_mul(row_height)?.checked_add(fixed)
}

/// Roster: avatar, indicator, then name / badge / title / time per row.
#[derive(Debug, Clone)]
pub struct RosterLayout {
    width: u32,
    padding: i32,
    row_height: i32,
    avatar_size: i32,
    rows: usize,
}

impl RosterLayout {
    pub fn new(style: &RosterStyle, rows: usize) -> Self {
        Self {
            width: style.width,
            padding: style.padding as i32,
            row_height: style.row_height as i32,
            avatar_size: style.avatar_size as i32,
            rows,
        }
    }

    /// `(width, 2×padding + header + rows×row_height)`, `None` on overflow.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let fixed = (self.padding as u32).checked_mul(2)?.checked_add(ROSTER_HEADER_HEIGHT)?;
        let height = stacked_height(fixed, self.rows, self.row_height as u32)?;
        Some((self.width, height))
    }

    pub fn accent_bar(&self) -> Rect {
        let p = self.padding;
        Rect::from_corners(p, p, p + 20, p + 60)
    }

    pub fn title_origin(&self) -> Origin {
        (self.padding + 40, self.padding)
    }

    pub fn title_underline(&self) -> Rect {
        let p = self.padding;
        Rect::from_corners(p + 40, p + 70, p + 340, p + 75)
    }

    pub fn row_top(&self, index: usize) -> i32 {
        self.padding + ROSTER_HEADER_HEIGHT as i32 + index as i32 * self.row_height
    }

    pub fn avatar_origin(&self, index: usize) -> Origin {
        (
            self.padding,
            self.row_top(index) + (self.row_height - self.avatar_size) / 2,
        )
    }

    /// Right-pointing triangle between avatar and text.
    pub fn indicator(&self, index: usize) -> [Origin; 3] {
        let x = self.padding + self.avatar_size + 20;
        let mid = self.row_top(index) + self.row_height / 2;
        [(x, mid - 20), (x + 30, mid), (x, mid + 20)]
    }

    fn text_x(&self) -> i32 {
        self.padding + self.avatar_size + 20 + 50
    }

    pub fn name_origin(&self, index: usize) -> Origin {
        (self.text_x(), self.row_top(index) + 15)
    }

    pub fn badge(&self, index: usize) -> Rect {
        let (x, top) = (self.text_x(), self.row_top(index));
        Rect::from_corners(x, top + 60, x + 100, top + 95)
    }

    pub fn badge_text_origin(&self, index: usize) -> Origin {
        (self.text_x() + 10, self.row_top(index) + 65)
    }

    pub fn summary_origin(&self, index: usize) -> Origin {
        (self.text_x() + 120, self.row_top(index) + 65)
    }

    pub fn time_origin(&self, index: usize) -> Origin {
        (self.text_x() + 120, self.row_top(index) + 95)
    }
}

/// Agenda: one rounded card per course.
#[derive(Debug, Clone)]
pub struct AgendaLayout {
    width: i32,
    padding: i32,
    row_height: i32,
    rows: usize,
}

impl AgendaLayout {
    pub fn new(style: &AgendaStyle, rows: usize) -> Self {
        Self {
            width: style.width as i32,
            padding: style.padding as i32,
            row_height: style.row_height as i32,
            rows,
        }
    }

    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let fixed = (self.padding as u32).checked_mul(2)?.checked_add(AGENDA_HEADER_HEIGHT)?;
        let height = stacked_height(fixed, self.rows, self.row_height as u32)?;
        Some((self.width as u32, height))
    }

    pub fn title_origin(&self) -> Origin {
        (self.padding, self.padding)
    }

    pub fn card(&self, index: usize) -> Rect {
        let top = self.padding + AGENDA_HEADER_HEIGHT as i32 + index as i32 * self.row_height;
        Rect::from_corners(
            self.padding,
            top,
            self.width - self.padding,
            top + self.row_height - AGENDA_CARD_GAP as i32,
        )
    }

    pub fn time_origin(&self, index: usize) -> Origin {
        let card = self.card(index);
        (card.x + 20, card.y + 15)
    }

    pub fn detail_origin(&self, index: usize) -> Origin {
        let card = self.card(index);
        (card.x + 20, card.y + 55)
    }

    /// Footer sits at `height - padding`.
    pub fn footer_origin(&self, canvas_height: u32) -> Origin {
        (self.padding, canvas_height as i32 - self.padding)
    }
}

/// Ranking: zebra rows with rank, avatar, name and right-aligned totals.
#[derive(Debug, Clone)]
pub struct RankingLayout {
    width: i32,
    padding: i32,
    header_height: i32,
    row_height: i32,
    avatar_size: i32,
    rows: usize,
}

impl RankingLayout {
    pub fn new(style: &RankingStyle, rows: usize) -> Self {
        Self {
            width: style.width as i32,
            padding: style.padding as i32,
            header_height: style.header_height as i32,
            row_height: style.row_height as i32,
            avatar_size: style.avatar_size as i32,
            rows,
        }
    }

    /// `(width, header + rows×row_height + padding)`, `None` on overflow.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let fixed = (self.header_height as u32).checked_add(self.padding as u32)?;
        let height = stacked_height(fixed, self.rows, self.row_height as u32)?;
        Some((self.width as u32, height))
    }

    pub fn title_origin(&self) -> Origin {
        (self.padding, self.padding)
    }

    pub fn caption_origin(&self) -> Origin {
        (self.padding, self.padding + 70)
    }

    pub fn row_top(&self, index: usize) -> i32 {
        self.header_height + index as i32 * self.row_height
    }

    /// Background band for odd rows.
    pub fn stripe(&self, index: usize) -> Option<Rect> {
        if index % 2 == 0 {
            return None;
        }
        let top = self.row_top(index);
        Some(Rect::from_corners(
            self.padding,
            top,
            self.width - self.padding,
            top + self.row_height,
        ))
    }

    /// Rank number centered on `padding + 40`, vertically centered in the row.
    pub fn rank_origin(&self, index: usize, measured: Option<(u32, u32)>) -> Origin {
        let (w, h) = measured.unwrap_or(RANK_FALLBACK_SIZE);
        (
            self.padding + 40 - w as i32 / 2,
            self.row_top(index) + (self.row_height - h as i32) / 2,
        )
    }

    pub fn avatar_origin(&self, index: usize) -> Origin {
        (
            self.padding + 100,
            self.row_top(index) + (self.row_height - self.avatar_size) / 2,
        )
    }

    fn text_baseline(&self, index: usize) -> i32 {
        self.row_top(index) + (self.row_height - 30) / 2
    }

    pub fn name_origin(&self, index: usize) -> Origin {
        (self.padding + 210, self.text_baseline(index))
    }

    fn right_aligned_x(&self, width: u32) -> i32 {
        self.width - self.padding - width as i32 - 20
    }

    pub fn duration_origin(&self, index: usize, measured_width: Option<u32>) -> Origin {
        let w = measured_width.unwrap_or(DURATION_FALLBACK_WIDTH);
        (self.right_aligned_x(w), self.text_baseline(index) - 15)
    }

    pub fn count_origin(&self, index: usize, measured_width: Option<u32>) -> Origin {
        let w = measured_width.unwrap_or(COUNT_FALLBACK_WIDTH);
        (self.right_aligned_x(w), self.text_baseline(index) + 25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_height_follows_rows() {
        let style = RosterStyle::default();
        let base = 2 * style.padding + ROSTER_HEADER_HEIGHT;
        for rows in [0usize, 1, 500] {
            let (w, h) = RosterLayout::new(&style, rows).canvas_size().unwrap();
            assert_eq!(w, style.width);
            assert_eq!(h, base + rows as u32 * style.row_height);
        }
    }

    #[test]
    fn roster_height_overflow_is_none() {
        let style = RosterStyle::default();
        assert!(RosterLayout::new(&style, usize::MAX).canvas_size().is_none());
    }

    #[test]
    fn roster_rows_do_not_overlap() {
        let style = RosterStyle::default();
        let layout = RosterLayout::new(&style, 3);
        let (_, h) = layout.canvas_size().unwrap();
        assert_eq!(layout.row_top(1) - layout.row_top(0), style.row_height as i32);
        let (_, ay) = layout.avatar_origin(2);
        assert!(ay + style.avatar_size as i32 <= h as i32 - style.padding as i32);
        let tri = layout.indicator(0);
        assert_eq!(tri[1].0 - tri[0].0, 30);
    }

    #[test]
    fn agenda_height_and_cards() {
        let style = AgendaStyle::default();
        let layout = AgendaLayout::new(&style, 2);
        let (_, h) = layout.canvas_size().unwrap();
        assert_eq!(h, 2 * style.padding + AGENDA_HEADER_HEIGHT + 2 * style.row_height);
        let card = layout.card(1);
        assert_eq!(card.x, style.padding as i32);
        assert_eq!(card.right(), (style.width - style.padding) as i32);
        assert_eq!(card.height, style.row_height - AGENDA_CARD_GAP + 1);
        assert_eq!(layout.footer_origin(h).1, (h - style.padding) as i32);
    }

    #[test]
    fn ranking_height_and_stripes() {
        let style = RankingStyle::default();
        let layout = RankingLayout::new(&style, 3);
        let (_, h) = layout.canvas_size().unwrap();
        assert_eq!(h, style.header_height + 3 * style.row_height + style.padding);
        assert!(layout.stripe(0).is_none());
        assert!(layout.stripe(1).is_some());
        assert!(layout.stripe(2).is_none());
    }

    #[test]
    fn rank_is_centered_on_measured_size() {
        let style = RankingStyle::default();
        let layout = RankingLayout::new(&style, 1);
        let p = style.padding as i32;
        let top = style.header_height as i32;
        let rh = style.row_height as i32;
        assert_eq!(layout.rank_origin(0, Some((20, 36))), (p + 30, top + (rh - 36) / 2));
        assert_eq!(layout.rank_origin(0, None), (p + 35, top + (rh - 10) / 2));
    }

    #[test]
    fn totals_are_right_aligned() {
        let style = RankingStyle::default();
        let layout = RankingLayout::new(&style, 1);
        let right = (style.width - style.padding) as i32 - 20;
        assert_eq!(layout.duration_origin(0, Some(64)).0, right - 64);
        assert_eq!(layout.duration_origin(0, None).0, right - 100);
        assert_eq!(layout.count_origin(0, None).0, right - 80);
    }
}
