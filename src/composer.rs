//! The three renders: roster, agenda and ranking.
//!
//! Each one is a single pass: fetch avatars, lay out, draw, persist. Nothing
//! but the avatar fetch suspends, and the canvas belongs to the call that
//! allocated it.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::avatar::{AvatarData, AvatarFetcher};
use crate::rendering::layout::{AgendaLayout, Origin, RankingLayout, RosterLayout};
use crate::rendering::{paint, raster};
use crate::status::{classify, StatusLabel};
use crate::text::{sanitize, FontCache, FontRole, FontSet};
use crate::{Color, CourseEntry, Error, RankingEntry, RenderConfig, Result};

pub const ROSTER_TITLE: &str = "“群友在上什么课?”";
pub const RANKING_TITLE: &str = "本周上课排行榜";

/// Renders schedule images. Cheap to share: fonts are loaded once and only
/// read afterwards.
#[derive(Debug, Clone)]
pub struct ImageComposer {
    config: RenderConfig,
    fonts: Arc<FontSet>,
    fetcher: AvatarFetcher,
    timezone: FixedOffset,
}

impl ImageComposer {
    /// Build a composer, loading fonts from `config.font_dir`.
    ///
    /// A missing font is not an error (the built-in font is used); an invalid
    /// avatar URL template or UTC offset is.
    pub fn new(config: RenderConfig) -> Result<Self> {
        let fonts = Arc::new(FontSet::load(&FontCache::new(&config.font_dir)));
        Self::with_fonts(config, fonts)
    }

    /// Build a composer around an already loaded font set.
    pub fn with_fonts(config: RenderConfig, fonts: Arc<FontSet>) -> Result<Self> {
        let timezone = FixedOffset::east_opt(config.utc_offset_secs).ok_or_else(|| {
            Error::ConfigError(format!("UTC offset out of range: {}s", config.utc_offset_secs))
        })?;
        let fetcher = AvatarFetcher::new(
            config.avatar_url_template.clone(),
            config.avatar_timeout_ms.map(Duration::from_millis),
        )?;
        Ok(Self {
            config,
            fonts,
            fetcher,
            timezone,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn fonts(&self) -> &Arc<FontSet> {
        &self.fonts
    }

    /// Current instant in the configured timezone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone)
    }

    /// Group roster evaluated at the current instant.
    pub async fn render_roster(&self, courses: &[CourseEntry]) -> Result<PathBuf> {
        self.render_roster_at(courses, self.now()).await
    }

    pub async fn render_roster_at(
        &self,
        courses: &[CourseEntry],
        now: DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let canvas = self.paint_roster(courses, now).await?;
        let path = raster::persist_png(&canvas, "roster-")?;
        log::info!("Roster with {} row(s) written to {}", courses.len(), path.display());
        Ok(path)
    }

    /// Draw the roster without persisting it.
    pub async fn paint_roster(
        &self,
        courses: &[CourseEntry],
        now: DateTime<FixedOffset>,
    ) -> Result<RgbImage> {
        let style = &self.config.roster;
        let layout = RosterLayout::new(style, courses.len());
        let mut canvas = raster::new_canvas(layout.canvas_size(), style.background)?;

        paint::fill_rect(&mut canvas, layout.accent_bar(), style.accent_color);
        self.text(&mut canvas, FontRole::Title, layout.title_origin(), ROSTER_TITLE, style.title_color);
        paint::fill_rect(&mut canvas, layout.title_underline(), style.underline_color);

        let ids: Vec<&str> = courses.iter().map(|c| c.user_id.as_str()).collect();
        let avatars = self.fetcher.fetch_all(&ids).await;

        for (i, (course, avatar)) in courses.iter().zip(&avatars).enumerate() {
            draw_avatar(&mut canvas, avatar, style.avatar_size, layout.avatar_origin(i));
            paint::fill_triangle(&mut canvas, layout.indicator(i), style.indicator_color);

            let status = classify(&now, course.start_time.as_ref(), course.end_time.as_ref());
            self.text(&mut canvas, FontRole::RosterName, layout.name_origin(i), &course.nickname, style.font_color);

            let (badge_bg, badge_fg) = match status.label {
                StatusLabel::InProgress => style.in_progress,
                StatusLabel::UpNext => style.up_next,
                StatusLabel::Ended => style.ended,
            };
            paint::fill_rect(&mut canvas, layout.badge(i), badge_bg);
            self.text(&mut canvas, FontRole::RosterDetail, layout.badge_text_origin(i), status.label.as_str(), badge_fg);

            self.text(&mut canvas, FontRole::RosterDetail, layout.summary_origin(i), &course.summary, style.font_color);
            let time_line = match course.time_range() {
                Some((start, end)) => format!(
                    "{}-{} ({})",
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    status.detail
                ),
                None => status.detail,
            };
            self.text(&mut canvas, FontRole::RosterDetail, layout.time_origin(i), &time_line, style.subtitle_color);
        }

        log::debug!("Painted roster {}x{}", canvas.width(), canvas.height());
        Ok(canvas)
    }

    /// One user's agenda, footer stamped with the current instant.
    pub async fn render_agenda(&self, courses: &[CourseEntry], nickname: &str) -> Result<PathBuf> {
        self.render_agenda_at(courses, nickname, self.now()).await
    }

    pub async fn render_agenda_at(
        &self,
        courses: &[CourseEntry],
        nickname: &str,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let canvas = self.paint_agenda(courses, nickname, generated_at)?;
        let path = raster::persist_png(&canvas, "agenda-")?;
        log::info!("Agenda for {} with {} course(s) written to {}", nickname, courses.len(), path.display());
        Ok(path)
    }

    /// Draw the agenda without persisting it.
    ///
    /// Every course must carry both start and end; a course without them
    /// cannot be drawn and fails the whole render.
    pub fn paint_agenda(
        &self,
        courses: &[CourseEntry],
        nickname: &str,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<RgbImage> {
        let ranges = courses
            .iter()
            .map(|c| {
                c.time_range().ok_or_else(|| {
                    Error::RenderError(format!("course {:?} has no start/end time", c.summary))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let style = &self.config.agenda;
        let layout = AgendaLayout::new(style, courses.len());
        let mut canvas = raster::new_canvas(layout.canvas_size(), style.background)?;

        let title = format!("{}的今日课程", nickname);
        self.text(&mut canvas, FontRole::AgendaTitle, layout.title_origin(), &title, style.title_color);

        for (i, (course, (start, end))) in courses.iter().zip(ranges).enumerate() {
            paint::fill_rounded_rect(&mut canvas, layout.card(i), style.card_radius, style.card_color);
            let time_line = format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"));
            self.text(&mut canvas, FontRole::AgendaMain, layout.time_origin(i), &time_line, style.title_color);
            let detail = format!("{} @ {}", course.summary, course.location);
            self.text(&mut canvas, FontRole::AgendaDetail, layout.detail_origin(i), &detail, style.font_color);
        }

        let footer = format!("生成时间: {}", generated_at.format("%Y/%m/%d %H:%M:%S"));
        let footer_origin = layout.footer_origin(canvas.height());
        self.text(&mut canvas, FontRole::AgendaDetail, footer_origin, &footer, style.subtitle_color);

        Ok(canvas)
    }

    /// Weekly ranking; rank is the position in `entries`.
    pub async fn render_ranking(
        &self,
        entries: &[RankingEntry],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PathBuf> {
        let canvas = self.paint_ranking(entries, start_date, end_date).await?;
        let path = raster::persist_png(&canvas, "ranking-")?;
        log::info!("Ranking with {} row(s) written to {}", entries.len(), path.display());
        Ok(path)
    }

    /// Draw the ranking without persisting it.
    pub async fn paint_ranking(
        &self,
        entries: &[RankingEntry],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RgbImage> {
        let style = &self.config.ranking;
        let layout = RankingLayout::new(style, entries.len());
        let mut canvas = raster::new_canvas(layout.canvas_size(), style.background)?;

        self.text(&mut canvas, FontRole::Title, layout.title_origin(), RANKING_TITLE, style.title_color);
        let range = format!("{} - {}", start_date.format("%Y/%m/%d"), end_date.format("%Y/%m/%d"));
        self.text(&mut canvas, FontRole::Caption, layout.caption_origin(), &range, style.subtitle_color);

        let ids: Vec<&str> = entries.iter().map(|e| e.user_id.as_str()).collect();
        let avatars = self.fetcher.fetch_all(&ids).await;

        for (i, (entry, avatar)) in entries.iter().zip(&avatars).enumerate() {
            let rank = i + 1;
            if let Some(stripe) = layout.stripe(i) {
                paint::fill_rect(&mut canvas, stripe, style.stripe_color);
            }

            let rank_text = rank.to_string();
            let rank_size = self.fonts.get(FontRole::Rank).measure(&rank_text);
            self.text(&mut canvas, FontRole::Rank, layout.rank_origin(i, rank_size), &rank_text, style.rank_color(rank));

            draw_avatar(&mut canvas, avatar, style.avatar_size, layout.avatar_origin(i));
            self.text(&mut canvas, FontRole::RankingText, layout.name_origin(i), &entry.nickname, style.font_color);

            let duration = self.sanitized(FontRole::RankingText, &entry.duration_label());
            let duration_w = self.measured_width(FontRole::RankingText, &duration);
            self.text(&mut canvas, FontRole::RankingText, layout.duration_origin(i, duration_w), &duration, style.font_color);

            let count = self.sanitized(FontRole::Caption, &entry.count_label());
            let count_w = self.measured_width(FontRole::Caption, &count);
            self.text(&mut canvas, FontRole::Caption, layout.count_origin(i, count_w), &count, style.subtitle_color);
        }

        log::debug!("Painted ranking {}x{}", canvas.width(), canvas.height());
        Ok(canvas)
    }

    fn sanitized(&self, role: FontRole, text: &str) -> String {
        sanitize(text, self.fonts.get(role))
    }

    fn measured_width(&self, role: FontRole, text: &str) -> Option<u32> {
        self.fonts.get(role).measure(text).map(|(w, _)| w)
    }

    /// Sanitize for the role's font, then draw.
    fn text(&self, canvas: &mut RgbImage, role: FontRole, origin: Origin, text: &str, color: Color) {
        let font = self.fonts.get(role);
        font.draw(canvas, origin.0, origin.1, &sanitize(text, font), color);
    }
}

fn draw_avatar(canvas: &mut RgbImage, avatar: &AvatarData, diameter: u32, origin: Origin) {
    if let Some(data) = avatar {
        if let Some(img) = paint::circular_avatar(data, diameter) {
            paint::paste_with_alpha(canvas, &img, origin);
        }
    }
}
