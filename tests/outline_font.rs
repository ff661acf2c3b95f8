//! The outline-font path, driven by the DejaVu Sans fixture.

use chrono::NaiveDate;
use image::{Rgb, RgbImage};
use schedule_board::rendering::layout::RankingLayout;
use schedule_board::text::{sanitize, Font, FontCache, FontRole, FontSet};
use schedule_board::{Color, ImageComposer, RankingEntry, RenderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts")
}

fn outline_cache() -> FontCache {
    let cache = FontCache::new(&fixture_dir());
    assert!(cache.has_outline_font(), "fixture font did not load");
    cache
}

#[test]
fn fixture_dir_loads_an_outline_font() {
    let cache = outline_cache();
    assert_eq!(cache.path(), Some(fixture_dir().join("DejaVuSans.ttf").as_path()));
    assert!(!cache.load(24).is_builtin());

    let set = FontSet::load(&cache);
    for role in FontRole::ALL {
        assert!(!set.get(role).is_builtin(), "{:?} fell back", role);
    }
}

#[test]
fn outline_supports_follows_the_glyph_table() {
    let font = outline_cache().load(24);
    assert!(font.supports('A'));
    assert!(font.supports(' '));
    assert!(font.supports('é'));
    assert!(!font.supports('🎉'));
    assert!(!font.supports('同'));
}

#[test]
fn outline_measure_grows_with_text() {
    let font = outline_cache().load(24);
    let (w3, h3) = font.measure("abc").expect("measurable");
    let (w4, _) = font.measure("abcd").expect("measurable");
    assert!(w3 > 0 && h3 > 0);
    assert!(w4 > w3);
    assert_eq!(font.measure(""), None);
    assert_eq!(font.measure("a🎉"), None);
}

#[test]
fn outline_sanitize_preserves_count_and_is_idempotent() {
    let font = outline_cache().load(24);
    assert_eq!(sanitize("Alice 🎉", &font), "Alice  ");
    for s in ["", "plain", "Alice 同学 🎉\t", "高等数学 @ A101", "café"] {
        let once = sanitize(s, &font);
        assert_eq!(once.chars().count(), s.chars().count());
        assert_eq!(sanitize(&once, &font), once);
        assert!(once.chars().all(|c| font.supports(c)));
    }
}

#[test]
fn outline_draw_marks_the_canvas() {
    let font = outline_cache().load(32);
    let white = Rgb([255, 255, 255]);
    let mut canvas = RgbImage::from_pixel(120, 60, white);
    font.draw(&mut canvas, 10, 10, "Ag", Color::rgb(0, 0, 0));
    assert!(canvas.pixels().any(|p| *p != white));

    // A blank string leaves the canvas alone.
    let mut blank = RgbImage::from_pixel(40, 40, white);
    font.draw(&mut blank, 0, 0, "   ", Color::rgb(0, 0, 0));
    assert!(blank.pixels().all(|p| *p == white));
}

#[tokio::test]
async fn ranking_paints_with_an_outline_font() {
    let config = RenderConfig {
        avatar_url_template: "http://127.0.0.1:9/{user_id}".into(),
        avatar_timeout_ms: Some(2_000),
        ..Default::default()
    };
    let fonts = Arc::new(FontSet::load(&outline_cache()));
    let composer = ImageComposer::with_fonts(config, fonts).expect("composer");
    let style = composer.config().ranking.clone();
    let entries = vec![
        RankingEntry::new("1", "Alice 🎉", Duration::from_secs(12 * 3600 + 5 * 60), 14),
        RankingEntry::new("2", "Zoë", Duration::from_secs(9 * 3600), 11),
    ];
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

    let canvas = composer.paint_ranking(&entries, start, end).await.expect("paint");

    let layout = RankingLayout::new(&style, entries.len());
    assert_eq!(Some(canvas.dimensions()), layout.canvas_size());

    // The date range is plain ASCII, so the caption band must carry ink.
    let (cx, cy) = layout.caption_origin();
    let background = style.background.to_rgb();
    let inked = (cy..cy + 30).any(|y| {
        (cx..cx + 300).any(|x| *canvas.get_pixel(x as u32, y as u32) != background)
    });
    assert!(inked, "caption was not drawn");
}

#[test]
fn builtin_and_outline_disagree_on_non_ascii() {
    let builtin = Font::builtin(24);
    let outline = outline_cache().load(24);
    assert!(!builtin.supports('é'));
    assert!(outline.supports('é'));
}
