//! Drawing primitives missing from the raster backend: rounded rectangles,
//! quarter discs and circular avatar clipping.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;

use super::layout::{Origin, Rect};
use crate::Color;

/// Which corner of a rectangle a quarter disc rounds off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

pub fn fill_rect(canvas: &mut RgbImage, rect: Rect, color: Color) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let r = imageproc::rect::Rect::at(rect.x, rect.y).of_size(rect.width, rect.height);
    draw_filled_rect_mut(canvas, r, color.to_rgb());
}

/// Fill the quarter of the disc centered at `(cx, cy)` facing `corner`.
pub fn fill_quarter_disc(canvas: &mut RgbImage, cx: i32, cy: i32, radius: i32, corner: Corner, color: Color) {
    let (sx, sy) = match corner {
        Corner::TopLeft => (-1, -1),
        Corner::TopRight => (1, -1),
        Corner::BottomLeft => (-1, 1),
        Corner::BottomRight => (1, 1),
    };
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let pixel = color.to_rgb();
    let r2 = radius * radius;
    for dy in 0..=radius {
        for dx in 0..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let (x, y) = (cx + sx * dx, cy + sy * dy);
            if x >= 0 && y >= 0 && x < w && y < h {
                canvas.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }
}

/// Rounded rectangle: a horizontal and a vertical band plus one quarter
/// disc per corner.
pub fn fill_rounded_rect(canvas: &mut RgbImage, rect: Rect, radius: u32, color: Color) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let r = radius.min(rect.width / 2).min(rect.height / 2) as i32;
    let (x1, y1, x2, y2) = (rect.x, rect.y, rect.right(), rect.bottom());

    fill_rect(canvas, Rect::from_corners(x1, y1 + r, x2, y2 - r), color);
    fill_rect(canvas, Rect::from_corners(x1 + r, y1, x2 - r, y2), color);

    fill_quarter_disc(canvas, x1 + r, y1 + r, r, Corner::TopLeft, color);
    fill_quarter_disc(canvas, x2 - r, y1 + r, r, Corner::TopRight, color);
    fill_quarter_disc(canvas, x1 + r, y2 - r, r, Corner::BottomLeft, color);
    fill_quarter_disc(canvas, x2 - r, y2 - r, r, Corner::BottomRight, color);
}

pub fn fill_triangle(canvas: &mut RgbImage, points: [Origin; 3], color: Color) {
    let poly: Vec<Point<i32>> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(canvas, &poly, color.to_rgb());
}

/// Decode avatar bytes, scale to `diameter` and clear everything outside
/// the inscribed circle.
///
/// Returns `None` (and logs) when the bytes are not a decodable image.
pub fn circular_avatar(data: &[u8], diameter: u32) -> Option<RgbaImage> {
    let decoded = match image::load_from_memory(data) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            log::warn!("Skipping undecodable avatar ({} bytes): {}", data.len(), e);
            return None;
        }
    };
    let mut avatar = imageops::resize(&decoded, diameter, diameter, FilterType::Triangle);
    apply_circle_mask(&mut avatar);
    Some(avatar)
}

/// Zero the alpha of every pixel whose center lies outside the inscribed circle.
pub fn apply_circle_mask(img: &mut RgbaImage) {
    let r = img.width().min(img.height()) as f32 / 2.0;
    let (cx, cy) = (img.width() as f32 / 2.0, img.height() as f32 / 2.0);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy > r * r {
            px.0[3] = 0;
        }
    }
}

/// Alpha-blend `top` onto `canvas` with its top-left at `origin`.
pub fn paste_with_alpha(canvas: &mut RgbImage, top: &RgbaImage, origin: Origin) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    for (tx, ty, px) in top.enumerate_pixels() {
        let alpha = px.0[3];
        if alpha == 0 {
            continue;
        }
        let (x, y) = (origin.0 + tx as i32, origin.1 + ty as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        let bg = canvas.get_pixel(x as u32, y as u32);
        canvas.put_pixel(x as u32, y as u32, blend(bg, px.0, alpha));
    }
}

fn blend(bg: &Rgb<u8>, fg: [u8; 4], alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |b: u8, f: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
    Rgb([mix(bg.0[0], fg[0]), mix(bg.0[1], fg[1]), mix(bg.0[2], fg[2])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Color = Color::rgb(255, 255, 255);
    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn rounded_rect_keeps_corners_clear() {
        let mut canvas = RgbImage::from_pixel(60, 40, WHITE.to_rgb());
        fill_rounded_rect(&mut canvas, Rect::from_corners(10, 10, 49, 29), 8, RED);
        // Outermost corner pixel stays background, inner area is filled.
        assert_eq!(canvas.get_pixel(10, 10), &WHITE.to_rgb());
        assert_eq!(canvas.get_pixel(49, 29), &WHITE.to_rgb());
        assert_eq!(canvas.get_pixel(30, 20), &RED.to_rgb());
        // Edge midpoints are filled.
        assert_eq!(canvas.get_pixel(30, 10), &RED.to_rgb());
        assert_eq!(canvas.get_pixel(10, 20), &RED.to_rgb());
        // Nothing leaks outside.
        assert_eq!(canvas.get_pixel(9, 20), &WHITE.to_rgb());
        assert_eq!(canvas.get_pixel(50, 20), &WHITE.to_rgb());
    }

    #[test]
    fn quarter_disc_clips_at_canvas_edge() {
        let mut canvas = RgbImage::from_pixel(4, 4, WHITE.to_rgb());
        fill_quarter_disc(&mut canvas, 0, 0, 10, Corner::TopLeft, RED);
        assert_eq!(canvas.get_pixel(0, 0), &RED.to_rgb());
        assert_eq!(canvas.get_pixel(1, 1), &WHITE.to_rgb());
    }

    #[test]
    fn circle_mask_clears_corners_only() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 255, 255]));
        apply_circle_mask(&mut img);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(19, 19).0[3], 0);
        assert_eq!(img.get_pixel(10, 10).0[3], 255);
        assert_eq!(img.get_pixel(10, 0).0[3], 255);
    }

    #[test]
    fn paste_respects_alpha() {
        let mut canvas = RgbImage::from_pixel(4, 4, WHITE.to_rgb());
        let mut top = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        top.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        paste_with_alpha(&mut canvas, &top, (1, 1));
        assert_eq!(canvas.get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(2, 2), &WHITE.to_rgb());
        assert_eq!(canvas.get_pixel(0, 0), &WHITE.to_rgb());
    }

    #[test]
    fn undecodable_avatar_is_none() {
        assert!(circular_avatar(b"definitely not an image", 40).is_none());
    }

    #[test]
    fn avatar_is_scaled_and_masked() {
        let src = RgbaImage::from_pixel(64, 32, Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(src)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let avatar = circular_avatar(&png, 40).unwrap();
        assert_eq!(avatar.dimensions(), (40, 40));
        assert_eq!(avatar.get_pixel(0, 0).0[3], 0);
        assert_eq!(avatar.get_pixel(20, 20).0[3], 255);
    }
}
