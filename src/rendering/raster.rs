/// Canvas allocation and PNG persistence

use image::{ImageFormat, RgbImage};
use std::io::{BufWriter, Cursor, Write};
use std::path::PathBuf;

use crate::{Color, Error, Result};

/// Allocate a canvas of `size` filled with `background`.
///
/// `size` comes straight from a layout; `None` means the row count overflowed.
pub fn new_canvas(size: Option<(u32, u32)>, background: Color) -> Result<RgbImage> {
    let (width, height) =
        size.ok_or_else(|| Error::RenderError("canvas size overflows".into()))?;
    let bytes = (width as u64) * (height as u64) * 3;
    if width == 0 || height == 0 || bytes > isize::MAX as u64 {
        return Err(Error::RenderError(format!(
            "invalid canvas size {}x{}",
            width, height
        )));
    }
    Ok(RgbImage::from_pixel(width, height, background.to_rgb()))
}

/// Encode the canvas as PNG in memory.
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// Write the canvas to a new temporary `.png` file and hand over its path.
///
/// The file is kept on disk; removing it is up to the caller.
pub fn persist_png(canvas: &RgbImage, prefix: &str) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".png")
        .tempfile()?;
    {
        let mut writer = BufWriter::new(file.as_file());
        writer.write_all(&encode_png(canvas)?)?;
        writer.flush()?;
    }
    let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_filled_with_background() {
        let bg = Color::rgb(1, 2, 3);
        let c = new_canvas(Some((8, 4)), bg).unwrap();
        assert_eq!(c.dimensions(), (8, 4));
        assert!(c.pixels().all(|p| *p == bg.to_rgb()));
    }

    #[test]
    fn overflowed_or_empty_size_is_a_render_error() {
        assert!(matches!(new_canvas(None, Color::rgb(0, 0, 0)), Err(Error::RenderError(_))));
        assert!(matches!(new_canvas(Some((0, 10)), Color::rgb(0, 0, 0)), Err(Error::RenderError(_))));
    }

    #[test]
    fn persisted_file_survives_and_decodes() {
        let canvas = new_canvas(Some((16, 9)), Color::rgb(200, 10, 10)).unwrap();
        let path = persist_png(&canvas, "raster-test-").unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back, canvas);
        std::fs::remove_file(path).unwrap();
    }
}
