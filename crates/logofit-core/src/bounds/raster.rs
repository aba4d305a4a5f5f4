use super::ShapeBounds;
use crate::{Error, Result};
use image::RgbaImage;

/// Alpha-tight crop of a raster logo.
#[derive(Debug, Clone)]
pub struct RasterExtraction {
    /// Pixels inside `bounds`, ready to hand to a vectorizer.
    pub image: RgbaImage,
    /// Tight box in the source image's pixel space. Pixel edges are used, so a single
    /// visible pixel at `(x, y)` yields `x..x+1` by `y..y+1`.
    pub bounds: ShapeBounds,
}

impl RasterExtraction {
    /// `bounds` re-based at the origin, i.e. in the coordinate space of `image`.
    pub fn cropped_bounds(&self) -> ShapeBounds {
        self.bounds.at_origin()
    }
}

/// Decodes PNG or JPEG bytes into RGBA8.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::MalformedImage {
            message: "image has no pixels".to_string(),
        });
    }
    Ok(image)
}

/// Finds the smallest rectangle enclosing every pixel with non-zero alpha and crops to it.
///
/// An image without any visible pixel keeps its full size, as does a fully opaque one.
pub fn extract_raster_bounds(image: &RgbaImage) -> Result<RasterExtraction> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::MalformedImage {
            message: "image has no pixels".to_string(),
        });
    }

    let mut found: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        found = Some(match found {
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
            None => (x, y, x, y),
        });
    }

    let Some((min_x, min_y, max_x, max_y)) = found else {
        tracing::warn!(width, height, "raster has no visible pixels; using full image");
        return Ok(RasterExtraction {
            image: image.clone(),
            bounds: ShapeBounds::from_origin_size(0.0, 0.0, width as f64, height as f64)?,
        });
    };

    let crop_w = max_x - min_x + 1;
    let crop_h = max_y - min_y + 1;
    let cropped = if crop_w == width && crop_h == height {
        image.clone()
    } else {
        image::imageops::crop_imm(image, min_x, min_y, crop_w, crop_h).to_image()
    };
    tracing::debug!(min_x, min_y, crop_w, crop_h, "alpha-tight raster bounds");

    Ok(RasterExtraction {
        image: cropped,
        bounds: ShapeBounds::from_origin_size(
            min_x as f64,
            min_y as f64,
            crop_w as f64,
            crop_h as f64,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn bordered(size: u32, border: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let inside = x >= border && y >= border && x < size - border && y < size - border;
            if inside {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn transparent_border_is_excluded_exactly() {
        let r = extract_raster_bounds(&bordered(100, 10)).unwrap();
        let b = r.bounds;
        assert_eq!((b.min_x(), b.min_y(), b.max_x(), b.max_y()), (10.0, 10.0, 90.0, 90.0));
        assert_eq!((b.width(), b.height()), (80.0, 80.0));
        assert_eq!(r.image.dimensions(), (80, 80));
        assert_eq!(r.image.get_pixel(0, 0)[3], 255);
        assert_eq!(r.cropped_bounds().min_x(), 0.0);
        assert_eq!(r.cropped_bounds().max_x(), 80.0);
    }

    #[test]
    fn opaque_and_fully_transparent_images_keep_full_size() {
        let opaque = RgbaImage::from_pixel(30, 20, Rgba([1, 2, 3, 255]));
        let r = extract_raster_bounds(&opaque).unwrap();
        assert_eq!((r.bounds.width(), r.bounds.height()), (30.0, 20.0));

        let clear = RgbaImage::from_pixel(30, 20, Rgba([0, 0, 0, 0]));
        let r = extract_raster_bounds(&clear).unwrap();
        assert_eq!((r.bounds.width(), r.bounds.height()), (30.0, 20.0));
        assert_eq!(r.image.dimensions(), (30, 20));
    }

    #[test]
    fn single_faint_pixel_counts() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(7, 3, Rgba([0, 0, 0, 1]));
        let b = extract_raster_bounds(&img).unwrap().bounds;
        assert_eq!((b.min_x(), b.min_y(), b.max_x(), b.max_y()), (7.0, 3.0, 8.0, 4.0));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_raster(b"definitely not an image"),
            Err(Error::MalformedImage { .. })
        ));
    }

    #[test]
    fn decode_round_trips_png() {
        let mut png = Vec::new();
        bordered(16, 2)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let decoded = decode_raster(&png).unwrap();
        let b = extract_raster_bounds(&decoded).unwrap().bounds;
        assert_eq!((b.min_x(), b.max_x()), (2.0, 14.0));
    }
}
