//! Turning uploaded bytes into an SVG document plus tight bounds.
//!
//! Loading is synchronous; callers finish their own (possibly async) file I/O first and then
//! hand the bytes to [`load_logo`].

use crate::{Error, Result};
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use logofit_core::{ShapeBounds, decode_raster, extract_raster_bounds, extract_svg_bounds};
use serde::Serialize;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoFormat {
    Svg,
    Png,
    Jpeg,
}

impl LogoFormat {
    /// Detects the format from the file name and leading bytes.
    ///
    /// A `.svg` name or XML/`<svg` text wins; otherwise PNG and JPEG are recognized by their
    /// magic bytes.
    pub fn sniff(bytes: &[u8], file_name: &str) -> Result<Self> {
        if file_name.to_ascii_lowercase().ends_with(".svg") || looks_like_svg(bytes) {
            return Ok(Self::Svg);
        }
        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Ok(Self::Png),
            Ok(ImageFormat::Jpeg) => Ok(Self::Jpeg),
            _ => Err(Error::UnsupportedFormat {
                name: file_name.to_string(),
            }),
        }
    }

    pub fn is_raster(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start().to_ascii_lowercase();
    text.starts_with("<?xml") || text.starts_with("<svg") || text.starts_with("<!doctype svg")
}

/// Converts a cropped raster logo into SVG markup.
///
/// Implementations are expected to produce a document whose user space matches the pixel
/// grid of `image`, i.e. a `viewBox` of `0 0 width height`.
pub trait Vectorizer {
    fn vectorize(&self, image: &RgbaImage) -> Result<String>;
}

/// Wraps the raster unchanged as a base64 PNG `<image>` inside an SVG of the same size.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedRaster;

impl Vectorizer for EmbeddedRaster {
    fn vectorize(&self, image: &RgbaImage) -> Result<String> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| Error::Vectorize {
                message: e.to_string(),
            })?;
        let data = base64::engine::general_purpose::STANDARD.encode(&png);
        let (w, h) = image.dimensions();
        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><image width="{w}" height="{h}" href="data:image/png;base64,{data}"/></svg>"#
        ))
    }
}

#[derive(Debug, Clone)]
pub struct LoadedLogo {
    /// SVG markup to place; raster input has already been vectorized.
    pub svg: String,
    pub format: LogoFormat,
    /// Tight bounds in the user space of `svg`.
    pub bounds: ShapeBounds,
}

/// Sniffs, decodes and measures an uploaded logo.
///
/// Rasters are cropped to their visible pixels before vectorizing, so the returned bounds
/// are those of the crop, re-based at the origin.
pub fn load_logo(bytes: &[u8], file_name: &str, vectorizer: &dyn Vectorizer) -> Result<LoadedLogo> {
    let format = LogoFormat::sniff(bytes, file_name)?;
    let logo = if format.is_raster() {
        let image = decode_raster(bytes)?;
        let crop = extract_raster_bounds(&image)?;
        LoadedLogo {
            svg: vectorizer.vectorize(&crop.image)?,
            format,
            bounds: crop.cropped_bounds(),
        }
    } else {
        let text = std::str::from_utf8(bytes).map_err(|e| logofit_core::Error::MalformedSvg {
            message: e.to_string(),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        LoadedLogo {
            bounds: extract_svg_bounds(text)?,
            svg: text.to_string(),
            format,
        }
    };

    tracing::debug!(
        file_name,
        ?format,
        width = logo.bounds.width(),
        height = logo.bounds.height(),
        "loaded logo"
    );
    Ok(logo)
}
