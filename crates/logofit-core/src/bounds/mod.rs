//! Tight axis-aligned bounds for vector and raster logos.

mod raster;
mod vector;

pub use raster::{RasterExtraction, decode_raster, extract_raster_bounds};
pub use vector::{BoundsSource, SvgExtraction, extract_svg_bounds, extract_svg_bounds_detailed};

use crate::geom::{Box2D, Extent, Point, point};
use crate::{Error, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Tight axis-aligned bounding box of a shape in its own coordinate space.
///
/// `width`/`height` are derived from the extrema and are never negative. Values are always
/// finite; construct through [`ShapeBounds::new`] or [`ShapeBounds::from_origin_size`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BoundsExtrema")]
pub struct ShapeBounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    width: f64,
    height: f64,
}

impl ShapeBounds {
    /// Box used when a vector shape has neither measurable content nor a usable viewport.
    pub const DEFAULT: Self = Self {
        min_x: 0.0,
        max_x: 100.0,
        min_y: 0.0,
        max_y: 100.0,
        width: 100.0,
        height: 100.0,
    };

    /// Builds bounds from two corners; swapped extrema are normalized.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return Err(Error::NonFinite {
                what: "shape bounds",
            });
        }
        let (min_x, max_x) = if min_x <= max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (min_y, max_y) = if min_y <= max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        let (width, height) = (max_x - min_x, max_y - min_y);
        if !(width.is_finite() && height.is_finite()) {
            return Err(Error::NonFinite {
                what: "shape bounds size",
            });
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width,
            height,
        })
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(x, y, x + width, y + height)
    }

    pub(crate) fn from_extent(extent: Extent) -> Result<Self> {
        Self::new(extent.min_x, extent.min_y, extent.max_x, extent.max_y)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Point {
        point(
            self.min_x + self.width / 2.0,
            self.min_y + self.height / 2.0,
        )
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// The same box with its minimum corner moved to the origin.
    pub fn at_origin(&self) -> Self {
        Self {
            min_x: 0.0,
            max_x: self.width,
            min_y: 0.0,
            max_y: self.height,
            width: self.width,
            height: self.height,
        }
    }

    pub fn to_box2d(&self) -> Box2D {
        Box2D::new(point(self.min_x, self.min_y), point(self.max_x, self.max_y))
    }

    /// Fails with [`Error::ZeroAreaBounds`] unless both dimensions are positive.
    pub fn require_area(&self) -> Result<()> {
        if self.has_area() {
            Ok(())
        } else {
            Err(Error::ZeroAreaBounds {
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundsExtrema {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl TryFrom<BoundsExtrema> for ShapeBounds {
    type Error = Error;

    fn try_from(value: BoundsExtrema) -> Result<Self> {
        Self::new(value.min_x, value.min_y, value.max_x, value.max_y)
    }
}

/// A logo as handed to the extractor.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Svg(&'a str),
    Raster(&'a RgbaImage),
}

/// Tight bounds of `shape`.
///
/// For rasters this only reports the box; use [`extract_raster_bounds`] to also get the
/// cropped pixels.
pub fn extract_bounds(shape: Shape<'_>) -> Result<ShapeBounds> {
    match shape {
        Shape::Svg(text) => extract_svg_bounds(text),
        Shape::Raster(image) => Ok(extract_raster_bounds(image)?.bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_swapped_corners() {
        let b = ShapeBounds::new(10.0, 20.0, 0.0, 5.0).unwrap();
        assert_eq!((b.min_x(), b.min_y(), b.max_x(), b.max_y()), (0.0, 5.0, 10.0, 20.0));
        assert_eq!((b.width(), b.height()), (10.0, 15.0));
        assert_eq!(b.center(), point(5.0, 12.5));
    }

    #[test]
    fn new_rejects_non_finite_values() {
        assert!(matches!(
            ShapeBounds::new(0.0, 0.0, f64::INFINITY, 1.0),
            Err(Error::NonFinite { .. })
        ));
    }

    #[test]
    fn new_rejects_extrema_whose_span_overflows() {
        assert!(matches!(
            ShapeBounds::new(-1.5e308, 0.0, 1.5e308, 1.0),
            Err(Error::NonFinite {
                what: "shape bounds size"
            })
        ));
        assert!(ShapeBounds::new(0.0, -1.5e308, 1.0, 1.5e308).is_err());
    }

    #[test]
    fn json_uses_camel_case_and_rederives_size() {
        let b = ShapeBounds::from_origin_size(1.0, 2.0, 3.0, 4.0).unwrap();
        let v = serde_json::to_value(b).unwrap();
        assert_eq!(v["minX"], 1.0);
        assert_eq!(v["maxY"], 6.0);
        assert_eq!(v["width"], 3.0);

        let parsed: ShapeBounds = serde_json::from_str(
            r#"{"minX":0,"maxX":50,"minY":0,"maxY":20,"width":999,"height":999}"#,
        )
        .unwrap();
        assert_eq!((parsed.width(), parsed.height()), (50.0, 20.0));
    }

    #[test]
    fn require_area_flags_flat_boxes() {
        let flat = ShapeBounds::new(0.0, 5.0, 10.0, 5.0).unwrap();
        assert!(matches!(
            flat.require_area(),
            Err(Error::ZeroAreaBounds { .. })
        ));
        assert!(ShapeBounds::DEFAULT.require_area().is_ok());
    }
}
