#![forbid(unsafe_code)]

//! Headless geometry for placing logos inside target regions.
//!
//! - [`bounds`]: tight bounding boxes of SVG documents and RGBA rasters
//! - [`region`]: containment polygons with a designated target center
//! - [`fit`]: maximum uniform scale + centering offset by perimeter sampling and bisection
//!
//! Everything here is synchronous and pure; callers own any state.

pub mod bounds;
mod error;
pub mod fit;
pub mod geom;
pub mod path;
pub mod region;

pub use bounds::{
    BoundsSource, RasterExtraction, Shape, ShapeBounds, SvgExtraction, decode_raster,
    extract_bounds, extract_raster_bounds, extract_svg_bounds, extract_svg_bounds_detailed,
};
pub use error::{Error, Result};
pub use fit::{
    FitOptions, FitReport, MAX_ITERATIONS, MAX_SAMPLES, Transform, centering_offset, fit,
    fit_with, initial_estimate, is_contained, sample_perimeter,
};
pub use path::MAX_FLATTENED_VERTICES;
pub use region::{ContainmentRegion, DEFAULT_FLATTEN_STEP, point_in_polygon};
