//! Containment fitting: the largest uniform scale at which a shape's bounding box, centered
//! on the region's target center, stays inside the region polygon.
//!
//! The box is approximated by points sampled along its perimeter, and the scale is found by
//! bisection between `min_scale` and twice a coarse bounding-rect estimate.

use crate::bounds::ShapeBounds;
use crate::geom::{Point, Vector, point, vector};
use crate::region::ContainmentRegion;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Placement of a shape: its local origin goes to `(offset_x, offset_y)` and it is scaled
/// uniformly about that origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    pub fn offset(&self) -> Vector {
        vector(self.offset_x, self.offset_y)
    }

    /// Maps a point from the shape's local space to region space.
    pub fn apply(&self, p: Point) -> Point {
        point(
            self.offset_x + p.x * self.scale,
            self.offset_y + p.y * self.scale,
        )
    }

    pub fn map_bounds(&self, bounds: &ShapeBounds) -> Result<ShapeBounds> {
        let min = self.apply(point(bounds.min_x(), bounds.min_y()));
        let max = self.apply(point(bounds.max_x(), bounds.max_y()));
        ShapeBounds::new(min.x, min.y, max.x, max.y)
    }
}

/// Tuning knobs for [`fit_with`]. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitOptions {
    /// Total perimeter samples; each edge gets `max(2, ceil(samples / 4))`.
    pub samples: usize,
    pub max_iterations: u32,
    /// Bisection stops once `hi - lo` drops below this.
    pub tolerance: f64,
    /// Lower search bound, and the result when no tested scale fits.
    pub min_scale: f64,
    /// Applied to the bounding-rect estimate before the search doubles it.
    pub coarse_margin: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            samples: 40,
            max_iterations: 20,
            tolerance: 0.001,
            min_scale: 0.01,
            coarse_margin: 0.9,
        }
    }
}

/// Upper bound for [`FitOptions::samples`].
pub const MAX_SAMPLES: usize = 10_000;
/// Upper bound for [`FitOptions::max_iterations`]; bisection on `f64` stalls long before.
pub const MAX_ITERATIONS: u32 = 1_000;

impl FitOptions {
    /// Rejects tolerances, scales and margins that are not positive and finite, and sample or
    /// iteration counts above [`MAX_SAMPLES`] / [`MAX_ITERATIONS`].
    pub fn validate(&self) -> Result<()> {
        if self.samples > MAX_SAMPLES {
            return Err(Error::FitOptionOutOfRange {
                what: "samples",
                value: self.samples as u64,
                max: MAX_SAMPLES as u64,
            });
        }
        if self.max_iterations > MAX_ITERATIONS {
            return Err(Error::FitOptionOutOfRange {
                what: "maxIterations",
                value: u64::from(self.max_iterations),
                max: u64::from(MAX_ITERATIONS),
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.tolerance) {
            return Err(Error::NonFinite {
                what: "fit tolerance",
            });
        }
        if !positive(self.min_scale) {
            return Err(Error::NonFinite {
                what: "fit minimum scale",
            });
        }
        if !positive(self.coarse_margin) {
            return Err(Error::NonFinite {
                what: "fit coarse margin",
            });
        }
        Ok(())
    }
}

/// A fitted transform plus search diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub transform: Transform,
    /// Converged scale before the final padding shrink.
    pub search_scale: f64,
    pub iterations: u32,
    /// The search never moved meaningfully above `min_scale`: the shape does not fit.
    pub floor_limited: bool,
}

/// Fits `bounds` into `region` with default options.
pub fn fit(bounds: &ShapeBounds, region: &ContainmentRegion, padding_pct: f64) -> Result<Transform> {
    Ok(fit_with(bounds, region, padding_pct, &FitOptions::default())?.transform)
}

pub fn fit_with(
    bounds: &ShapeBounds,
    region: &ContainmentRegion,
    padding_pct: f64,
    options: &FitOptions,
) -> Result<FitReport> {
    bounds.require_area()?;
    validate_padding(padding_pct)?;
    options.validate()?;

    let center = region.target_center();
    let estimate = initial_estimate(bounds, region, padding_pct, options.coarse_margin);
    let mut lo = options.min_scale;
    let mut hi = (2.0 * estimate).max(options.min_scale);
    let mut best: Option<f64> = None;
    let mut iterations = 0;

    while iterations < options.max_iterations && hi - lo >= options.tolerance {
        iterations += 1;
        let mid = (lo + hi) / 2.0;
        if is_contained(bounds, mid, center, region, options.samples) {
            lo = mid;
            best = Some(mid);
        } else {
            hi = mid;
        }
    }

    let search_scale = best.unwrap_or(options.min_scale);
    let floor_limited = search_scale - options.min_scale < options.tolerance;
    let scale = search_scale * padding_factor(padding_pct);
    let offset = centering_offset(bounds, scale, center);

    tracing::debug!(
        estimate,
        search_scale,
        scale,
        iterations,
        padding_pct,
        "fitted shape into containment region"
    );
    if floor_limited {
        tracing::warn!(
            search_scale,
            min_scale = options.min_scale,
            "shape does not fit the region above the minimum scale"
        );
    }

    Ok(FitReport {
        transform: Transform {
            scale,
            offset_x: offset.x,
            offset_y: offset.y,
        },
        search_scale,
        iterations,
        floor_limited,
    })
}

/// Coarse scale from the region's bounding rectangle, shrunk by `padding_pct` per side.
pub fn initial_estimate(
    bounds: &ShapeBounds,
    region: &ContainmentRegion,
    padding_pct: f64,
    coarse_margin: f64,
) -> f64 {
    let rect = region.bounding_rect();
    let shrink = (1.0 - 2.0 * padding_pct / 100.0).max(0.1);
    let avail_w = rect.width() * shrink;
    let avail_h = rect.height() * shrink;
    (avail_w / bounds.width()).min(avail_h / bounds.height()) * coarse_margin
}

/// Points along the perimeter of `bounds` scaled by `scale` and offset by `offset`.
///
/// Each edge gets `max(2, ceil(samples / 4))` evenly spaced points including both corners,
/// walked top (left to right), right (top to bottom), bottom (right to left), left (bottom
/// to top). Shared corners appear twice. `samples` saturates at [`MAX_SAMPLES`].
pub fn sample_perimeter(
    bounds: &ShapeBounds,
    scale: f64,
    offset: Vector,
    samples: usize,
) -> Vec<Point> {
    let per_edge = samples.min(MAX_SAMPLES).div_ceil(4).max(2);
    let x0 = offset.x + bounds.min_x() * scale;
    let y0 = offset.y + bounds.min_y() * scale;
    let x1 = offset.x + bounds.max_x() * scale;
    let y1 = offset.y + bounds.max_y() * scale;

    let edges = [
        (point(x0, y0), point(x1, y0)),
        (point(x1, y0), point(x1, y1)),
        (point(x1, y1), point(x0, y1)),
        (point(x0, y1), point(x0, y0)),
    ];
    let last = (per_edge - 1) as f64;
    let mut out = Vec::with_capacity(per_edge * 4);
    for (from, to) in edges {
        for i in 0..per_edge {
            out.push(from.lerp(to, i as f64 / last));
        }
    }
    out
}

/// Whether the bounds, centered on `center` at `scale`, lie inside the region at every
/// perimeter sample.
pub fn is_contained(
    bounds: &ShapeBounds,
    scale: f64,
    center: Point,
    region: &ContainmentRegion,
    samples: usize,
) -> bool {
    let offset = centering_offset(bounds, scale, center);
    sample_perimeter(bounds, scale, offset, samples)
        .into_iter()
        .all(|p| region.contains(p))
}

/// Offset that puts the center of `bounds` on `center` at the given scale.
pub fn centering_offset(bounds: &ShapeBounds, scale: f64, center: Point) -> Vector {
    let local = bounds.center();
    vector(center.x - local.x * scale, center.y - local.y * scale)
}

fn validate_padding(padding_pct: f64) -> Result<()> {
    if padding_pct.is_finite() && (0.0..=100.0).contains(&padding_pct) {
        Ok(())
    } else {
        Err(Error::InvalidPadding { padding_pct })
    }
}

fn padding_factor(padding_pct: f64) -> f64 {
    (1.0 - padding_pct / 100.0).max(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_region() -> ContainmentRegion {
        ContainmentRegion::from_rect(0.0, 0.0, 100.0, 100.0).unwrap()
    }

    fn bounds(w: f64, h: f64) -> ShapeBounds {
        ShapeBounds::from_origin_size(0.0, 0.0, w, h).unwrap()
    }

    #[test]
    fn perimeter_walks_edges_in_order() {
        let pts = sample_perimeter(&bounds(10.0, 4.0), 1.0, vector(0.0, 0.0), 8);
        assert_eq!(pts.len(), 8);
        assert_eq!(
            pts,
            vec![
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(10.0, 0.0),
                point(10.0, 4.0),
                point(10.0, 4.0),
                point(0.0, 4.0),
                point(0.0, 4.0),
                point(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn perimeter_never_drops_below_two_per_edge() {
        assert_eq!(sample_perimeter(&bounds(1.0, 1.0), 1.0, vector(0.0, 0.0), 0).len(), 8);
        assert_eq!(sample_perimeter(&bounds(1.0, 1.0), 1.0, vector(0.0, 0.0), 41).len(), 44);
    }

    #[test]
    fn perimeter_applies_scale_then_offset() {
        let b = ShapeBounds::from_origin_size(5.0, 5.0, 10.0, 10.0).unwrap();
        let pts = sample_perimeter(&b, 2.0, vector(1.0, -1.0), 12);
        assert_eq!(pts.len(), 12);
        assert_eq!(pts[0], point(11.0, 9.0));
        assert_eq!(pts[1], point(21.0, 9.0));
        assert_eq!(pts[2], point(31.0, 9.0));
        assert_eq!(pts[5], point(31.0, 29.0));
    }

    #[test]
    fn centering_offset_places_box_center_on_target() {
        let b = ShapeBounds::from_origin_size(10.0, 20.0, 40.0, 10.0).unwrap();
        let t = Transform {
            scale: 3.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let o = centering_offset(&b, t.scale, point(500.0, 400.0));
        let placed = Transform {
            offset_x: o.x,
            offset_y: o.y,
            ..t
        };
        assert_eq!(placed.apply(b.center()), point(500.0, 400.0));
    }

    #[test]
    fn estimate_uses_limiting_dimension_and_margin() {
        let est = initial_estimate(&bounds(50.0, 20.0), &square_region(), 0.0, 0.9);
        assert!((est - 1.8).abs() < 1e-12);
        let padded = initial_estimate(&bounds(50.0, 20.0), &square_region(), 10.0, 1.0);
        assert!((padded - 1.6).abs() < 1e-12);
        let clamped = initial_estimate(&bounds(50.0, 20.0), &square_region(), 80.0, 1.0);
        assert!((clamped - 0.2).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_padding_and_flat_bounds() {
        let r = square_region();
        for p in [-1.0, 100.5, f64::NAN] {
            assert!(matches!(
                fit(&bounds(10.0, 10.0), &r, p),
                Err(Error::InvalidPadding { .. })
            ));
        }
        let flat = ShapeBounds::new(0.0, 0.0, 10.0, 0.0).unwrap();
        assert!(matches!(fit(&flat, &r, 0.0), Err(Error::ZeroAreaBounds { .. })));
    }

    #[test]
    fn rejects_nonsense_options() {
        let opts = FitOptions {
            tolerance: 0.0,
            ..FitOptions::default()
        };
        assert!(fit_with(&bounds(10.0, 10.0), &square_region(), 0.0, &opts).is_err());
    }

    #[test]
    fn rejects_oversized_sample_and_iteration_counts() {
        let opts = FitOptions {
            samples: usize::MAX,
            ..FitOptions::default()
        };
        assert!(matches!(
            fit_with(&bounds(10.0, 10.0), &square_region(), 0.0, &opts),
            Err(Error::FitOptionOutOfRange {
                what: "samples",
                ..
            })
        ));
        let opts = FitOptions {
            max_iterations: u32::MAX,
            ..FitOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(Error::FitOptionOutOfRange {
                what: "maxIterations",
                ..
            })
        ));
        let at_limit = FitOptions {
            samples: MAX_SAMPLES,
            max_iterations: MAX_ITERATIONS,
            ..FitOptions::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn perimeter_sampling_saturates_huge_counts() {
        let pts = sample_perimeter(&bounds(10.0, 10.0), 1.0, vector(0.0, 0.0), usize::MAX);
        assert_eq!(pts.len(), MAX_SAMPLES);
    }

    #[test]
    fn fills_square_exactly_at_zero_padding() {
        let report = fit_with(&bounds(50.0, 20.0), &square_region(), 0.0, &FitOptions::default())
            .unwrap();
        let t = report.transform;
        assert!(t.scale <= 2.0 + 1e-6);
        assert!(t.scale > 2.0 - 0.001);
        assert!(!report.floor_limited);
        assert!(report.iterations <= 20);
        let c = t.apply(point(25.0, 10.0));
        assert!((c.x - 50.0).abs() < 1e-9 && (c.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn padding_shrinks_the_final_scale() {
        let report =
            fit_with(&bounds(50.0, 20.0), &square_region(), 10.0, &FitOptions::default()).unwrap();
        assert!((report.transform.scale - report.search_scale * 0.9).abs() < 1e-12);
    }

    #[test]
    fn target_center_on_a_vertex_is_floor_limited() {
        // Target center sits on a vertex, so no positive scale keeps the box inside.
        let wedge = ContainmentRegion::new(
            vec![point(0.0, 0.0), point(100.0, 0.0), point(0.0, 100.0)],
            point(0.0, 0.0),
        )
        .unwrap();
        let report = fit_with(&bounds(10.0, 10.0), &wedge, 0.0, &FitOptions::default()).unwrap();
        assert!(report.floor_limited);
        assert_eq!(report.search_scale, 0.01);
    }

    #[test]
    fn transform_serializes_camel_case() {
        let t = Transform {
            scale: 1.5,
            offset_x: 2.0,
            offset_y: -3.0,
        };
        let v = serde_json::to_value(t).unwrap();
        assert_eq!(v["offsetX"], 2.0);
        assert_eq!(v["offsetY"], -3.0);
        let opts: FitOptions = serde_json::from_str(r#"{"samples": 80}"#).unwrap();
        assert_eq!(opts.samples, 80);
        assert_eq!(opts.max_iterations, 20);
    }
}
