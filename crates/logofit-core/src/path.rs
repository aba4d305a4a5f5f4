//! SVG path-data helpers: tight extents of transformed paths and polyline flattening.
//!
//! Path data goes through `svgtypes`' simplifying parser, so every segment arrives as an
//! absolute move/line/cubic/quadratic/close (arcs and smooth curves are already converted).

use crate::geom::{Affine, Extent, Point, include, point};
use crate::{Error, Result};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

/// Upper bound on the polygon [`flatten_path`] will produce.
pub const MAX_FLATTENED_VERTICES: usize = 20_000;

/// Magic constant for approximating a quarter ellipse with one cubic.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Result of walking a path: the extent of everything parsed so far and the first parse
/// error, if any. SVG renderers draw a path up to its first error, so the partial extent is
/// still meaningful.
#[derive(Debug, Clone)]
pub(crate) struct PathExtent {
    pub(crate) extent: Option<Extent>,
    pub(crate) error: Option<String>,
}

pub(crate) fn path_extent(d: &str, ctm: &Affine) -> PathExtent {
    let mut extent: Option<Extent> = None;
    let mut current = point(0.0, 0.0);
    let mut start = point(0.0, 0.0);

    for segment in SimplifyingPathParser::from(d) {
        let segment = match segment {
            Ok(s) => s,
            Err(err) => {
                return PathExtent {
                    extent,
                    error: Some(err.to_string()),
                };
            }
        };
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                current = point(x, y);
                start = current;
                include(&mut extent, ctm.transform_point(current));
            }
            SimplePathSegment::LineTo { x, y } => {
                current = point(x, y);
                include(&mut extent, ctm.transform_point(current));
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let p1 = point(x1, y1);
                let p2 = point(x2, y2);
                let p3 = point(x, y);
                cubic_include_bounds(
                    &mut extent,
                    [
                        ctm.transform_point(current),
                        ctm.transform_point(p1),
                        ctm.transform_point(p2),
                        ctm.transform_point(p3),
                    ],
                );
                current = p3;
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let p1 = point(x1, y1);
                let p2 = point(x, y);
                let [c0, c1, c2, c3] = quadratic_to_cubic(current, p1, p2);
                cubic_include_bounds(
                    &mut extent,
                    [
                        ctm.transform_point(c0),
                        ctm.transform_point(c1),
                        ctm.transform_point(c2),
                        ctm.transform_point(c3),
                    ],
                );
                current = p2;
            }
            SimplePathSegment::ClosePath => {
                current = start;
            }
        }
    }

    PathExtent {
        extent,
        error: None,
    }
}

/// Extent of an axis-aligned ellipse after `ctm`, via its four cubic quadrants.
pub(crate) fn ellipse_extent(cx: f64, cy: f64, rx: f64, ry: f64, ctm: &Affine) -> Option<Extent> {
    let mut extent = None;
    for quadrant in ellipse_cubics(cx, cy, rx, ry) {
        cubic_include_bounds(&mut extent, quadrant.map(|p| ctm.transform_point(p)));
    }
    extent
}

fn ellipse_cubics(cx: f64, cy: f64, rx: f64, ry: f64) -> [[Point; 4]; 4] {
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let right = point(cx + rx, cy);
    let bottom = point(cx, cy + ry);
    let left = point(cx - rx, cy);
    let top = point(cx, cy - ry);
    [
        [right, point(cx + rx, cy + ky), point(cx + kx, cy + ry), bottom],
        [bottom, point(cx - kx, cy + ry), point(cx - rx, cy + ky), left],
        [left, point(cx - rx, cy - ky), point(cx - kx, cy - ry), top],
        [top, point(cx + kx, cy - ry), point(cx + rx, cy - ky), right],
    ]
}

fn quadratic_to_cubic(p0: Point, p1: Point, p2: Point) -> [Point; 4] {
    // https://pomax.github.io/bezierinfo/#reordering
    let c1 = p0 + (p1 - p0) * (2.0 / 3.0);
    let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
    [p0, c1, c2, p2]
}

fn cubic_eval(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    ((a * t + b) * t + c) * t + p0
}

fn cubic_point(c: &[Point; 4], t: f64) -> Point {
    point(
        cubic_eval(c[0].x, c[1].x, c[2].x, c[3].x, t),
        cubic_eval(c[0].y, c[1].y, c[2].y, c[3].y, t),
    )
}

/// Parameters in (0, 1) where one coordinate of the cubic has a local extremum.
fn cubic_extrema_params(p0: f64, p1: f64, p2: f64, p3: f64) -> impl Iterator<Item = f64> {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    let qa = 3.0 * a;
    let qb = 2.0 * b;
    let qc = c;

    const EPS: f64 = 1e-12;
    let mut roots: [f64; 2] = [f64::NAN, f64::NAN];
    if qa.abs() <= EPS {
        if qb.abs() > EPS {
            roots[0] = -qc / qb;
        }
    } else {
        let disc = qb * qb - 4.0 * qa * qc;
        let tol = 1e-12 * (qb * qb + (4.0 * qa * qc).abs() + 1.0);
        if disc >= -tol {
            let s = disc.max(0.0).sqrt();
            roots[0] = (-qb + s) / (2.0 * qa);
            roots[1] = (-qb - s) / (2.0 * qa);
        }
    }
    roots.into_iter().filter(|t| *t > 0.0 && *t < 1.0)
}

fn cubic_include_bounds(extent: &mut Option<Extent>, c: [Point; 4]) {
    include(extent, c[0]);
    include(extent, c[3]);
    for t in cubic_extrema_params(c[0].x, c[1].x, c[2].x, c[3].x) {
        include(extent, cubic_point(&c, t));
    }
    for t in cubic_extrema_params(c[0].y, c[1].y, c[2].y, c[3].y) {
        include(extent, cubic_point(&c, t));
    }
}

/// Flattens the first subpath of `d` into a polygon with roughly `step` user units between
/// consecutive vertices.
///
/// Straight segments are resampled at `step`; curves are split into uniform parameter
/// steps sized from their control-polygon length. Later subpaths are ignored. Fails with
/// [`Error::InvalidPathData`] if the polygon would exceed [`MAX_FLATTENED_VERTICES`].
pub fn flatten_path(d: &str, step: f64) -> Result<Vec<Point>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::NonFinite {
            what: "path flattening step",
        });
    }

    let mut out: Vec<Point> = Vec::new();
    let mut current = point(0.0, 0.0);
    let mut start = point(0.0, 0.0);
    let mut started = false;

    for segment in SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|err| Error::InvalidPathData {
            message: err.to_string(),
        })?;
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                if started && out.len() > 1 {
                    break;
                }
                out.clear();
                current = point(x, y);
                start = current;
                out.push(current);
                started = true;
            }
            SimplePathSegment::LineTo { x, y } => {
                let to = point(x, y);
                push_line(&mut out, current, to, step)?;
                current = to;
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let c = [current, point(x1, y1), point(x2, y2), point(x, y)];
                push_cubic(&mut out, &c, step)?;
                current = c[3];
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let c = quadratic_to_cubic(current, point(x1, y1), point(x, y));
                push_cubic(&mut out, &c, step)?;
                current = c[3];
            }
            SimplePathSegment::ClosePath => {
                push_line(&mut out, current, start, step)?;
                break;
            }
        }
    }

    // The polygon is implicitly closed; drop a duplicated closing vertex.
    if out.len() > 1 {
        let first = out[0];
        let last = out[out.len() - 1];
        if (first - last).length() < 1e-9 {
            out.pop();
        }
    }
    Ok(out)
}

/// Number of pieces a segment of length `len` splits into, checked against the vertex cap.
fn segment_steps(out: &[Point], len: f64, step: f64) -> Result<usize> {
    let n = (len / step).ceil().max(1.0);
    if !n.is_finite() || out.len() as f64 + n > MAX_FLATTENED_VERTICES as f64 {
        return Err(Error::InvalidPathData {
            message: format!(
                "flattening at step {step} exceeds {MAX_FLATTENED_VERTICES} vertices"
            ),
        });
    }
    Ok(n as usize)
}

fn push_line(out: &mut Vec<Point>, from: Point, to: Point, step: f64) -> Result<()> {
    let n = segment_steps(out, (to - from).length(), step)?;
    for i in 1..=n {
        let t = i as f64 / n as f64;
        out.push(from.lerp(to, t));
    }
    Ok(())
}

fn push_cubic(out: &mut Vec<Point>, c: &[Point; 4], step: f64) -> Result<()> {
    let hull = (c[1] - c[0]).length() + (c[2] - c[1]).length() + (c[3] - c[2]).length();
    let n = segment_steps(out, hull, step)?;
    for i in 1..=n {
        let t = i as f64 / n as f64;
        out.push(cubic_point(c, t));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent_of(d: &str) -> Extent {
        let r = path_extent(d, &Affine::identity());
        assert!(r.error.is_none(), "unexpected error: {:?}", r.error);
        r.extent.expect("extent")
    }

    #[test]
    fn cubic_extent_uses_curve_extrema_not_control_points() {
        // Control points reach y=-100 but the curve itself peaks at y=-75.
        let e = extent_of("M0 0 C0 -100 100 -100 100 0");
        assert!((e.min_y - -75.0).abs() < 1e-9, "min_y = {}", e.min_y);
        assert_eq!((e.min_x, e.max_x, e.max_y), (0.0, 100.0, 0.0));
    }

    #[test]
    fn relative_commands_and_arcs_are_resolved() {
        let e = extent_of("m10 10 h20 v20 h-20 z");
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (10.0, 10.0, 30.0, 30.0));

        // Half circle of radius 10 bulging upwards from (0,0) to (20,0).
        let e = extent_of("M0 0 A10 10 0 0 1 20 0");
        assert!((e.min_y - -10.0).abs() < 1e-3, "min_y = {}", e.min_y);
    }

    #[test]
    fn extent_applies_transform_before_measuring() {
        let ctm = Affine::translation(5.0, 7.0).then_scale(2.0, 2.0);
        let e = path_extent("M0 0 L10 10", &ctm).extent.unwrap();
        assert_eq!((e.min_x, e.min_y, e.max_x, e.max_y), (10.0, 14.0, 30.0, 34.0));
    }

    #[test]
    fn malformed_path_keeps_partial_extent_and_reports_error() {
        let r = path_extent("M0 0 L10 10 L foo", &Affine::identity());
        assert!(r.error.is_some());
        let e = r.extent.unwrap();
        assert_eq!((e.max_x, e.max_y), (10.0, 10.0));
    }

    #[test]
    fn ellipse_extent_matches_radii() {
        let e = ellipse_extent(50.0, 40.0, 20.0, 10.0, &Affine::identity()).unwrap();
        assert!((e.min_x - 30.0).abs() < 1e-9);
        assert!((e.max_x - 70.0).abs() < 1e-9);
        assert!((e.min_y - 30.0).abs() < 1e-9);
        assert!((e.max_y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn flatten_square_samples_every_step() {
        let pts = flatten_path("M0 0 L10 0 L10 10 L0 10 Z", 2.5).unwrap();
        // 4 edges of length 10 at step 2.5, closing vertex dropped.
        assert_eq!(pts.len(), 16);
        assert_eq!(pts[0], point(0.0, 0.0));
        assert_eq!(pts[4], point(10.0, 0.0));
    }

    #[test]
    fn flatten_only_keeps_first_subpath() {
        let pts = flatten_path("M0 0 L4 0 L4 4 Z M100 100 L200 100", 4.0).unwrap();
        assert!(pts.iter().all(|p| p.x <= 4.0 && p.y <= 4.0));
    }

    #[test]
    fn flatten_rejects_bad_step_and_bad_data() {
        assert!(matches!(
            flatten_path("M0 0 L1 1", 0.0),
            Err(Error::NonFinite { .. })
        ));
        assert!(matches!(
            flatten_path("M0 0 L", 1.0),
            Err(Error::InvalidPathData { .. })
        ));
    }

    #[test]
    fn flatten_caps_the_vertex_count() {
        let long = format!("M0 0 L{} 0 L0 1 Z", 1.5 * MAX_FLATTENED_VERTICES as f64);
        assert!(matches!(
            flatten_path(&long, 1.5),
            Err(Error::InvalidPathData { .. })
        ));
        let huge = "M0 0 C0 -1e300 1e300 -1e300 1e300 0 Z";
        assert!(flatten_path(huge, 1.5).is_err());

        let pts = flatten_path("M0 0 L9000 0 L0 1 Z", 1.5).unwrap();
        assert!(pts.len() > 10_000 && pts.len() <= MAX_FLATTENED_VERTICES);
    }
}
