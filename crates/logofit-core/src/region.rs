//! Containment regions: the polygon a logo must stay inside, plus the point it is centered on.

use crate::geom::{Box2D, Point, point};
use crate::path::flatten_path;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default spacing between flattened vertices when a region is built from path data.
pub const DEFAULT_FLATTEN_STEP: f64 = 1.5;

/// A simple closed polygon plus the anchor a fitted shape is centered on.
///
/// The target center is caller-chosen; it is not required to be the polygon centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RegionRepr")]
pub struct ContainmentRegion {
    vertices: Vec<Point>,
    target_center: Point,
}

impl ContainmentRegion {
    pub fn new(vertices: Vec<Point>, target_center: Point) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::DegenerateRegion {
                vertices: vertices.len(),
            });
        }
        if !vertices.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return Err(Error::NonFinite {
                what: "region vertices",
            });
        }
        if !(target_center.x.is_finite() && target_center.y.is_finite()) {
            return Err(Error::NonFinite {
                what: "region target center",
            });
        }

        Ok(Self {
            vertices,
            target_center,
        })
    }

    /// Axis-aligned rectangle centered on its own middle (lockup partner areas).
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::EmptyRectRegion { width, height });
        }
        Self::new(
            vec![
                point(x, y),
                point(x + width, y),
                point(x + width, y + height),
                point(x, y + height),
            ],
            point(x + width / 2.0, y + height / 2.0),
        )
    }

    /// Dense polygon sampled along the first subpath of SVG path data.
    pub fn from_svg_path(d: &str, step: f64, target_center: Point) -> Result<Self> {
        Self::new(flatten_path(d, step)?, target_center)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn target_center(&self) -> Point {
        self.target_center
    }

    pub fn bounding_rect(&self) -> Box2D {
        Box2D::from_points(self.vertices.iter().copied())
    }

    /// Inside-or-on-boundary test.
    pub fn contains(&self, p: Point) -> bool {
        on_boundary(p, &self.vertices) || point_in_polygon(p, &self.vertices)
    }

    /// True if any two non-adjacent edges properly cross.
    ///
    /// Edges are swept left to right and only tested against edges whose x-ranges overlap,
    /// so dense flattened outlines stay close to `O(n log n)`. Not run on construction.
    pub fn is_self_intersecting(&self) -> bool {
        let v = &self.vertices;
        let n = v.len();
        if n < 4 {
            return false;
        }
        let edge = |i: usize| (v[i], v[(i + 1) % n]);
        let x_range = |i: usize| {
            let (a, b) = edge(i);
            (a.x.min(b.x), a.x.max(b.x))
        };

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| x_range(a).0.total_cmp(&x_range(b).0));

        let mut active: Vec<usize> = Vec::new();
        for i in order {
            let (left, _) = x_range(i);
            active.retain(|&j| x_range(j).1 >= left);
            let (a0, a1) = edge(i);
            for &j in &active {
                let gap = i.abs_diff(j);
                if gap <= 1 || gap == n - 1 {
                    continue;
                }
                let (b0, b1) = edge(j);
                if segments_cross(a0, a1, b0, b1) {
                    return true;
                }
            }
            active.push(i);
        }
        false
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionRepr {
    vertices: Vec<Point>,
    target_center: Point,
}

impl TryFrom<RegionRepr> for ContainmentRegion {
    type Error = Error;

    fn try_from(value: RegionRepr) -> Result<Self> {
        Self::new(value.vertices, value.target_center)
    }
}

/// Even-odd ray casting: counts crossings of a horizontal ray from `p` towards +x.
///
/// Points exactly on an edge may land on either side; use [`ContainmentRegion::contains`]
/// for boundary-inclusive tests.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_boundary(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    (0..n).any(|i| on_segment(p, polygon[i], polygon[(i + 1) % n]))
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let scale = 1.0_f64
        .max(a.x.abs())
        .max(a.y.abs())
        .max(b.x.abs())
        .max(b.y.abs());
    let eps = 1e-9 * scale;

    let ab = b - a;
    let ap = p - a;
    let len = ab.length();
    if len <= eps {
        return ap.length() <= eps;
    }
    // Distance from the supporting line, then the projection must fall inside the segment.
    if ab.cross(ap).abs() / len > eps {
        return false;
    }
    let t = ab.dot(ap) / (len * len);
    (-eps / len..=1.0 + eps / len).contains(&t)
}

fn cross_sign(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Proper crossing only; touching endpoints and collinear overlaps do not count.
fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let d1 = cross_sign(b0, b1, a0);
    let d2 = cross_sign(b0, b1, a1);
    let d3 = cross_sign(a0, a1, b0);
    let d4 = cross_sign(a0, a1, b1);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
