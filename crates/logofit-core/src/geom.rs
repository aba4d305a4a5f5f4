#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Box2D = euclid::Box2D<f64, Unit>;
pub type Affine = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Running min/max over points, used while walking geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Extent {
    pub(crate) min_x: f64,
    pub(crate) min_y: f64,
    pub(crate) max_x: f64,
    pub(crate) max_y: f64,
}

impl Extent {
    pub(crate) fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub(crate) fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub(crate) fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub(crate) fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub(crate) fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

/// Folds `p` into an optional extent, starting one if needed.
pub(crate) fn include(extent: &mut Option<Extent>, p: Point) {
    match extent {
        Some(e) => e.include_point(p),
        None => *extent = Some(Extent::at(p)),
    }
}

pub(crate) fn affine_from_svg(t: &svgtypes::Transform) -> Affine {
    // SVG `matrix(a b c d e f)` maps (x, y) to (a*x + c*y + e, b*x + d*y + f), which is
    // exactly euclid's row-vector layout.
    Affine::new(t.a, t.b, t.c, t.d, t.e, t.f)
}
