//! Built-in target regions: the single-logo outline and the two-logo lockup canvas.

use logofit_core::geom::{Box2D, Point, Size, point};
use logofit_core::{ContainmentRegion, DEFAULT_FLATTEN_STEP};
use serde::{Deserialize, Serialize};

/// Canvas the outline mask lives on.
pub const OUTLINE_CANVAS: Size = Size::new(1250.0, 700.0);

/// Hexagonal outline used when no mask asset is supplied.
pub const DEFAULT_OUTLINE_VERTICES: [(f64, f64); 6] = [
    (400.0, 150.0),
    (600.0, 250.0),
    (600.0, 450.0),
    (400.0, 550.0),
    (200.0, 450.0),
    (200.0, 250.0),
];

pub const DEFAULT_OUTLINE_CENTER: (f64, f64) = (400.0, 350.0);

pub const LOCKUP_CANVAS: Size = Size::new(1920.0, 1080.0);
pub const LOCKUP_PADDING: f64 = 120.0;
pub const SEPARATOR_WIDTH: f64 = 8.0;

pub fn default_outline_region() -> logofit_core::Result<ContainmentRegion> {
    ContainmentRegion::new(
        DEFAULT_OUTLINE_VERTICES
            .iter()
            .map(|&(x, y)| point(x, y))
            .collect(),
        point(DEFAULT_OUTLINE_CENTER.0, DEFAULT_OUTLINE_CENTER.1),
    )
}

/// Outline mask asset: a stroke path for display, a fill path for containment, and the
/// target center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineMask {
    pub outline_path: String,
    pub fill_path: String,
    pub center: Point,
}

impl OutlineMask {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Flattens `fill_path` into a dense polygon centered on `center`.
    pub fn region(&self) -> logofit_core::Result<ContainmentRegion> {
        ContainmentRegion::from_svg_path(&self.fill_path, DEFAULT_FLATTEN_STEP, self.center)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Size of the fixed partner logo's slot.
    pub fn partner_box(self) -> Size {
        match self {
            Self::Horizontal => Size::new(692.0, 132.0),
            Self::Vertical => Size::new(480.0, 370.0),
        }
    }

    pub fn separator_height(self) -> f64 {
        match self {
            Self::Horizontal => 304.0,
            Self::Vertical => 550.0,
        }
    }
}

/// Two logos side by side on [`LOCKUP_CANVAS`], split by a vertical separator. The uploaded
/// logo goes in the right-hand partner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockupLayout {
    pub orientation: Orientation,
}

impl LockupLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// Slot for the uploaded logo: the partner box centered in the right half, inset by
    /// the canvas padding and never pushed outside its half.
    pub fn partner_area(&self) -> Box2D {
        let slot = self.orientation.partner_box();
        let right_start = LOCKUP_CANVAS.width / 2.0 + SEPARATOR_WIDTH + LOCKUP_PADDING;
        let right_width = LOCKUP_CANVAS.width - right_start - LOCKUP_PADDING;
        let inner_height = LOCKUP_CANVAS.height - 2.0 * LOCKUP_PADDING;

        let x = right_start + ((right_width - slot.width) / 2.0).max(0.0);
        let y = LOCKUP_PADDING + ((inner_height - slot.height) / 2.0).max(0.0);
        Box2D::new(point(x, y), point(x + slot.width, y + slot.height))
    }

    pub fn partner_region(&self) -> logofit_core::Result<ContainmentRegion> {
        let area = self.partner_area();
        ContainmentRegion::from_rect(area.min.x, area.min.y, area.width(), area.height())
    }

    /// Separator bar, centered on the canvas.
    pub fn separator(&self) -> Box2D {
        let height = self.orientation.separator_height();
        let x = LOCKUP_CANVAS.width / 2.0 - SEPARATOR_WIDTH / 2.0;
        let y = (LOCKUP_CANVAS.height - height) / 2.0;
        Box2D::new(point(x, y), point(x + SEPARATOR_WIDTH, y + height))
    }
}

/// Which target a logo is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    #[default]
    Outline,
    LockupHorizontal,
    LockupVertical,
}

impl FitMode {
    pub fn lockup(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::LockupHorizontal,
            Orientation::Vertical => Self::LockupVertical,
        }
    }

    pub fn orientation(self) -> Option<Orientation> {
        match self {
            Self::Outline => None,
            Self::LockupHorizontal => Some(Orientation::Horizontal),
            Self::LockupVertical => Some(Orientation::Vertical),
        }
    }

    /// Outline fits leave a margin; lockup slots are already sized for the logo.
    pub fn default_padding_pct(self) -> f64 {
        match self {
            Self::Outline => 10.0,
            Self::LockupHorizontal | Self::LockupVertical => 0.0,
        }
    }

    /// Region for this mode; `mask` overrides the built-in outline.
    pub fn region(self, mask: Option<&OutlineMask>) -> logofit_core::Result<ContainmentRegion> {
        match (self.orientation(), mask) {
            (Some(orientation), _) => LockupLayout::new(orientation).partner_region(),
            (None, Some(mask)) => mask.region(),
            (None, None) => default_outline_region(),
        }
    }
}
