//! Interactive placement state for one logo: the fitted transform plus manual adjustments.

use crate::config::FitConfig;
use crate::ingest::LoadedLogo;
use crate::Result;
use logofit_core::geom::Point;
use logofit_core::{ContainmentRegion, FitOptions, FitReport, Transform, centering_offset, fit_with};
use serde::{Deserialize, Serialize};

pub const NUDGE_FINE: f64 = 1.0;
pub const NUDGE_STEP: f64 = 5.0;
pub const NUDGE_COARSE: f64 = 10.0;

pub const MAX_SCALE_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn unit(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Preview toggles carried alongside the transform. They never affect fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFlags {
    pub show_outline: bool,
    pub show_canvas: bool,
    pub dark_canvas: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_outline: true,
            show_canvas: false,
            dark_canvas: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Placed {
    logo: LoadedLogo,
    transform: Transform,
    base_scale: f64,
    scale_factor: f64,
    initial: Transform,
}

/// Owns the current logo and its placement inside one target region.
///
/// Every edit returns whether it changed anything; with no logo loaded edits are no-ops.
#[derive(Debug, Clone)]
pub struct LogoSession {
    region: ContainmentRegion,
    padding_pct: f64,
    options: FitOptions,
    placed: Option<Placed>,
    pub display: DisplayFlags,
}

fn warn_if_self_intersecting(region: &ContainmentRegion) {
    if region.is_self_intersecting() {
        tracing::warn!(
            vertices = region.vertices().len(),
            "containment polygon self-intersects; even-odd containment may be surprising"
        );
    }
}

impl LogoSession {
    pub fn new(region: ContainmentRegion, padding_pct: f64) -> Self {
        warn_if_self_intersecting(&region);
        Self {
            region,
            padding_pct,
            options: FitOptions::default(),
            placed: None,
            display: DisplayFlags::default(),
        }
    }

    pub fn from_config(config: &FitConfig) -> Result<Self> {
        Ok(Self::new(config.region()?, config.padding_pct()).with_options(config.fit))
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn region(&self) -> &ContainmentRegion {
        &self.region
    }

    pub fn padding_pct(&self) -> f64 {
        self.padding_pct
    }

    pub fn logo(&self) -> Option<&LoadedLogo> {
        self.placed.as_ref().map(|p| &p.logo)
    }

    pub fn transform(&self) -> Option<Transform> {
        self.placed.as_ref().map(|p| p.transform)
    }

    pub fn initial_transform(&self) -> Option<Transform> {
        self.placed.as_ref().map(|p| p.initial)
    }

    pub fn base_scale(&self) -> Option<f64> {
        self.placed.as_ref().map(|p| p.base_scale)
    }

    pub fn scale_factor(&self) -> Option<f64> {
        self.placed.as_ref().map(|p| p.scale_factor)
    }

    /// Center of the logo's bounds in its own coordinate space.
    pub fn anchor(&self) -> Option<Point> {
        self.placed.as_ref().map(|p| p.logo.bounds.center())
    }

    /// Fits `logo` into the current region and makes it the session's logo.
    ///
    /// On error the previous logo, if any, stays in place.
    pub fn load(&mut self, logo: LoadedLogo) -> Result<FitReport> {
        let report = fit_with(&logo.bounds, &self.region, self.padding_pct, &self.options)?;
        tracing::debug!(
            scale = report.transform.scale,
            offset_x = report.transform.offset_x,
            offset_y = report.transform.offset_y,
            "logo placed"
        );
        self.placed = Some(Placed {
            logo,
            transform: report.transform,
            base_scale: report.transform.scale,
            scale_factor: 1.0,
            initial: report.transform,
        });
        Ok(report)
    }

    pub fn clear(&mut self) -> Option<LoadedLogo> {
        self.placed.take().map(|p| p.logo)
    }

    pub fn nudge(&mut self, direction: Direction, amount: f64) -> bool {
        let Some(placed) = self.placed.as_mut() else {
            return false;
        };
        if !amount.is_finite() {
            return false;
        }
        let (dx, dy) = direction.unit();
        placed.transform.offset_x += dx * amount;
        placed.transform.offset_y += dy * amount;
        tracing::trace!(?direction, amount, "nudged logo");
        true
    }

    /// Sets `scale = base_scale * factor`, clamping `factor` to `0..=2`. The logo's center
    /// stays where it is.
    pub fn set_scale_factor(&mut self, factor: f64) -> bool {
        let Some(placed) = self.placed.as_mut() else {
            return false;
        };
        if factor.is_nan() {
            return false;
        }
        let factor = factor.clamp(0.0, MAX_SCALE_FACTOR);
        let local = placed.logo.bounds.center();
        let pinned = placed.transform.apply(local);
        let scale = placed.base_scale * factor;

        placed.scale_factor = factor;
        placed.transform = Transform {
            scale,
            offset_x: pinned.x - local.x * scale,
            offset_y: pinned.y - local.y * scale,
        };
        true
    }

    /// Moves the logo's center back onto the region's target center at the current scale.
    pub fn center(&mut self) -> bool {
        let Some(placed) = self.placed.as_mut() else {
            return false;
        };
        let offset = centering_offset(
            &placed.logo.bounds,
            placed.transform.scale,
            self.region.target_center(),
        );
        placed.transform.offset_x = offset.x;
        placed.transform.offset_y = offset.y;
        true
    }

    /// Returns to the transform computed when the logo was loaded or the region last changed.
    pub fn reset(&mut self) -> bool {
        let Some(placed) = self.placed.as_mut() else {
            return false;
        };
        placed.transform = placed.initial;
        placed.base_scale = placed.initial.scale;
        placed.scale_factor = 1.0;
        true
    }

    /// Fits the current logo again, discarding manual edits but keeping the initial
    /// transform used by [`LogoSession::reset`].
    pub fn refit(&mut self) -> Result<Option<FitReport>> {
        let Some(placed) = self.placed.as_mut() else {
            return Ok(None);
        };
        let report = fit_with(
            &placed.logo.bounds,
            &self.region,
            self.padding_pct,
            &self.options,
        )?;
        placed.transform = report.transform;
        placed.base_scale = report.transform.scale;
        placed.scale_factor = 1.0;
        Ok(Some(report))
    }

    /// Switches to another target (e.g. outline to lockup) and refits. The new fit also
    /// becomes the reset point. Nothing changes if the fit fails.
    pub fn set_region(
        &mut self,
        region: ContainmentRegion,
        padding_pct: f64,
    ) -> Result<Option<FitReport>> {
        if !(0.0..=100.0).contains(&padding_pct) {
            return Err(logofit_core::Error::InvalidPadding { padding_pct }.into());
        }
        let report = match self.placed.as_ref() {
            Some(placed) => Some(fit_with(
                &placed.logo.bounds,
                &region,
                padding_pct,
                &self.options,
            )?),
            None => None,
        };
        warn_if_self_intersecting(&region);
        self.region = region;
        self.padding_pct = padding_pct;
        if let (Some(placed), Some(report)) = (self.placed.as_mut(), report) {
            placed.transform = report.transform;
            placed.base_scale = report.transform.scale;
            placed.scale_factor = 1.0;
            placed.initial = report.transform;
        }
        Ok(report)
    }
}
