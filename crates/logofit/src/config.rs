use crate::{Error, Result};
use crate::layout::{FitMode, OutlineMask};
use logofit_core::{ContainmentRegion, FitOptions};
use serde::{Deserialize, Serialize};

/// Everything needed to pick a target region and fit into it, loadable from JSON:
///
/// ```json
/// { "mode": "lockup-horizontal", "paddingPct": 5, "fit": { "samples": 80 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitConfig {
    pub mode: FitMode,
    /// Falls back to [`FitMode::default_padding_pct`] when unset.
    pub padding_pct: Option<f64>,
    /// Replaces the built-in outline in [`FitMode::Outline`]; ignored for lockups.
    pub mask: Option<OutlineMask>,
    pub fit: FitOptions,
}

impl FitConfig {
    /// Parses and validates a config; out-of-range values are [`Error::InvalidConfig`].
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(padding_pct) = self.padding_pct {
            if !(0.0..=100.0).contains(&padding_pct) {
                return Err(Error::InvalidConfig {
                    message: format!("paddingPct must be within 0..=100, got {padding_pct}"),
                });
            }
        }
        self.fit.validate().map_err(|err| Error::InvalidConfig {
            message: format!("fit: {err}"),
        })
    }

    pub fn for_mode(mode: FitMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn padding_pct(&self) -> f64 {
        self.padding_pct
            .unwrap_or_else(|| self.mode.default_padding_pct())
    }

    pub fn region(&self) -> Result<ContainmentRegion> {
        Ok(self.mode.region(self.mask.as_ref())?)
    }
}
