#![forbid(unsafe_code)]

//! Logo placement on top of [`logofit_core`]: target presets, upload ingestion and an
//! editing session.
//!
//! ```no_run
//! use logofit::{EmbeddedRaster, FitConfig, LogoSession, load_logo};
//!
//! # fn main() -> logofit::Result<()> {
//! let bytes = std::fs::read("logo.png").unwrap_or_default();
//! let logo = load_logo(&bytes, "logo.png", &EmbeddedRaster)?;
//! let mut session = LogoSession::from_config(&FitConfig::default())?;
//! let report = session.load(logo)?;
//! println!("scale {}", report.transform.scale);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ingest;
pub mod layout;
pub mod session;

pub use config::FitConfig;
pub use ingest::{EmbeddedRaster, LoadedLogo, LogoFormat, Vectorizer, load_logo};
pub use layout::{FitMode, LockupLayout, Orientation, OutlineMask, default_outline_region};
pub use logofit_core;
pub use session::{Direction, DisplayFlags, LogoSession};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] logofit_core::Error),
    #[error("Unsupported logo format: {name}")]
    UnsupportedFormat { name: String },
    #[error("Vectorization failed: {message}")]
    Vectorize { message: String },
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
