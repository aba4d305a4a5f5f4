pub type Result<T> = std::result::Result<T, Error>;

/// Input the extractor or fitter cannot work with.
///
/// Every variant describes malformed input; nothing here is retried internally. Callers are
/// expected to surface these as a recoverable "upload rejected" notification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed SVG: {message}")]
    MalformedSvg { message: String },

    #[error("Malformed image: {message}")]
    MalformedImage { message: String },

    #[error("Shape bounds have zero area ({width}x{height})")]
    ZeroAreaBounds { width: f64, height: f64 },

    #[error("Containment region needs at least 3 vertices, got {vertices}")]
    DegenerateRegion { vertices: usize },

    #[error("Containment rectangle must have a positive size, got {width}x{height}")]
    EmptyRectRegion { width: f64, height: f64 },

    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },

    #[error("Padding must be a percentage in 0..=100, got {padding_pct}")]
    InvalidPadding { padding_pct: f64 },

    #[error("Fit option {what} must be at most {max}, got {value}")]
    FitOptionOutOfRange {
        what: &'static str,
        value: u64,
        max: u64,
    },

    #[error("Invalid SVG path data: {message}")]
    InvalidPathData { message: String },
}

impl From<roxmltree::Error> for Error {
    fn from(value: roxmltree::Error) -> Self {
        Self::MalformedSvg {
            message: value.to_string(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(value: image::ImageError) -> Self {
        Self::MalformedImage {
            message: value.to_string(),
        }
    }
}
