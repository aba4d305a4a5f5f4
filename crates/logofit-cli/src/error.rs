//! Exit statuses of the `logofit` binary and how library errors map onto them.

use logofit::logofit_core::Error as CoreError;
use std::fmt;

/// Process exit status. `0` is success and is never represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad flags or flag values.
    Usage = 1,
    /// Unreadable, malformed or unsupported logo, mask or config file.
    Input = 2,
    /// The inputs were fine but fitting failed.
    Processing = 3,
}

impl ErrorCode {
    fn of(err: &logofit::Error) -> Self {
        match err {
            logofit::Error::UnsupportedFormat { .. }
            | logofit::Error::Config(_)
            | logofit::Error::InvalidConfig { .. } => Self::Input,
            logofit::Error::Core(
                CoreError::MalformedSvg { .. }
                | CoreError::MalformedImage { .. }
                | CoreError::InvalidPathData { .. },
            ) => Self::Input,
            logofit::Error::Core(CoreError::InvalidPadding { .. }) => Self::Usage,
            logofit::Error::Core(_) | logofit::Error::Vectorize { .. } => Self::Processing,
        }
    }
}

/// One line for stderr plus the status to exit with.
#[derive(Debug)]
pub struct CliError {
    code: ErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<logofit::Error> for CliError {
    fn from(value: logofit::Error) -> Self {
        Self::new(ErrorCode::of(&value), value.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(value: CoreError) -> Self {
        logofit::Error::from(value).into()
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorCode::Processing, format!("JSON error: {value}"))
    }
}
