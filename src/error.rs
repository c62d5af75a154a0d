//! Error types for background removal operations

use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, WandError>;

/// Error types for region growing, color keying, resizing and encoding
#[derive(Error, Debug)]
pub enum WandError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors from the image crate
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// APNG encoder errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    /// Seed coordinate outside the buffer
    #[error("Invalid seed ({x}, {y}): outside {width}x{height} buffer")]
    InvalidSeed {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Buffer length, frame sizes or target sizes that do not agree
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Processing errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl WandError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new dimension mismatch error
    pub fn dimension_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create an invalid seed error for a buffer of the given size
    #[must_use]
    pub fn invalid_seed(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::InvalidSeed {
            x,
            y,
            width,
            height,
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create processing error with stage context
    #[must_use]
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = WandError::invalid_config("test config error");
        assert!(matches!(err, WandError::InvalidConfig(_)));

        let err = WandError::dimension_mismatch("frame 2 is 4x4, expected 8x8");
        assert!(matches!(err, WandError::DimensionMismatch(_)));
    }

    #[test]
    fn test_error_display() {
        let err = WandError::invalid_seed(10, 3, 4, 4);
        assert_eq!(err.to_string(), "Invalid seed (10, 3): outside 4x4 buffer");

        let err = WandError::invalid_config("tolerance must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tolerance must be finite"
        );
    }

    #[test]
    fn test_enhanced_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = WandError::file_io_error("read image file", Path::new("/tmp/in.png"), &io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("read image file"));
        assert!(error_string.contains("/tmp/in.png"));

        let err = WandError::config_value_error("tolerance", -1.0, ">= 0", Some(32.0));
        let error_string = err.to_string();
        assert!(error_string.contains("tolerance"));
        assert!(error_string.contains("-1"));
        assert!(error_string.contains("Recommended: 32"));

        let err = WandError::processing_stage_error("resize", "zero width", Some("0x10 canvas"));
        let error_string = err.to_string();
        assert!(error_string.contains("resize"));
        assert!(error_string.contains("0x10 canvas"));
    }
}
