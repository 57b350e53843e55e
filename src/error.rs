//! Error taxonomy for the framebuffer pipeline
//!
//! Caller mistakes (bad sizes, out-of-range pixels) come back as `Err` before
//! anything is mutated. Allocation failures and size overflows are fatal: the
//! `push`/allocation wrappers route them through [`fatal`], which logs the
//! failing location and terminates the process.

use std::panic::Location;

pub type Result<T> = std::result::Result<T, FramebufferError>;

/// Coarse classification of a [`FramebufferError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-correctable: reported before any state changes
    InvalidArgument,
    /// Allocation failed
    ResourceExhausted,
    /// A capacity or byte-size computation would overflow `usize`
    ArithmeticOverflow,
    /// The host window/renderer rejected an operation
    Presentation,
    /// Configuration could not be read, written or parsed
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FramebufferError {
    #[error("invalid size {width}x{height}: both axes must be greater than zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(
        "logical size {width}x{height} must not exceed the physical size {max_width}x{max_height}"
    )]
    LogicalExceedsPhysical {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error(
        "window size {width}x{height} cannot be less than the logical size \
         {logical_width}x{logical_height}; unset the logical size first"
    )]
    BelowLogicalSize {
        width: u32,
        height: u32,
        logical_width: u32,
        logical_height: u32,
    },

    #[error(
        "window size {width}x{height} cannot be bigger than the display resolution \
         {max_width}x{max_height}"
    )]
    ExceedsDisplay {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("print scale {scale} is out of range: must be between 1 and {max}")]
    InvalidPrintScale { scale: u32, max: u32 },

    #[error("failed to allocate memory for {what} ({bytes} bytes)")]
    ResourceExhausted { what: &'static str, bytes: usize },

    #[error("size computation for {what} overflows")]
    ArithmeticOverflow { what: &'static str },

    #[error("presentation surface: {0}")]
    Presentation(String),

    #[error("config: {0}")]
    Config(String),
}

impl FramebufferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. }
            | Self::LogicalExceedsPhysical { .. }
            | Self::BelowLogicalSize { .. }
            | Self::ExceedsDisplay { .. }
            | Self::OutOfBounds { .. }
            | Self::InvalidPrintScale { .. } => ErrorKind::InvalidArgument,
            Self::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
            Self::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
            Self::Presentation(_) => ErrorKind::Presentation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True for errors the caller can fix by passing different arguments
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

/// Log an unrecoverable error with the caller's location and exit.
#[track_caller]
pub(crate) fn fatal(err: &FramebufferError) -> ! {
    let location = Location::caller();
    tracing::error!(
        file = location.file(),
        line = location.line(),
        kind = ?err.kind(),
        "{}",
        err
    );
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_errors_are_invalid_argument() {
        let errors = [
            FramebufferError::InvalidDimensions { width: 0, height: 5 },
            FramebufferError::LogicalExceedsPhysical {
                width: 150,
                height: 50,
                max_width: 100,
                max_height: 100,
            },
            FramebufferError::BelowLogicalSize {
                width: 8,
                height: 8,
                logical_width: 16,
                logical_height: 16,
            },
            FramebufferError::ExceedsDisplay {
                width: 9000,
                height: 10,
                max_width: 1920,
                max_height: 1080,
            },
            FramebufferError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 4,
            },
            FramebufferError::InvalidPrintScale { scale: 0, max: 1 },
        ];
        for err in &errors {
            assert!(err.is_invalid_argument(), "{err} should be caller-recoverable");
        }
    }

    #[test]
    fn test_fatal_kinds() {
        let oom = FramebufferError::ResourceExhausted {
            what: "pixel buffer",
            bytes: 64,
        };
        assert_eq!(oom.kind(), ErrorKind::ResourceExhausted);
        let overflow = FramebufferError::ArithmeticOverflow {
            what: "growable buffer",
        };
        assert_eq!(overflow.kind(), ErrorKind::ArithmeticOverflow);
        assert!(!overflow.is_invalid_argument());
    }

    #[test]
    fn test_display_mentions_sizes() {
        let err = FramebufferError::LogicalExceedsPhysical {
            width: 150,
            height: 50,
            max_width: 100,
            max_height: 100,
        };
        let text = err.to_string();
        assert!(text.contains("150x50"));
        assert!(text.contains("100x100"));
    }
}
