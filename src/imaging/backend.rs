//! Image decoding backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline needs
//! from a decoder: identify (dimensions only) and decode to a luminance grid.
//! Input is always an in-memory byte buffer; reading files or request bodies
//! belongs to the caller.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust decoders.

use crate::types::PixelGrid;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("no image data provided")]
    Empty,
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image decoding backends.
pub trait ImageBackend {
    /// Read image dimensions without a full decode where the format allows it.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode the image and convert it to a luminance grid of the same size.
    fn decode_luminance(&self, bytes: &[u8]) -> Result<PixelGrid, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Mock backend that hands out a fixed grid and records every call.
    #[derive(Default)]
    pub struct MockBackend {
        pub grid: Option<PixelGrid>,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Decode(usize),
    }

    impl MockBackend {
        pub fn with_grid(grid: PixelGrid) -> Self {
            Self {
                grid: Some(grid),
                operations: RefCell::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations
                .borrow_mut()
                .push(RecordedOp::Identify(bytes.len()));
            self.grid
                .as_ref()
                .map(|g| Dimensions {
                    width: g.width() as u32,
                    height: g.height() as u32,
                })
                .ok_or_else(|| BackendError::Decode("no mock grid".to_string()))
        }

        fn decode_luminance(&self, bytes: &[u8]) -> Result<PixelGrid, BackendError> {
            self.operations
                .borrow_mut()
                .push(RecordedOp::Decode(bytes.len()));
            self.grid
                .clone()
                .ok_or_else(|| BackendError::Decode("no mock grid".to_string()))
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_grid(PixelGrid::new(8, 3));
        let dims = backend.identify(b"abc").unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 8,
                height: 3
            }
        );
        assert_eq!(backend.get_operations(), vec![RecordedOp::Identify(3)]);
    }

    #[test]
    fn mock_without_grid_fails_decode() {
        let backend = MockBackend::default();
        let err = backend.decode_luminance(b"").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert_eq!(backend.get_operations(), vec![RecordedOp::Decode(0)]);
    }
}
