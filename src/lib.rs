#![allow(clippy::items_after_test_module)]

pub mod builder;
mod common;

pub use builder::{QRBuilder, QR};
pub use common::codec::{determine_mode, Mode};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};

// One-shot encoder: auto-selects the mode, and the smallest sufficient
// version unless one is forced. Returns the module matrix with 1 for dark
// and 0 for light.
pub fn encode(data: &[u8], ec_level: ECLevel, version: Option<Version>) -> QRResult<Vec<Vec<u8>>> {
    let mut builder = QRBuilder::new(data);
    builder.ec_level(ec_level);
    if let Some(v) = version {
        builder.version(v);
    }
    Ok(builder.build()?.bit_matrix())
}

#[cfg(test)]
mod encode_tests {
    use super::{encode, ECLevel, QRError, Version};

    #[test]
    fn test_encode_auto_version() {
        let matrix = encode(b"Hello, world!", ECLevel::M, None).unwrap();
        assert_eq!(matrix.len(), 21);
        assert!(matrix.iter().all(|row| row.len() == 21));
    }

    #[test]
    fn test_encode_forced_version() {
        let matrix = encode(b"Hello, world!", ECLevel::M, Some(Version(5))).unwrap();
        assert_eq!(matrix.len(), 37);
    }

    #[test]
    fn test_encode_invalid_version() {
        let res = encode(b"Hello, world!", ECLevel::M, Some(Version(41)));
        assert_eq!(res, Err(QRError::InvalidVersion));
        let res = encode(b"Hello, world!", ECLevel::M, Some(Version(0)));
        assert_eq!(res, Err(QRError::InvalidVersion));
    }

    #[test]
    fn test_encode_capacity_exceeded() {
        let data = "1".repeat(42);
        let res = encode(data.as_bytes(), ECLevel::H, Some(Version(1)));
        assert_eq!(res, Err(QRError::CapacityExceeded));
    }
}
