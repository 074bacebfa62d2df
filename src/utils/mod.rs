//! Shared utility helpers

pub mod retry;

pub use retry::{with_retry, RetryConfig};

/// Image file extensions the catalog recognizes, matched case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Whether a file name carries one of the recognized image extensions
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}
