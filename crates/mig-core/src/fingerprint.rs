//! FNV-1a content fingerprint for change detection.
//!
//! Fingerprints identify migration content, not secrets: a fast 32-bit hash is
//! enough to notice that an applied migration has been edited.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Width of a rendered fingerprint (`u32::MAX` has ten decimal digits).
pub const FINGERPRINT_WIDTH: usize = 10;

/// Compute the fingerprint of `text`, rendered as a zero-padded
/// ten-character decimal string.
pub fn fingerprint(text: &str) -> String {
    let hash = text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    });
    format!("{hash:0width$}", width = FINGERPRINT_WIDTH)
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod tests;
