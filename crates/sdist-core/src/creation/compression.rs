//! Compression level conversion.
//!
//! User levels follow a 1-9 scale:
//!
//! - **1-3**: Fast compression
//! - **6**: Default compression
//! - **7-9**: Best compression

/// Converts a user compression level (1-9) to a flate2 level.
///
/// # Examples
///
/// ```
/// use sdist_core::creation::compression::compression_level_to_flate2;
///
/// assert_eq!(compression_level_to_flate2(None), flate2::Compression::default());
/// assert_eq!(compression_level_to_flate2(Some(9)), flate2::Compression::best());
/// assert_eq!(compression_level_to_flate2(Some(4)).level(), 4);
/// ```
#[must_use]
pub fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None | Some(6) => flate2::Compression::default(),
        Some(1..=3) => flate2::Compression::fast(),
        Some(7..=9) => flate2::Compression::best(),
        Some(n) => flate2::Compression::new(u32::from(n.min(9))),
    }
}
