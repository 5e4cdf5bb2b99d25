//! Test helpers for generating unique test data
//!
//! Unique suffixes keep concurrently running tests from colliding on
//! session codes, player names, or file names.

use ulid::Ulid;

/// Generate a unique string with the given prefix.
///
/// # Examples
/// ```
/// use engine_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// let b = unique_str("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique image file name (e.g. for seeding a content pool).
///
/// # Examples
/// ```
/// use engine_test_support::unique_helpers::unique_image_name;
///
/// let name = unique_image_name("sunset");
/// assert!(name.ends_with(".jpg"));
/// ```
pub fn unique_image_name(prefix: &str) -> String {
    format!("{}-{}.jpg", prefix, Ulid::new())
}
