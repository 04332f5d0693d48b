//! Unique test data, so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`.
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// A display name short enough for a room seat: the prefix (cut to eight
/// characters) plus the ULID's last ten characters, which are random.
///
/// ```
/// use backend_test_support::unique_helpers::unique_display_name;
///
/// let a = unique_display_name("alice");
/// assert_ne!(a, unique_display_name("alice"));
/// assert!(a.chars().count() <= 32);
/// ```
pub fn unique_display_name(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    let prefix: String = prefix.chars().take(8).collect();
    format!("{prefix}-{}", &ulid[ulid.len() - 10..])
}
