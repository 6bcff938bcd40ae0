//! Member identity rules
//!
//! A member is not a separate entity: it is a display name stored inside a
//! group, and its identity is the trimmed, lower-cased form of that name.

/// Normalize a member name for identity comparison
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check whether two names refer to the same member
pub fn same_member(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Find the stored entry that matches `name` under normalization
///
/// Returns the stored casing, which is what removal must target.
pub fn find_member<'a>(members: &'a [String], name: &str) -> Option<&'a str> {
    let wanted = normalize(name);
    members
        .iter()
        .find(|m| normalize(m) == wanted)
        .map(String::as_str)
}

/// Check whether `members` already holds `name` under normalization
pub fn contains_member(members: &[String], name: &str) -> bool {
    find_member(members, name).is_some()
}
