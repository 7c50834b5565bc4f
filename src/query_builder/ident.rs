//! Table-name sanitizing.
//!
//! Table names are spliced into the statement text, so they are reduced to their leading
//! `[A-Za-z0-9_]` run instead of being escaped. Anything from the first other character on is
//! dropped; a name that starts with such a character sanitizes to nothing.

use std::sync::LazyLock;

use regex::Regex;

static SAFE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+").expect("identifier pattern is valid"));

/// Return the leading `[A-Za-z0-9_]+` run of `name`, or `None` when there is none.
///
/// ```rust
/// use sqlite_wrapper::query_builder::safe_name;
///
/// assert_eq!(safe_name("users; drop table users"), Some("users"));
/// assert_eq!(safe_name("\"users\""), None);
/// ```
#[must_use]
pub fn safe_name(name: &str) -> Option<&str> {
    SAFE_NAME.find(name).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_identifiers() {
        assert_eq!(safe_name("users"), Some("users"));
        assert_eq!(safe_name("user_roles_2"), Some("user_roles_2"));
        assert_eq!(safe_name("_tmp"), Some("_tmp"));
    }

    #[test]
    fn truncates_at_first_disallowed_character() {
        assert_eq!(safe_name("users where 1=1"), Some("users"));
        assert_eq!(safe_name("main.users"), Some("main"));
        assert_eq!(safe_name("t-1"), Some("t"));
    }

    #[test]
    fn rejects_names_without_a_leading_run() {
        assert_eq!(safe_name(""), None);
        assert_eq!(safe_name(" users"), None);
        assert_eq!(safe_name(";drop"), None);
        assert_eq!(safe_name("[users]"), None);
    }
}
