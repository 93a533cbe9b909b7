//! Conditional clause composition for dynamically assembled queries.

/// Build a clause string from a list of optional parts.
///
/// Simplifies assembling where/from/join fragments that may have zero, one
/// or more parts: an empty `parts` yields the empty string, otherwise the
/// keyword followed by the connector-joined parts, padded with single
/// spaces so the fragment can be appended between other fragments
/// unconditionally.
pub fn build_clause(parts: &[String], keyword: &str, connector: &str) -> String {
    if parts.is_empty() {
        return String::new();
    }
    format!(
        " {} {} ",
        keyword,
        parts.join(&format!(" {} ", connector))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parts_yield_empty_string() {
        assert_eq!(build_clause(&[], "where", "and"), "");
    }

    #[test]
    fn single_part_has_no_connector() {
        let clause = build_clause(&["a.id = :id".to_string()], "where", "and");
        assert_eq!(clause, " where a.id = :id ");
    }

    #[test]
    fn parts_joined_with_connector() {
        let parts = vec!["a = :a".to_string(), "b = :b".to_string()];
        assert_eq!(build_clause(&parts, "where", "and"), " where a = :a and b = :b ");
    }

    #[test]
    fn from_join_composition() {
        let parts = vec!["Image image".to_string(), "image.pixels pix".to_string()];
        assert_eq!(
            build_clause(&parts, "from", "join"),
            " from Image image join image.pixels pix "
        );
    }

    #[test]
    fn appended_and_composition() {
        let parts = vec!["mem.child.id = :mid".to_string()];
        assert_eq!(build_clause(&parts, "and", "and"), " and mem.child.id = :mid ");
    }
}
