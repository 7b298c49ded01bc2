#[cfg(test)]
mod tests {
    use keel_core::{
        KeelError, count_statement, declared_parameters, error_kind, keyword_positions,
        projected_columns, select_list, starts_with_keyword,
    };

    #[test]
    fn keywords_on_word_boundaries() {
        assert_eq!(keyword_positions("select from_date from t", "FROM"), [17]);
        assert_eq!(keyword_positions("SELECT 'from' FROM t", "FROM"), [14]);
        assert_eq!(keyword_positions("SELECT \"From\" FROM t", "from"), [14]);
        assert!(keyword_positions("SELECT 1", "FROM").is_empty());
        assert!(starts_with_keyword("  select * from t", "SELECT"));
        assert!(!starts_with_keyword("selection", "SELECT"));
    }

    #[test]
    fn select_list_and_projection() {
        assert_eq!(
            select_list("SELECT a.id AS id, name FROM t"),
            Some("a.id AS id, name")
        );
        assert_eq!(select_list("UPDATE t SET a = 1"), None);
        assert_eq!(select_list("SELECT FROM t"), None);
        assert_eq!(
            projected_columns("SELECT a.id AS id,name\n FROM t"),
            ["a.id", "AS", "id", "name"]
        );
        assert!(projected_columns("DELETE FROM t").is_empty());
    }

    #[test]
    fn count_rewrite() {
        assert_eq!(
            count_statement("SELECT o.id, o.name FROM orders o WHERE o.a = 'FROM' ORDER BY o.id;")
                .unwrap(),
            "SELECT COUNT(*) FROM orders o WHERE o.a = 'FROM';"
        );
        assert_eq!(
            count_statement("select *\nfrom orders\norder by id desc").unwrap(),
            "SELECT COUNT(*) from orders;"
        );
        assert_eq!(
            count_statement("SELECT * FROM orders WHERE note = 'order by'").unwrap(),
            "SELECT COUNT(*) FROM orders WHERE note = 'order by';"
        );
        let error = count_statement("SELECT 1").unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
    }

    #[test]
    fn parameters() {
        assert_eq!(
            declared_parameters(
                "SELECT * FROM t WHERE a = :a AND b = ':no' AND c::text = :c AND d = :a AND e = :1"
            ),
            ["a", "c"]
        );
        assert!(declared_parameters("SELECT 1").is_empty());
    }
}
