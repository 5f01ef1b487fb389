use serde::Deserialize;
use serde_json::json;

use super::params::Params;

/// Raw `?limit=&offset=` query parameters.
///
/// Kept as strings so a malformed value falls back to an unpaginated listing
/// instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// A LIMIT/OFFSET window to append to a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Window for the given raw values, if any.
    ///
    /// Both values must be present and numeric, and `offset` must be positive;
    /// a negative `limit` is clamped to zero.
    pub fn from_parts(limit: Option<&str>, offset: Option<&str>) -> Option<Self> {
        let limit: i64 = limit?.trim().parse().ok()?;
        let offset: i64 = offset?.trim().parse().ok()?;

        if offset <= 0 {
            return None;
        }

        Some(Self {
            limit: limit.max(0),
            offset,
        })
    }

    /// Append the window to `sql` and bind its values into `params`.
    pub fn apply(&self, sql: &mut String, params: &mut Params) {
        sql.push_str(" LIMIT :limit OFFSET :offset");
        params.insert("limit".to_string(), json!(self.limit));
        params.insert("offset".to_string(), json!(self.offset));
    }
}

impl ListQuery {
    pub fn pagination(&self) -> Option<Pagination> {
        Pagination::from_parts(self.limit.as_deref(), self.offset.as_deref())
    }

    /// Apply the requested window, if any, to a listing statement.
    pub fn paginate(&self, sql: &mut String, params: &mut Params) {
        if let Some(window) = self.pagination() {
            window.apply(sql, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> ListQuery {
        ListQuery {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn positive_offset_appends_bounded_clause() {
        let mut sql = "SELECT id, name, description, price FROM products".to_string();
        let mut params = Params::new();
        query(Some("2"), Some("10")).paginate(&mut sql, &mut params);

        assert_eq!(
            sql,
            "SELECT id, name, description, price FROM products LIMIT :limit OFFSET :offset"
        );
        assert_eq!(params["limit"], json!(2));
        assert_eq!(params["offset"], json!(10));
    }

    #[test]
    fn zero_or_absent_offset_is_unpaginated() {
        for q in [
            query(Some("5"), Some("0")),
            query(Some("5"), None),
            query(None, Some("3")),
            query(None, None),
            query(Some("5"), Some("-4")),
        ] {
            let mut sql = "SELECT id FROM users".to_string();
            let mut params = Params::new();
            q.paginate(&mut sql, &mut params);
            assert_eq!(sql, "SELECT id FROM users");
            assert!(params.is_empty());
        }
    }

    #[test]
    fn negative_limit_is_clamped() {
        assert_eq!(
            Pagination::from_parts(Some("-7"), Some("1")),
            Some(Pagination { limit: 0, offset: 1 })
        );
    }

    #[test]
    fn non_numeric_values_disable_pagination() {
        assert_eq!(Pagination::from_parts(Some("ten"), Some("1")), None);
        assert_eq!(Pagination::from_parts(Some("10"), Some("x")), None);
    }
}
