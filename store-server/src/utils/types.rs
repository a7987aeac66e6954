//! Common response types

use serde::Serialize;

/// Paginated list response
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Clamp pagination parameters: `page >= 1`, `per_page` in [1, 100]
pub fn clamp_pagination(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(None, None), (1, 20));
        assert_eq!(clamp_pagination(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_pagination(Some(-3), Some(500)), (1, 100));
        assert_eq!(clamp_pagination(Some(7), Some(50)), (7, 50));
    }
}
