use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Pagination fields are inlined: urlencoded numbers do not survive `serde(flatten)`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QuoteListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Matches reference, customer name or customer email.
    pub q: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl QuoteListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(p.normalize(), (3, 20, 40));

        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(50),
        };
        assert_eq!(p.normalize(), (i64::MAX, 50, i64::MAX));
    }
}
