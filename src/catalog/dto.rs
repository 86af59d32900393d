use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub category: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub search: Option<String>,
}

/// Offset-paginated page with relative next/previous links, the shape
/// list endpoints respond with.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `extra` carries active filters into the links, e.g. "&search=tea".
    pub fn new(
        path: &str,
        count: i64,
        limit: i64,
        offset: i64,
        extra: Option<&str>,
        results: Vec<T>,
    ) -> Self {
        let extra = extra.unwrap_or("");
        let next = if offset + limit < count {
            Some(format!(
                "{path}?limit={limit}&offset={}{extra}",
                offset + limit
            ))
        } else {
            None
        };
        let previous = if offset > 0 {
            let prev = (offset - limit).max(0);
            Some(format!("{path}?limit={limit}&offset={prev}{extra}"))
        } else {
            None
        };
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryPayload {
    pub name: String,
    pub category: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryPatch {
    pub name: Option<String>,
    pub category: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub subcategory: Uuid,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub additional_images: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub subcategory: Option<Uuid>,
    pub thumbnail: Option<String>,
    pub additional_images: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn product_query_defaults() {
        let q: ProductQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 20);
        assert_eq!(q.offset, 0);
        assert!(q.search.is_none());
    }

    #[test]
    fn first_page_has_next_but_no_previous() {
        let page: Page<i32> = Page::new("/api/products", 50, 20, 0, None, vec![]);
        assert_eq!(page.next.as_deref(), Some("/api/products?limit=20&offset=20"));
        assert!(page.previous.is_none());
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page: Page<i32> = Page::new("/api/products", 50, 20, 20, None, vec![]);
        assert_eq!(page.next.as_deref(), Some("/api/products?limit=20&offset=40"));
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/products?limit=20&offset=0")
        );
    }

    #[test]
    fn last_page_has_previous_but_no_next() {
        let page: Page<i32> = Page::new("/api/products", 50, 20, 40, None, vec![]);
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/products?limit=20&offset=20")
        );
    }

    #[test]
    fn previous_offset_clamps_to_zero() {
        let page: Page<i32> = Page::new("/api/products", 50, 20, 10, None, vec![]);
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/products?limit=20&offset=0")
        );
    }

    #[test]
    fn links_carry_filters() {
        let page: Page<i32> = Page::new("/api/products", 50, 20, 20, Some("&search=tea"), vec![]);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/products?limit=20&offset=40&search=tea")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/products?limit=20&offset=0&search=tea")
        );
    }

    #[test]
    fn empty_result_set_has_no_links() {
        let page: Page<i32> = Page::new("/api/categories", 0, 20, 0, None, vec![]);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
        assert_eq!(page.count, 0);
    }
}
