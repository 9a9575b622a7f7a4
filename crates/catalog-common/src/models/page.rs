use serde::{Deserialize, Serialize};

/// Pagination parameters as they arrive on the query string.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page_number", alias = "pageNumber")]
    pub page_number: i64,
    #[serde(default = "default_page_size", alias = "pageSize")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

/// Page metadata describing the full filtered/ordered set, not just the
/// returned slice. Serialized PascalCase for the `x-pagination` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageMetadata {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMetadata {
    /// Derive the metadata for the *requested* page number, which may
    /// lie beyond the last page: `has_previous` still reflects the
    /// requested number, so it can be true while the page is empty.
    pub fn compute(total_count: i64, current_page: i64, page_size: i64) -> Self {
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            total_count,
            page_size,
            current_page,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }
}

/// One page of results plus metadata for the whole set.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub metadata: PageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_middle_page() {
        let m = PageMetadata::compute(25, 2, 10);
        assert_eq!(m.total_pages, 3);
        assert!(m.has_next);
        assert!(m.has_previous);
    }

    #[test]
    fn test_metadata_last_page() {
        let m = PageMetadata::compute(25, 3, 10);
        assert_eq!(m.total_pages, 3);
        assert!(!m.has_next);
        assert!(m.has_previous);
    }

    #[test]
    fn test_metadata_first_page() {
        let m = PageMetadata::compute(25, 1, 10);
        assert!(m.has_next);
        assert!(!m.has_previous);
    }

    #[test]
    fn test_metadata_exact_division() {
        let m = PageMetadata::compute(30, 3, 10);
        assert_eq!(m.total_pages, 3);
        assert!(!m.has_next);
    }

    #[test]
    fn test_metadata_empty_set() {
        let m = PageMetadata::compute(0, 1, 10);
        assert_eq!(m.total_pages, 0);
        assert!(!m.has_next);
        assert!(!m.has_previous);
    }

    #[test]
    fn test_metadata_beyond_last_page_keeps_requested_number() {
        // Requested page 5 of 3: empty page, but has_previous reflects
        // the requested page number, not a clamped one.
        let m = PageMetadata::compute(25, 5, 10);
        assert_eq!(m.current_page, 5);
        assert!(!m.has_next);
        assert!(m.has_previous);
    }

    #[test]
    fn test_metadata_header_casing() {
        let m = PageMetadata::compute(25, 2, 10);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["TotalCount"], 25);
        assert_eq!(json["PageSize"], 10);
        assert_eq!(json["CurrentPage"], 2);
        assert_eq!(json["TotalPages"], 3);
        assert_eq!(json["HasNext"], true);
        assert_eq!(json["HasPrevious"], true);
    }
}
