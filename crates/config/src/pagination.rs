pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    pub default_pagination: usize,
    pub patterns: Vec<PaginationPattern>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_pagination: DEFAULT_PER_PAGE,
            patterns: vec![
                PaginationPattern::new(1, "{base_name}/", "{base_name}/index.html"),
                PaginationPattern::new(
                    2,
                    "{base_name}/page/{number}",
                    "{base_name}/page/{number}/index.html",
                ),
            ],
        }
    }
}

/// Applies to every page numbered `min_page` or higher, until a later pattern takes over.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationPattern {
    pub min_page: usize,
    pub url: String,
    pub save_as: String,
}

impl PaginationPattern {
    pub fn new(min_page: usize, url: impl Into<String>, save_as: impl Into<String>) -> Self {
        Self {
            min_page,
            url: url.into(),
            save_as: save_as.into(),
        }
    }
}
