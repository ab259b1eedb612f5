/// Public URL and on-disk location for one kind of generated page.
///
/// An empty `save_as` turns off generation for that kind.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlTemplate {
    pub url: String,
    pub save_as: String,
}

impl UrlTemplate {
    pub fn new(url: impl Into<String>, save_as: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            save_as: save_as.into(),
        }
    }

    pub fn is_generated(&self) -> bool {
        !self.save_as.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Urls {
    pub article: UrlTemplate,
    pub page: UrlTemplate,
    pub tag: UrlTemplate,
    pub author: UrlTemplate,
    pub category: UrlTemplate,
    /// Index of all authors; empty to skip.
    pub authors_save_as: String,
    /// Index of all categories; empty to skip.
    pub categories_save_as: String,
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            article: UrlTemplate::new("{slug}", "{slug}.html"),
            page: UrlTemplate::new("{slug}", "{slug}.html"),
            tag: UrlTemplate::new("tag/{slug}", "tag/{slug}.html"),
            author: UrlTemplate::new("author/{slug}", ""),
            category: UrlTemplate::new("category/{slug}", ""),
            authors_save_as: String::new(),
            categories_save_as: String::new(),
        }
    }
}
