pub const DEFAULT_AUTHOR: &str = "Henry Swanson";
pub const DEFAULT_SITE_NAME: &str = "Math Mondays";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Site {
    pub author: String,
    pub name: String,
    /// Canonical base URL; empty while developing so links stay relative to the preview server.
    pub url: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_owned(),
            name: DEFAULT_SITE_NAME.to_owned(),
            url: String::new(),
        }
    }
}
