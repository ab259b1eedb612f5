#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Locale {
    pub timezone: String,
    pub default_lang: String,
    /// strftime-style pattern
    pub default_date_format: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            timezone: "America/Los_Angeles".to_owned(),
            default_lang: "en".to_owned(),
            default_date_format: "%B %-d, %Y".to_owned(),
        }
    }
}
