//! `{name}` substitution for URL and save-path templates.
//!
//! A placeholder may carry a strftime format after a colon, e.g. `{date:%Y}`;
//! only dates accept one.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use anyhow::Context as _;

use crate::error::Result;

static PLACEHOLDER: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([^{}]*))?\}").unwrap()
});

/// Placeholders that hold a date.
const DATE_PLACEHOLDERS: &[&str] = &["date"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attribute {
    Text(String),
    Number(usize),
    Date(chrono::NaiveDate),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Date(date) => write!(f, "{date}"),
        }
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<usize> for Attribute {
    fn from(number: usize) -> Self {
        Self::Number(number)
    }
}

impl From<chrono::NaiveDate> for Attribute {
    fn from(date: chrono::NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Values available while rendering a [`Template`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    values: BTreeMap<String, Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Attribute>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Attribute>) {
        self.values.insert(name.to_owned(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.values.get(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    raw: String,
    placeholders: Vec<String>,
}

impl Template {
    /// Check `raw` only refers to placeholders in `allowed`.
    pub fn parse(raw: &str, allowed: &[&str]) -> Result<Self> {
        let mut placeholders = Vec::new();
        for caps in PLACEHOLDER.captures_iter(raw) {
            let name = caps.get(1).expect("unconditional capture").as_str();
            if !allowed.contains(&name) {
                anyhow::bail!(
                    "`{{{name}}}` is not available in `{raw}`, expected one of: {}",
                    itertools::join(allowed.iter().map(|a| format!("{{{a}}}")), ", ")
                );
            }
            if let Some(format) = caps.get(2) {
                if !DATE_PLACEHOLDERS.contains(&name) {
                    anyhow::bail!("`{{{name}}}` does not take a format in `{raw}`");
                }
                validate_placeholder_format(format.as_str())
                    .with_context(|| anyhow::format_err!("Invalid date format in `{raw}`"))?;
            }
            placeholders.push(name.to_owned());
        }

        let leftover = PLACEHOLDER.replace_all(raw, "");
        if leftover.contains(['{', '}']) {
            anyhow::bail!("Unbalanced braces in `{raw}`");
        }

        Ok(Self {
            raw: raw.to_owned(),
            placeholders,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(|p| p.as_str())
    }

    pub fn render(&self, attributes: &Attributes) -> Result<String> {
        let mut rendered = String::with_capacity(self.raw.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(&self.raw) {
            let whole = caps.get(0).expect("unconditional capture");
            let name = caps.get(1).expect("unconditional capture").as_str();
            rendered.push_str(&self.raw[last..whole.start()]);

            let value = attributes
                .get(name)
                .ok_or_else(|| anyhow::format_err!("No value for `{{{name}}}` in `{}`", self.raw))?;
            match (value, caps.get(2)) {
                (Attribute::Date(date), Some(format)) => {
                    write!(rendered, "{}", date.format(format.as_str()))?;
                }
                (value, _) => {
                    write!(rendered, "{value}")?;
                }
            }
            last = whole.end();
        }
        rendered.push_str(&self.raw[last..]);

        Ok(normalize(rendered))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl serde::Serialize for Template {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn normalize(mut p: String) -> String {
    // Handle the user doing windows-style
    p = p.replace('\\', "/");

    // Handle cases where substitutions were blank
    while p.contains("//") {
        p = p.replace("//", "/");
    }

    if p.starts_with('/') {
        p.remove(0);
    }

    p
}

pub(crate) fn validate_date_format(format: &str) -> Result<()> {
    let has_error = chrono::format::StrftimeItems::new(format)
        .any(|item| matches!(item, chrono::format::Item::Error));
    if has_error {
        anyhow::bail!("`{format}` is not a valid date format");
    }
    Ok(())
}

/// Placeholders only ever receive a date, so time and zone fields can't render.
fn validate_placeholder_format(format: &str) -> Result<()> {
    validate_date_format(format)?;
    let mut sample = String::new();
    if write!(sample, "{}", chrono::NaiveDate::MIN.format(format)).is_err() {
        anyhow::bail!("`{format}` needs more than a date to render");
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_lists_placeholders() {
        let template = Template::parse("{base_name}/page/{number}", &["base_name", "number"]).unwrap();
        let placeholders: Vec<_> = template.placeholders().collect();
        assert_eq!(placeholders, vec!["base_name", "number"]);
    }

    #[test]
    fn parse_unknown_placeholder() {
        assert!(Template::parse("tag/{title}", &["slug"]).is_err());
    }

    #[test]
    fn parse_format_on_non_date() {
        assert!(Template::parse("{slug:%Y}", &["slug"]).is_err());
    }

    #[test]
    fn parse_bad_date_format() {
        assert!(Template::parse("{date:%Q}/{slug}", &["date", "slug"]).is_err());
    }

    #[test]
    fn parse_time_only_format() {
        assert!(Template::parse("{date:%Z}/{slug}", &["date", "slug"]).is_err());
        assert!(Template::parse("{date:%H%M}/{slug}", &["date", "slug"]).is_err());
        assert!(Template::parse("{date:%Y/%m/%d}/{slug}", &["date", "slug"]).is_ok());
    }

    #[test]
    fn parse_unbalanced() {
        assert!(Template::parse("tag/{slug", &["slug"]).is_err());
        assert!(Template::parse("tag/slug}", &["slug"]).is_err());
    }

    #[test]
    fn render_relative() {
        let template = Template::parse("relative/path", &[]).unwrap();
        assert_eq!(template.render(&Attributes::new()).unwrap(), "relative/path");
    }

    #[test]
    fn render_absolute() {
        let template = Template::parse("/abs/{slug}", &["slug"]).unwrap();
        let attributes = Attributes::new().with("slug", "path");
        assert_eq!(template.render(&attributes).unwrap(), "abs/path");
    }

    #[test]
    fn render_blank_substitution() {
        let template = Template::parse("{base_name}/index.html", &["base_name"]).unwrap();
        let attributes = Attributes::new().with("base_name", "");
        assert_eq!(template.render(&attributes).unwrap(), "index.html");
    }

    #[test]
    fn render_date_format() {
        let template = Template::parse("{date:%Y}/{date:%m}/{slug}", &["date", "slug"]).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let attributes = Attributes::new().with("date", date).with("slug", "my-post");
        assert_eq!(template.render(&attributes).unwrap(), "2023/05/my-post");
    }

    #[test]
    fn render_missing_value() {
        let template = Template::parse("tag/{slug}", &["slug"]).unwrap();
        assert!(template.render(&Attributes::new()).is_err());
    }
}
