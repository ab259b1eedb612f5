use std::fmt;
use std::str::FromStr;

use anyhow::Context as _;
use mathmondays_config::UrlTemplate;
use mathmondays_config::Urls;
use relative_path::RelativePathBuf;

use crate::error::Result;
use crate::permalink::Attributes;
use crate::permalink::Template;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Article,
    Page,
    Tag,
    Author,
    Category,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Article,
        ContentKind::Page,
        ContentKind::Tag,
        ContentKind::Author,
        ContentKind::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Page => "page",
            Self::Tag => "tag",
            Self::Author => "author",
            Self::Category => "category",
        }
    }

    /// Placeholders the pipeline can fill in for this kind of page.
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            Self::Article => &["slug", "lang", "category", "author", "date"],
            Self::Page => &["slug", "lang"],
            Self::Tag | Self::Author | Self::Category => &["slug"],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::format_err!("Unknown content kind `{s}`"))
    }
}

/// Where a rendered page is published and written.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    pub url: String,
    pub save_as: RelativePathBuf,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "url: {}", self.url)?;
        write!(f, "save_as: {}", self.save_as)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UrlPattern {
    pub url: Template,
    /// `None` when pages of this kind are not written.
    pub save_as: Option<Template>,
}

impl UrlPattern {
    pub fn from_config(kind: ContentKind, config: &UrlTemplate) -> Result<Self> {
        let allowed = kind.placeholders();
        let url = Template::parse(&config.url, allowed)
            .with_context(|| anyhow::format_err!("Invalid `urls.{kind}.url`"))?;
        let save_as = if config.is_generated() {
            let save_as = Template::parse(&config.save_as, allowed)
                .with_context(|| anyhow::format_err!("Invalid `urls.{kind}.save_as`"))?;
            Some(save_as)
        } else {
            None
        };
        Ok(Self { url, save_as })
    }

    pub fn is_generated(&self) -> bool {
        self.save_as.is_some()
    }

    pub fn locate(&self, attributes: &Attributes) -> Result<Option<Location>> {
        let Some(save_as) = &self.save_as else {
            return Ok(None);
        };
        let url = self.url.render(attributes)?;
        let save_as = save_as_path(save_as.render(attributes)?)?;
        Ok(Some(Location { url, save_as }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UrlScheme {
    pub article: UrlPattern,
    pub page: UrlPattern,
    pub tag: UrlPattern,
    pub author: UrlPattern,
    pub category: UrlPattern,
    pub authors_save_as: Option<RelativePathBuf>,
    pub categories_save_as: Option<RelativePathBuf>,
}

impl UrlScheme {
    pub fn from_config(config: &Urls) -> Result<Self> {
        let Urls {
            article,
            page,
            tag,
            author,
            category,
            authors_save_as,
            categories_save_as,
        } = config;
        Ok(Self {
            article: UrlPattern::from_config(ContentKind::Article, article)?,
            page: UrlPattern::from_config(ContentKind::Page, page)?,
            tag: UrlPattern::from_config(ContentKind::Tag, tag)?,
            author: UrlPattern::from_config(ContentKind::Author, author)?,
            category: UrlPattern::from_config(ContentKind::Category, category)?,
            authors_save_as: index_path("authors_save_as", authors_save_as)?,
            categories_save_as: index_path("categories_save_as", categories_save_as)?,
        })
    }

    pub fn pattern(&self, kind: ContentKind) -> &UrlPattern {
        match kind {
            ContentKind::Article => &self.article,
            ContentKind::Page => &self.page,
            ContentKind::Tag => &self.tag,
            ContentKind::Author => &self.author,
            ContentKind::Category => &self.category,
        }
    }

    pub fn locate(&self, kind: ContentKind, attributes: &Attributes) -> Result<Option<Location>> {
        self.pattern(kind)
            .locate(attributes)
            .with_context(|| anyhow::format_err!("Failed to locate {kind} page"))
    }
}

fn index_path(name: &str, raw: &str) -> Result<Option<RelativePathBuf>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let template = Template::parse(raw, &[])
        .with_context(|| anyhow::format_err!("Invalid `urls.{name}`"))?;
    let path = save_as_path(template.render(&Attributes::new())?)?;
    Ok(Some(path))
}

pub(crate) fn save_as_path(rendered: String) -> Result<RelativePathBuf> {
    let path = RelativePathBuf::from(rendered);
    crate::settings::ensure_contained("save path", &path)?;
    Ok(path)
}
