use anyhow::Context as _;
use mathmondays_config::Pagination;

use crate::error::Result;
use crate::permalink::Attributes;
use crate::permalink::Template;
use crate::urls::Location;
use crate::urls::save_as_path;

const PAGINATION_PLACEHOLDERS: &[&str] = &["base_name", "number"];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PaginationRule {
    pub min_page: usize,
    pub url: Template,
    pub save_as: Template,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PaginationScheme {
    pub per_page: usize,
    pub rules: Vec<PaginationRule>,
}

impl PaginationScheme {
    pub fn from_config(config: &Pagination) -> Result<Self> {
        if config.default_pagination == 0 {
            anyhow::bail!("`pagination.default_pagination` must be at least 1");
        }

        let mut rules: Vec<PaginationRule> = Vec::with_capacity(config.patterns.len());
        for (i, pattern) in config.patterns.iter().enumerate() {
            match rules.last() {
                None if pattern.min_page != 1 => {
                    anyhow::bail!(
                        "The first pagination pattern must start at page 1, not {}",
                        pattern.min_page
                    );
                }
                Some(prev) if pattern.min_page <= prev.min_page => {
                    anyhow::bail!(
                        "Pagination patterns must be in ascending page order ({} after {})",
                        pattern.min_page,
                        prev.min_page
                    );
                }
                _ => {}
            }
            let url = Template::parse(&pattern.url, PAGINATION_PLACEHOLDERS)
                .with_context(|| anyhow::format_err!("Invalid `pagination.patterns[{i}].url`"))?;
            let save_as = Template::parse(&pattern.save_as, PAGINATION_PLACEHOLDERS)
                .with_context(|| {
                    anyhow::format_err!("Invalid `pagination.patterns[{i}].save_as`")
                })?;
            rules.push(PaginationRule {
                min_page: pattern.min_page,
                url,
                save_as,
            });
        }
        if rules.is_empty() {
            anyhow::bail!("At least one pagination pattern is required");
        }

        Ok(Self {
            per_page: config.default_pagination,
            rules,
        })
    }

    /// The last rule starting at or before `page`.  Pages are numbered from 1.
    pub fn rule_for(&self, page: usize) -> Option<&PaginationRule> {
        self.rules.iter().rev().find(|rule| rule.min_page <= page)
    }

    pub fn locate(&self, base_name: &str, page: usize) -> Result<Location> {
        let rule = self
            .rule_for(page)
            .ok_or_else(|| anyhow::format_err!("Pages are numbered from 1, got {page}"))?;
        let attributes = Attributes::new()
            .with("base_name", base_name)
            .with("number", page);
        let url = rule.url.render(&attributes)?;
        let save_as = save_as_path(rule.save_as.render(&attributes)?)?;
        Ok(Location { url, save_as })
    }

    /// Number of pages needed for `items` entries; an empty listing still gets one page.
    pub fn page_count(&self, items: usize) -> usize {
        items.div_ceil(self.per_page).max(1)
    }
}

/// `{base_name}` for a listing saved at `save_as`.
pub fn base_name(save_as: &str) -> String {
    let stem = match save_as.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => save_as,
    };
    let stem = stem.trim_end_matches('/');
    if stem == "index" {
        String::new()
    } else if let Some(parent) = stem.strip_suffix("/index") {
        parent.to_owned()
    } else {
        stem.to_owned()
    }
}
