use mathmondays_config::Markdown;

use crate::error::Result;

static EXTENSION_ID: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Extension ids are dotted module paths, e.g. `markdown.extensions.extra`.
pub fn validate(markdown: &Markdown) -> Result<()> {
    for name in markdown.extension_configs.keys() {
        if !EXTENSION_ID.is_match(name) {
            anyhow::bail!("`{name}` is not a valid Markdown extension id");
        }
    }
    Ok(())
}
