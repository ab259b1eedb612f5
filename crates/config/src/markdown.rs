use std::collections::BTreeMap;

/// Options for one Python-Markdown style extension.
pub type ExtensionOptions = BTreeMap<String, serde_yaml::Value>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Markdown {
    pub extension_configs: BTreeMap<String, ExtensionOptions>,
    pub output_format: OutputFormat,
}

impl Default for Markdown {
    fn default() -> Self {
        let extension_configs = [
            "markdown.extensions.extra",
            "markdown.extensions.meta",
            "markdown.extensions.smarty",
        ]
        .into_iter()
        .map(|ext| (ext.to_owned(), ExtensionOptions::new()))
        .collect();
        Self {
            extension_configs,
            output_format: OutputFormat::Html5,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    #[default]
    Html5,
    Xhtml,
}
