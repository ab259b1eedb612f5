use std::fmt;
use std::path;

use liquid_core::model::KString;
use liquid_core::model::Value;

use super::*;

pub const CONFIG_FILE: &str = "_mathmondays.yml";
pub const DEFAULT_FILENAME_METADATA: &str = r"(?P<date>\d{4}-\d{2}-\d{2})-(?P<slug>.*)";
pub const DEFAULT_SUMMARY_END_MARKER: &str = "<!-- more -->";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub root: path::PathBuf,
    pub site: Site,
    /// Content directory
    pub path: RelPath,
    pub theme: RelPath,
    pub output_path: RelPath,
    pub locale: Locale,
    pub feeds: Feeds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_urls: Option<bool>,
    pub delete_output_directory: bool,
    /// Order matters: plugins register their hooks in this order.
    pub plugins: Vec<KString>,
    pub markdown: Markdown,
    pub static_paths: Vec<RelPath>,
    pub extra_path_metadata: Vec<ExtraPath>,
    pub urls: Urls,
    pub pagination: Pagination,
    /// Rendered in the order given.
    pub footer_links: FooterLinks,
    pub filename_metadata: String,
    pub summary_end_marker: String,
    pub sitemap: Sitemap,
    pub template_globals: liquid_core::Object,
    /// Applied on top of everything else for [`Variant::Production`].
    pub publish: Overrides,
}

impl Default for Config {
    fn default() -> Config {
        let plugins = [
            "plugins.summary",
            "render_math",
            "simple_footnotes",
            "sitemap",
            "webassets",
        ]
        .into_iter()
        .map(KString::from_static)
        .collect();

        let footer_links = [
            ("email", "mailto:henryswanson94@gmail.com"),
            ("github", "https://github.com/HenrySwanson"),
            ("rss", "feed.xml"),
            (
                "stackoverflow",
                "https://stackexchange.com/users/2216552/henry-swanson",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let mut template_globals = liquid_core::Object::new();
        template_globals.insert(KString::from_static("production"), Value::scalar(false));

        Config {
            root: Default::default(),
            site: Default::default(),
            path: "content".into(),
            theme: "theme".into(),
            output_path: "output".into(),
            locale: Default::default(),
            feeds: Default::default(),
            relative_urls: None,
            delete_output_directory: false,
            plugins,
            markdown: Default::default(),
            static_paths: default_static_paths(),
            extra_path_metadata: default_extra_path_metadata(),
            urls: Default::default(),
            pagination: Default::default(),
            footer_links,
            filename_metadata: DEFAULT_FILENAME_METADATA.to_owned(),
            summary_end_marker: DEFAULT_SUMMARY_END_MARKER.to_owned(),
            sitemap: Default::default(),
            template_globals,
            publish: Overrides::publish(),
        }
    }
}

impl Config {
    pub fn from_file<P: Into<path::PathBuf>>(path: P) -> Result<Config> {
        Self::from_file_internal(path.into())
    }

    fn from_file_internal(path: path::PathBuf) -> Result<Config> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Status::new("Failed to read config")
                .with_source(e)
                .context_with(|c| c.insert("Path", path.display().to_string()))
        })?;

        let mut config = Self::from_str_internal(&content)
            .map_err(|e| e.context_with(|c| c.insert("Path", path.display().to_string())))?;

        let mut root = path;
        root.pop(); // Remove filename
        if root == path::Path::new("") {
            root = path::Path::new(".").to_owned();
        }
        config.root = root;

        Ok(config)
    }

    pub fn from_cwd<P: Into<path::PathBuf>>(cwd: P) -> Result<Config> {
        Self::from_cwd_internal(cwd.into())
    }

    fn from_cwd_internal(cwd: path::PathBuf) -> Result<Config> {
        let file_path = find_project_file(&cwd, CONFIG_FILE);
        let config = file_path
            .map(|p| {
                log::debug!("Using config file `{}`", p.display());
                Self::from_file(&p)
            })
            .unwrap_or_else(|| {
                log::warn!("No {CONFIG_FILE} file found in current directory, using default config.");
                let config = Config {
                    root: cwd,
                    ..Default::default()
                };
                Ok(config)
            })?;
        Ok(config)
    }

    /// Parse settings from YAML text; blank text gives the defaults.
    pub fn from_yaml(content: &str) -> Result<Config> {
        Self::from_str_internal(content)
    }

    fn from_str_internal(content: &str) -> Result<Config> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| Status::new("Failed to parse config").with_source(e))
    }

    /// The override set `variant` layers over the base settings.
    pub fn overrides_for(&self, variant: Variant) -> Overrides {
        match variant {
            Variant::Development => Overrides::empty(),
            Variant::Production => self.publish.clone(),
        }
    }

    /// Produce a new configuration with `overrides` applied.
    ///
    /// Template globals can only be replaced, not introduced.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Config> {
        if let Some(url) = &overrides.site_url {
            log::debug!("Overriding config `site.url` with `{url}`");
            self.site.url = url.clone();
        }
        if let Some(relative_urls) = overrides.relative_urls {
            log::debug!("Overriding config `relative_urls` with `{relative_urls}`");
            self.relative_urls = Some(relative_urls);
        }
        if let Some(delete) = overrides.delete_output_directory {
            log::debug!("Overriding config `delete_output_directory` with `{delete}`");
            self.delete_output_directory = delete;
        }
        for (name, value) in overrides.template_globals.iter() {
            let slot = self.template_globals.get_mut(name.as_str()).ok_or_else(|| {
                Status::new("Override targets an undefined template global")
                    .context_with(|c| c.insert("Global", name.to_string()))
            })?;
            log::debug!("Overriding config `template_globals.{name}`");
            *slot = value.clone();
        }
        Ok(self)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{converted}")
    }
}

fn find_project_file<P: Into<path::PathBuf>>(dir: P, name: &str) -> Option<path::PathBuf> {
    find_project_file_internal(dir.into(), name)
}

fn find_project_file_internal(dir: path::PathBuf, name: &str) -> Option<path::PathBuf> {
    let mut file_path = dir;
    file_path.push(name);
    while !file_path.exists() {
        file_path.pop(); // filename
        let hit_bottom = !file_path.pop();
        if hit_bottom {
            return None;
        }
        file_path.push(name);
    }
    Some(file_path)
}
