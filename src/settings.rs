//! The resolved settings record handed to the generation pipeline.

use std::collections::HashSet;
use std::fmt;

use anyhow::Context as _;
use liquid_core::ValueView as _;
use mathmondays_config::Config;
use mathmondays_config::ExtraPath;
use mathmondays_config::Feeds;
use mathmondays_config::FooterLinks;
use mathmondays_config::Locale;
use mathmondays_config::Markdown;
use mathmondays_config::Overrides;
use mathmondays_config::RelPath;
use mathmondays_config::Site;
use mathmondays_config::Sitemap;
use mathmondays_config::Variant;
use relative_path::RelativePath;

use crate::error::Result;
use crate::filename::FilenameMetadata;
use crate::pagination::PaginationScheme;
use crate::plugins::PluginManifest;
use crate::urls::UrlScheme;

/// Template global every theme can branch on.
pub const PRODUCTION_GLOBAL: &str = "production";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Settings {
    pub site: Site,
    pub path: RelPath,
    pub theme: RelPath,
    pub output_path: RelPath,
    pub locale: Locale,
    pub feeds: Feeds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_urls: Option<bool>,
    pub delete_output_directory: bool,
    pub plugins: PluginManifest,
    pub markdown: Markdown,
    pub static_paths: Vec<RelPath>,
    pub extra_path_metadata: Vec<ExtraPath>,
    pub urls: UrlScheme,
    pub pagination: PaginationScheme,
    pub footer_links: FooterLinks,
    pub filename_metadata: FilenameMetadata,
    pub summary_end_marker: String,
    pub sitemap: Sitemap,
    pub template_globals: liquid_core::Object,
}

/// The canonical Math Mondays settings for `variant`.
pub fn load(variant: Variant) -> Result<Settings> {
    build_config(Config::default(), variant, &Overrides::empty())
}

/// Layer `variant`'s overrides and then `overrides` onto `config`, and validate the result.
///
/// `overrides` wins over the variant's own override set.
pub fn build_config(config: Config, variant: Variant, overrides: &Overrides) -> Result<Settings> {
    let variant_overrides = config.overrides_for(variant);
    let overrides = overrides.clone().merge(&variant_overrides);
    let config = config
        .with_overrides(&overrides)
        .with_context(|| anyhow::format_err!("Failed to apply {variant} overrides"))?;
    Settings::from_config(config, variant)
        .with_context(|| anyhow::format_err!("Invalid {variant} settings"))
}

impl Settings {
    pub fn from_config(config: Config, variant: Variant) -> Result<Self> {
        let Config {
            root: _,
            site,
            path,
            theme,
            output_path,
            locale,
            feeds,
            relative_urls,
            delete_output_directory,
            plugins,
            markdown,
            static_paths,
            extra_path_metadata,
            urls,
            pagination,
            footer_links,
            filename_metadata,
            summary_end_marker,
            sitemap,
            template_globals,
            publish: _,
        } = config;

        let site = Site {
            url: validate_site_url(variant, &site.url)?,
            ..site
        };
        validate_locale(&locale)?;

        ensure_contained("path", &path)?;
        ensure_contained("theme", &theme)?;
        ensure_contained("output_path", &output_path)?;
        validate_output_path(&path, &output_path, delete_output_directory)?;
        for static_path in &static_paths {
            ensure_contained("static_paths", static_path)?;
        }
        for (name, feed) in feeds.enabled() {
            ensure_contained(&format!("feeds.{name}"), feed)?;
        }
        validate_extra_paths(&static_paths, &extra_path_metadata)?;

        let plugins = PluginManifest::from_ids(plugins.as_slice())?;
        crate::markdown::validate(&markdown)?;
        let urls = UrlScheme::from_config(&urls)?;
        let pagination = PaginationScheme::from_config(&pagination)?;
        let filename_metadata = FilenameMetadata::new(&filename_metadata)?;

        let production = production_flag(&template_globals)?;
        if production != (variant == Variant::Production) {
            log::warn!("`template_globals.{PRODUCTION_GLOBAL}` is `{production}` for a {variant} build");
        }
        if plugins.contains("summary") && summary_end_marker.is_empty() {
            log::debug!("`summary_end_marker` is empty, summaries fall back to truncation");
        }

        Ok(Self {
            site,
            path,
            theme,
            output_path,
            locale,
            feeds,
            relative_urls,
            delete_output_directory,
            plugins,
            markdown,
            static_paths,
            extra_path_metadata,
            urls,
            pagination,
            footer_links,
            filename_metadata,
            summary_end_marker,
            sitemap,
            template_globals,
        })
    }

    /// Links are document-relative unless explicitly turned off.
    pub fn uses_relative_urls(&self) -> bool {
        self.relative_urls.unwrap_or(true)
    }

    pub fn is_production(&self) -> bool {
        production_flag(&self.template_globals).unwrap_or(false)
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(yaml)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = self.to_yaml().map_err(|_| fmt::Error)?;
        write!(f, "{converted}")
    }
}

fn production_flag(globals: &liquid_core::Object) -> Result<bool> {
    globals
        .get(PRODUCTION_GLOBAL)
        .and_then(|v| v.as_scalar())
        .and_then(|s| s.to_bool())
        .ok_or_else(|| {
            anyhow::format_err!("`template_globals.{PRODUCTION_GLOBAL}` must be `true` or `false`")
        })
}

fn validate_site_url(variant: Variant, url: &str) -> Result<String> {
    let url = url.trim_end_matches('/');
    if url.is_empty() {
        if variant == Variant::Production {
            anyhow::bail!("`site.url` must be set for a {variant} build");
        }
        return Ok(String::new());
    }

    let host = match variant {
        Variant::Production => url.strip_prefix("https://"),
        Variant::Development => url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://")),
    };
    let host = host.and_then(|rest| rest.split('/').next()).unwrap_or_default();
    if host.is_empty() {
        match variant {
            Variant::Production => {
                anyhow::bail!("`site.url` must be a fully-qualified https URL, got `{url}`")
            }
            Variant::Development => {
                anyhow::bail!("`site.url` must be empty or an http(s) URL, got `{url}`")
            }
        }
    }
    Ok(url.to_owned())
}

fn validate_locale(locale: &Locale) -> Result<()> {
    if locale.timezone.trim().is_empty() {
        anyhow::bail!("`locale.timezone` must not be empty");
    }
    if locale.default_lang.trim().is_empty() {
        anyhow::bail!("`locale.default_lang` must not be empty");
    }
    crate::permalink::validate_date_format(&locale.default_date_format)
        .context("Invalid `locale.default_date_format`")?;
    Ok(())
}

/// Reject paths that would land outside of the directory they are relative to.
pub(crate) fn ensure_contained(what: &str, path: &RelativePath) -> Result<()> {
    let escapes = path.as_str().starts_with('/')
        || path
            .components()
            .any(|c| matches!(c, relative_path::Component::ParentDir));
    if escapes {
        anyhow::bail!("`{what}` must stay inside the site, got `{path}`");
    }
    Ok(())
}

fn is_site_root(path: &RelativePath) -> bool {
    path.normalize().as_str().is_empty()
}

fn validate_output_path(content: &RelativePath, output: &RelativePath, delete: bool) -> Result<()> {
    if content.normalize() == output.normalize() {
        anyhow::bail!("`output_path` and `path` must differ, both are `{output}`");
    }
    if delete && is_site_root(output) {
        anyhow::bail!("Refusing to clear the site root; set `output_path` to a subdirectory");
    }
    Ok(())
}

fn validate_extra_paths(static_paths: &[RelPath], extra: &[ExtraPath]) -> Result<()> {
    let mut destinations = HashSet::new();
    for entry in extra {
        ensure_contained("extra_path_metadata.source", &entry.source)?;
        ensure_contained("extra_path_metadata.path", &entry.path)?;
        if !static_paths.iter().any(|s| entry.source.starts_with(s)) {
            anyhow::bail!(
                "`{}` is not under any of `static_paths` ({})",
                entry.source,
                itertools::join(static_paths, ", ")
            );
        }
        if !destinations.insert(entry.path.normalize()) {
            anyhow::bail!("More than one file is published to `{}`", entry.path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use mathmondays_config::UrlTemplate;

    use super::*;

    fn development() -> Settings {
        load(Variant::Development).unwrap()
    }

    fn production() -> Settings {
        load(Variant::Production).unwrap()
    }

    #[test]
    fn load_every_variant() {
        for variant in Variant::ALL {
            let settings = load(variant).unwrap();
            assert_eq!(settings.site.name, "Math Mondays");
            assert_eq!(settings.site.author, "Henry Swanson");
            assert_eq!(settings.path, RelPath::from("content"));
            assert_eq!(settings.theme, RelPath::from("theme"));
            assert_eq!(settings.locale.timezone, "America/Los_Angeles");
            assert_eq!(settings.locale.default_lang, "en");
            assert_eq!(settings.locale.default_date_format, "%B %-d, %Y");
            assert_eq!(settings.feeds.enabled().count(), 0);
            assert_eq!(settings.plugins.len(), 5);
            assert_eq!(settings.static_paths.len(), 3);
            assert_eq!(settings.extra_path_metadata.len(), 3);
            assert_eq!(settings.pagination.per_page, 10);
            assert_eq!(settings.footer_links.len(), 4);
            assert_eq!(settings.summary_end_marker, "<!-- more -->");
            assert_eq!(settings.sitemap.format.as_str(), "xml");
        }
    }

    #[test]
    fn base_url_per_variant() {
        assert_eq!(development().site.url, "");
        assert_eq!(production().site.url, "https://mathmondays.com");
    }

    #[test]
    fn relative_urls_per_variant() {
        assert_eq!(development().relative_urls, None);
        assert!(development().uses_relative_urls());
        assert_eq!(production().relative_urls, Some(false));
        assert!(!production().uses_relative_urls());
    }

    #[test]
    fn production_flag_per_variant() {
        assert!(!development().is_production());
        assert!(!development().delete_output_directory);
        assert!(production().is_production());
        assert!(production().delete_output_directory);
    }

    #[test]
    fn production_only_changes_overridden_fields() {
        let development = development();
        let mut production = production();
        assert_ne!(production, development);

        production.site.url = development.site.url.clone();
        production.relative_urls = development.relative_urls;
        production.delete_output_directory = development.delete_output_directory;
        production.template_globals = development.template_globals.clone();
        assert_eq!(production, development);
    }

    #[test]
    fn plugin_order_is_preserved() {
        let ids: Vec<_> = development().plugins.ids().map(str::to_owned).collect();
        assert_eq!(
            ids,
            [
                "plugins.summary",
                "render_math",
                "simple_footnotes",
                "sitemap",
                "webassets"
            ]
        );

        let mut config = Config::default();
        config.plugins.swap(1, 3);
        let settings = build_config(config, Variant::Development, &Overrides::empty()).unwrap();
        let ids: Vec<_> = settings.plugins.ids().collect();
        assert_eq!(ids[1], "sitemap");
        assert_eq!(ids[3], "render_math");
    }

    #[test]
    fn unknown_plugin_is_fatal() {
        let mut config = Config::default();
        config.plugins.push("pelican_unknown".into());
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn invalid_filename_metadata_is_fatal() {
        let config = Config {
            filename_metadata: "(?P<date>".to_owned(),
            ..Default::default()
        };
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn filename_metadata_matches() {
        let settings = development();
        let metadata = settings
            .filename_metadata
            .extract("2023-05-01-my-post")
            .unwrap();
        assert_eq!(metadata.date.unwrap().to_string(), "2023-05-01");
        assert_eq!(metadata.slug.as_deref(), Some("my-post"));
        assert_eq!(settings.filename_metadata.extract("my-post"), None);
    }

    #[test]
    fn pagination_patterns() {
        let settings = development();
        let first = settings.pagination.locate("tag/math", 1).unwrap();
        assert_eq!(first.save_as, RelPath::from("tag/math/index.html"));
        let third = settings.pagination.locate("tag/math", 3).unwrap();
        assert_eq!(third.save_as, RelPath::from("tag/math/page/3/index.html"));
    }

    #[test]
    fn overrides_win_over_variant() {
        let overrides = Overrides::from_pairs(["site_url=https://staging.mathmondays.com/"]).unwrap();
        let settings = build_config(Config::default(), Variant::Production, &overrides).unwrap();
        assert_eq!(settings.site.url, "https://staging.mathmondays.com");
        assert_eq!(settings.relative_urls, Some(false));
    }

    #[test]
    fn development_accepts_local_url() {
        let overrides = Overrides::from_pairs(["site_url=http://localhost:8000"]).unwrap();
        let settings = build_config(Config::default(), Variant::Development, &overrides).unwrap();
        assert_eq!(settings.site.url, "http://localhost:8000");
    }

    #[test]
    fn production_requires_https() {
        let overrides = Overrides::from_pairs(["site_url=http://mathmondays.com"]).unwrap();
        assert!(build_config(Config::default(), Variant::Production, &overrides).is_err());

        let overrides = Overrides::from_pairs(["site_url=https://"]).unwrap();
        assert!(build_config(Config::default(), Variant::Production, &overrides).is_err());
    }

    #[test]
    fn production_requires_url() {
        let mut config = Config::default();
        config.publish.site_url = None;
        assert!(build_config(config, Variant::Production, &Overrides::empty()).is_err());
    }

    #[test]
    fn override_of_undefined_global_is_fatal() {
        let overrides = Overrides::from_pairs(["template_globals.analytics=true"]).unwrap();
        assert!(build_config(Config::default(), Variant::Development, &overrides).is_err());
    }

    #[test]
    fn production_global_must_be_bool() {
        let overrides = Overrides::from_pairs(["template_globals.production=maybe"]).unwrap();
        assert!(build_config(Config::default(), Variant::Development, &overrides).is_err());
    }

    #[test]
    fn extra_path_outside_static_paths() {
        let mut config = Config::default();
        config
            .extra_path_metadata
            .push(ExtraPath::new("theme/favicon.ico", "favicon.ico"));
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn extra_path_duplicate_destination() {
        let mut config = Config::default();
        config
            .extra_path_metadata
            .push(ExtraPath::new("images/robots.txt", "robots.txt"));
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn output_path_cannot_be_content() {
        let config = Config {
            output_path: "content".into(),
            ..Default::default()
        };
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn publish_cannot_clear_site_root() {
        let config = Config {
            output_path: ".".into(),
            ..Default::default()
        };
        assert!(build_config(config.clone(), Variant::Development, &Overrides::empty()).is_ok());
        assert!(build_config(config, Variant::Production, &Overrides::empty()).is_err());
    }

    #[test]
    fn static_path_cannot_escape() {
        let mut config = Config::default();
        config.static_paths.push("../shared".into());
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn bad_url_template_is_fatal() {
        let mut config = Config::default();
        config.urls.tag = UrlTemplate::new("tag/{name}", "tag/{name}.html");
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn time_zone_in_save_path_is_fatal() {
        let mut config = Config::default();
        config.urls.article = UrlTemplate::new("{slug}", "{date:%Z}/{slug}.html");
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());

        // Post dates carry a time, so the display format may use one
        let mut config = Config::default();
        config.locale.default_date_format = "%B %-d, %Y %H:%M".to_owned();
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_ok());
    }

    #[test]
    fn bad_date_format_is_fatal() {
        let mut config = Config::default();
        config.locale.default_date_format = "%B %Q".to_owned();
        assert!(build_config(config, Variant::Development, &Overrides::empty()).is_err());
    }

    #[test]
    fn footer_links_keep_their_order() {
        let config = Config::from_yaml(
            "footer_links:\n  rss: feed.xml\n  github: https://github.com/HenrySwanson\n  email: mailto:henryswanson94@gmail.com\n",
        )
        .unwrap();
        let settings = build_config(config, Variant::Production, &Overrides::empty()).unwrap();
        let names: Vec<_> = settings.footer_links.keys().map(String::as_str).collect();
        assert_eq!(names, ["rss", "github", "email"]);

        let yaml = settings.to_yaml().unwrap();
        let rss = yaml.find("  rss: feed.xml").unwrap();
        let github = yaml.find("  github: ").unwrap();
        let email = yaml.find("  email: ").unwrap();
        assert!(rss < github && github < email);
    }

    #[test]
    fn serializes_record() {
        let settings = production();
        let json: serde_json::Value = serde_json::from_str(&settings.to_json().unwrap()).unwrap();
        assert_eq!(json["site"]["url"], "https://mathmondays.com");
        assert_eq!(json["relative_urls"], false);
        assert_eq!(json["template_globals"]["production"], true);
        assert_eq!(json["plugins"][0], "plugins.summary");
        assert_eq!(json["urls"]["tag"]["save_as"], "tag/{slug}.html");
        assert_eq!(json["urls"]["author"]["save_as"], serde_json::Value::Null);
        assert_eq!(
            json["filename_metadata"],
            mathmondays_config::DEFAULT_FILENAME_METADATA
        );

        let yaml = settings.to_string();
        assert!(yaml.contains("delete_output_directory: true"));
    }
}
