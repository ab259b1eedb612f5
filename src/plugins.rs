use std::collections::HashSet;
use std::fmt;

use liquid_core::model::KString;

use crate::error::Result;

/// Prefix for plugins vendored into the site's own `plugins/` package.
const VENDORED_PREFIX: &str = "plugins.";

/// Plugins the generator knows how to load.
const KNOWN_PLUGINS: &[&str] = &[
    "assets",
    "i18n_subsites",
    "jinja2content",
    "liquid_tags",
    "neighbors",
    "pelican_javascript",
    "related_posts",
    "render_math",
    "simple_footnotes",
    "sitemap",
    "summary",
    "tag_cloud",
    "tipue_search",
    "webassets",
];

/// `(first, second)`: `first` has to be listed before `second`.
const ORDERING: &[(&str, &str)] = &[("jinja2content", "summary")];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plugin {
    id: KString,
    name: &'static str,
}

impl Plugin {
    pub fn parse(id: &str) -> Result<Self> {
        let bare = id.strip_prefix(VENDORED_PREFIX).unwrap_or(id);
        let name = KNOWN_PLUGINS
            .iter()
            .copied()
            .find(|known| *known == bare)
            .ok_or_else(|| anyhow::format_err!("Unknown plugin `{id}`"))?;
        Ok(Self {
            id: KString::from_ref(id),
            name,
        })
    }

    /// Identifier as listed in the settings.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_vendored(&self) -> bool {
        self.id.starts_with(VENDORED_PREFIX)
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl serde::Serialize for Plugin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Plugins in activation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct PluginManifest {
    plugins: Vec<Plugin>,
}

impl PluginManifest {
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(ids.len());
        for id in ids {
            let plugin = Plugin::parse(id.as_ref())?;
            if !seen.insert(plugin.name()) {
                anyhow::bail!("Plugin `{}` is listed more than once", plugin.name());
            }
            plugins.push(plugin);
        }
        let manifest = Self { plugins };

        for (first, second) in ORDERING {
            if let (Some(f), Some(s)) = (manifest.position(first), manifest.position(second)) {
                if s < f {
                    anyhow::bail!("Plugin `{first}` must be listed before `{second}`");
                }
            }
        }

        Ok(manifest)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.id())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
