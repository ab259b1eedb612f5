use std::fmt;
use std::str::FromStr;

use liquid_core::model::KString;
use liquid_core::model::Value;

use crate::Result;
use crate::Status;

pub const PRODUCTION_URL: &str = "https://mathmondays.com";

/// Which build the settings are for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    #[default]
    Development,
    Production,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Development, Variant::Production];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Status;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "production" | "publish" => Ok(Self::Production),
            _ => Err(Status::new("Unknown variant").context_with(|c| c.insert("Variant", s.to_owned()))),
        }
    }
}

/// Settings a variant is allowed to replace.
///
/// Anything outside of these fields is fixed by the base configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_urls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_output_directory: Option<bool>,
    #[serde(skip_serializing_if = "liquid_core::Object::is_empty")]
    pub template_globals: liquid_core::Object,
}

impl Overrides {
    pub fn empty() -> Self {
        Self::default()
    }

    /// What `publish` changes on top of the development settings.
    pub fn publish() -> Self {
        let mut template_globals = liquid_core::Object::new();
        template_globals.insert(KString::from_static("production"), Value::scalar(true));
        Self {
            site_url: Some(PRODUCTION_URL.to_owned()),
            relative_urls: Some(false),
            delete_output_directory: Some(true),
            template_globals,
        }
    }

    /// Parse `key=value` pairs, as given on the command line.
    pub fn from_pairs<'s>(pairs: impl IntoIterator<Item = &'s str>) -> Result<Self> {
        let mut overrides = Self::empty();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Status::new("Override must be written as `key=value`")
                    .context_with(|c| c.insert("Override", pair.to_owned()))
            })?;
            overrides.set(key.trim(), value.trim())?;
        }
        Ok(overrides)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "site_url" | "site.url" => {
                self.site_url = Some(value.to_owned());
            }
            "relative_urls" => {
                self.relative_urls = Some(parse_bool(key, value)?);
            }
            "delete_output_directory" => {
                self.delete_output_directory = Some(parse_bool(key, value)?);
            }
            _ => match key.strip_prefix("template_globals.") {
                Some(name) if !name.is_empty() => {
                    let value = parse_scalar(key, value)?;
                    self.template_globals.insert(KString::from_ref(name), value);
                }
                _ => {
                    return Err(Status::new("Setting cannot be overridden")
                        .context_with(|c| c.insert("Key", key.to_owned())));
                }
            },
        }
        Ok(())
    }

    /// Fill in anything unset from `other`; values already in `self` win.
    pub fn merge(self, other: &Self) -> Self {
        let Overrides {
            site_url,
            relative_urls,
            delete_output_directory,
            template_globals,
        } = self;
        let mut merged_globals = other.template_globals.clone();
        for (name, value) in template_globals {
            merged_globals.insert(name, value);
        }
        Self {
            site_url: site_url.or_else(|| other.site_url.clone()),
            relative_urls: relative_urls.or(other.relative_urls),
            delete_output_directory: delete_output_directory.or(other.delete_output_directory),
            template_globals: merged_globals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.site_url.is_none()
            && self.relative_urls.is_none()
            && self.delete_output_directory.is_none()
            && self.template_globals.is_empty()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|e| {
        Status::new("Expected `true` or `false`")
            .with_source(e)
            .context_with(|c| c.insert("Key", key.to_owned()))
    })
}

fn parse_scalar(key: &str, value: &str) -> Result<Value> {
    serde_yaml::from_str(value).map_err(|e| {
        Status::new("Invalid template global value")
            .with_source(e)
            .context_with(|c| c.insert("Key", key.to_owned()))
    })
}
