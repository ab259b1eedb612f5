use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

const DATE_GROUP: &str = "date";
const SLUG_GROUP: &str = "slug";

/// Metadata recovered from a source file's name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub date: Option<chrono::NaiveDate>,
    pub slug: Option<String>,
    /// Any other named groups in the pattern.
    pub extra: BTreeMap<String, String>,
}

/// Pattern applied to file stems; named groups become metadata.
#[derive(Clone, Debug)]
pub struct FilenameMetadata {
    pattern: regex::Regex,
}

impl FilenameMetadata {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = regex::Regex::new(pattern)
            .map_err(|e| anyhow::format_err!("Invalid `filename_metadata` pattern: {e}"))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// `None` means the pipeline falls back to its default metadata.
    ///
    /// The pattern has to match from the start of `stem`.  A `date` group that
    /// isn't a real `YYYY-MM-DD` date counts as no match.
    pub fn extract(&self, stem: &str) -> Option<FileMetadata> {
        let caps = self.pattern.captures(stem)?;
        if caps.get(0).expect("unconditional capture").start() != 0 {
            return None;
        }

        let mut metadata = FileMetadata::default();
        for name in self.pattern.capture_names().flatten() {
            let Some(value) = caps.name(name) else {
                continue;
            };
            let value = value.as_str();
            match name {
                DATE_GROUP => {
                    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok();
                    if date.is_none() {
                        log::debug!("`{stem}`: `{value}` is not a date");
                        return None;
                    }
                    metadata.date = date;
                }
                SLUG_GROUP => {
                    metadata.slug = Some(value.to_owned());
                }
                _ => {
                    metadata.extra.insert(name.to_owned(), value.to_owned());
                }
            }
        }
        Some(metadata)
    }
}

impl PartialEq for FilenameMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FilenameMetadata {}

impl fmt::Display for FilenameMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for FilenameMetadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
