/// A file under a static path that is published somewhere other than its source location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraPath {
    pub source: crate::RelPath,
    pub path: crate::RelPath,
}

impl ExtraPath {
    pub fn new(source: impl Into<crate::RelPath>, path: impl Into<crate::RelPath>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
        }
    }
}

pub fn default_static_paths() -> Vec<crate::RelPath> {
    ["extra", "images", "js"]
        .into_iter()
        .map(crate::RelPath::from)
        .collect()
}

/// Files in `extra/` get copied to the root of the output.
pub fn default_extra_path_metadata() -> Vec<ExtraPath> {
    const EXTRA_FILES: &[(&str, &str)] = &[
        ("extra/CNAME", "CNAME"),
        ("extra/.nojekyll", ".nojekyll"),
        ("extra/robots.txt", "robots.txt"),
    ];
    EXTRA_FILES
        .iter()
        .map(|(source, path)| ExtraPath::new(*source, *path))
        .collect()
}
