use relative_path::RelativePathBuf;

/// A discovered file, addressed both on disk and relative to the content root.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SourcePath {
    pub abs_path: std::path::PathBuf,
    pub rel_path: RelativePathBuf,
}

impl SourcePath {
    pub fn from_root(root: &std::path::Path, path: &std::path::Path) -> Option<Self> {
        let abs_path = path.to_owned();
        let rel_path = path.strip_prefix(root).ok()?;
        let rel_path = RelativePathBuf::from_path(rel_path).ok()?;
        Some(Self { abs_path, rel_path })
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.rel_path.file_stem().unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&str> {
        self.rel_path.extension()
    }
}
