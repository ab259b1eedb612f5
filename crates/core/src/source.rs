use crate::Result;
use crate::SourcePath;
use crate::Status;

/// Walks a content directory, skipping anything matched by gitignore-style entries.
#[derive(Debug, Clone)]
pub struct Source {
    root: std::path::PathBuf,
    ignore: ignore::gitignore::Gitignore,
}

impl Source {
    pub fn new<'i>(
        root: &std::path::Path,
        ignores: impl IntoIterator<Item = &'i str>,
    ) -> Result<Self> {
        let mut ignore = ignore::gitignore::GitignoreBuilder::new(root);
        for line in ignores.into_iter() {
            ignore.add_line(None, line).map_err(|e| {
                Status::new("Invalid ignore entry")
                    .with_source(e)
                    .context_with(|c| c.insert("Entry", line.to_owned()))
            })?;
        }
        let ignore = ignore
            .build()
            .map_err(|e| Status::new("Invalid ignore entry").with_source(e))?;

        let source = Self {
            root: root.to_owned(),
            ignore,
        };
        Ok(source)
    }

    /// Every included file, sorted by name within each directory.
    pub fn iter(&self) -> impl Iterator<Item = SourcePath> + '_ {
        walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| self.includes_entry(e))
            .filter_map(|e| match e {
                Ok(e) => Some(e),
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter_map(move |e| SourcePath::from_root(&self.root, e.path()))
    }

    fn includes_path(&self, path: &std::path::Path, is_dir: bool) -> bool {
        match self.ignore.matched(path, is_dir) {
            ignore::Match::None => true,
            ignore::Match::Ignore(glob) => {
                log::trace!("{:?}: ignored {:?}", path, glob.original());
                false
            }
            ignore::Match::Whitelist(glob) => {
                log::trace!("{:?}: allowed {:?}", path, glob.original());
                true
            }
        }
    }

    fn includes_entry(&self, entry: &walkdir::DirEntry) -> bool {
        let file = entry.path();

        // `filter_entry` already pruned any excluded parent directory.
        let is_dir = entry.file_type().is_dir();
        self.includes_path(file, is_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
        dir
    }

    fn walk(root: &std::path::Path, ignores: &[&str]) -> Vec<String> {
        let source = Source::new(root, ignores.iter().copied()).unwrap();
        source.iter().map(|p| p.rel_path.to_string()).collect()
    }

    #[test]
    fn iter_without_ignores() {
        let dir = content_tree(&["about.md", "posts/2019-11-04-hydra.md"]);
        assert_eq!(
            walk(dir.path(), &[]),
            vec!["about.md", "posts/2019-11-04-hydra.md"]
        );
    }

    #[test]
    fn iter_walks_sorted_and_skips_ignored() {
        let dir = content_tree(&[
            "posts/2023-05-08-b.md",
            "posts/2023-05-01-a.md",
            "images/plot.png",
            "about.md",
        ]);
        assert_eq!(
            walk(dir.path(), &["/images"]),
            vec!["about.md", "posts/2023-05-01-a.md", "posts/2023-05-08-b.md"]
        );
    }

    #[test]
    fn iter_skips_files_under_ignored_dir() {
        let dir = content_tree(&["extra/robots.txt", "extra/nested/CNAME", "pages/about.md"]);
        assert_eq!(walk(dir.path(), &["/extra"]), vec!["pages/about.md"]);
    }

    #[test]
    fn static_entry_is_anchored() {
        let dir = content_tree(&["js/site.js", "posts/js/notes.md"]);
        assert_eq!(walk(dir.path(), &["/js"]), vec!["posts/js/notes.md"]);
    }

    #[test]
    fn ignore_hidden() {
        let dir = content_tree(&[".draft.md", ".cache/post.md", "post.md"]);
        assert_eq!(walk(dir.path(), &[".*"]), vec!["post.md"]);
    }

    #[test]
    fn invalid_ignore_entry() {
        let dir = content_tree(&[]);
        assert!(Source::new(dir.path(), ["{unclosed"]).is_err());
    }
}
