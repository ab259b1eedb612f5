/// Feed outputs.  `None` disables a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Feeds {
    pub all_atom: Option<crate::RelPath>,
    pub category_atom: Option<crate::RelPath>,
    pub translation_atom: Option<crate::RelPath>,
    pub author_atom: Option<crate::RelPath>,
    pub author_rss: Option<crate::RelPath>,
}

impl Feeds {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&crate::RelPath>)> {
        [
            ("all_atom", self.all_atom.as_ref()),
            ("category_atom", self.category_atom.as_ref()),
            ("translation_atom", self.translation_atom.as_ref()),
            ("author_atom", self.author_atom.as_ref()),
            ("author_rss", self.author_rss.as_ref()),
        ]
        .into_iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = (&'static str, &crate::RelPath)> {
        self.iter().filter_map(|(name, path)| path.map(|p| (name, p)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_disables_everything() {
        let feeds = Feeds::default();
        assert_eq!(feeds.enabled().count(), 0);
        assert_eq!(feeds.iter().count(), 5);
    }

    #[test]
    fn enabled_reports_configured_feeds() {
        let feeds = Feeds {
            all_atom: Some("feed.xml".into()),
            ..Default::default()
        };
        let enabled: Vec<_> = feeds.enabled().collect();
        assert_eq!(enabled, vec![("all_atom", &crate::RelPath::from("feed.xml"))]);
    }
}
