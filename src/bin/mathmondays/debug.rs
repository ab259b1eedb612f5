use mathmondays::Settings;
use mathmondays::permalink::Attributes;
use mathmondays::urls::ContentKind;

use crate::args;
use crate::error::Result;

/// Print site debug information
#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum DebugCommands {
    /// List content files with the metadata taken from their names
    Files {
        #[command(flatten)]
        variant: args::VariantArgs,

        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },

    /// Print where a piece of content is published
    Url {
        /// Kind of content
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,

        /// Slug, or a title to derive it from
        slug: String,

        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,

        /// Category the content is filed under
        #[arg(long, default_value = "misc")]
        category: String,

        #[command(flatten)]
        variant: args::VariantArgs,

        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },

    /// Print where a page of a listing is published
    Page {
        /// Save path of the listing's first page, e.g. `tag/math.html`
        save_as: String,

        /// Page number, starting at 1
        number: usize,

        #[command(flatten)]
        variant: args::VariantArgs,

        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },
}

impl DebugCommands {
    pub(crate) fn run(&self) -> Result<()> {
        match self {
            Self::Files { variant, config } => {
                let config = config.load_config()?;
                let content_root = config.root.clone();
                let settings = variant.resolve(config)?;
                list_files(&settings, &content_root)?;
            }
            Self::Url {
                kind,
                slug,
                date,
                category,
                variant,
                config,
            } => {
                let config = config.load_config()?;
                let settings = variant.resolve(config)?;

                let mut attributes = Attributes::new()
                    .with("slug", mathmondays::slug::slugify(slug))
                    .with("lang", settings.locale.default_lang.as_str())
                    .with("author", mathmondays::slug::slugify(&settings.site.author))
                    .with("category", mathmondays::slug::slugify(category));
                if let Some(date) = date {
                    attributes.insert("date", *date);
                }
                match settings.urls.locate(*kind, &attributes)? {
                    Some(location) => println!("{location}"),
                    None => println!("{kind} pages are not generated"),
                }
            }
            Self::Page {
                save_as,
                number,
                variant,
                config,
            } => {
                let config = config.load_config()?;
                let settings = variant.resolve(config)?;

                let base_name = mathmondays::pagination::base_name(save_as);
                let location = settings.pagination.locate(&base_name, *number)?;
                println!("{location}");
            }
        }

        Ok(())
    }
}

fn parse_kind(raw: &str) -> Result<ContentKind> {
    raw.parse()
}

fn list_files(settings: &Settings, root: &std::path::Path) -> Result<()> {
    let content_root = settings.path.to_path(root);
    let ignores: Vec<_> = settings
        .static_paths
        .iter()
        .map(|p| format!("/{p}"))
        .chain([".*".to_owned()])
        .collect();
    let source =
        mathmondays_core::Source::new(&content_root, ignores.iter().map(|s| s.as_str()))?;

    for file in source.iter() {
        match settings.filename_metadata.extract(file.stem()) {
            Some(metadata) => {
                let date = metadata
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                let slug = metadata
                    .slug
                    .unwrap_or_else(|| mathmondays::slug::slugify(file.stem()));
                println!("{} date={date} slug={slug}", file.rel_path);
            }
            None => {
                println!(
                    "{} date=- slug={} (default metadata)",
                    file.rel_path,
                    mathmondays::slug::slugify(file.stem())
                );
            }
        }
    }

    Ok(())
}
