use std::env;
use std::io::Write as _;
use std::path;

use anyhow::Context as _;
use mathmondays::Config;
use mathmondays::Overrides;
use mathmondays::Settings;
use mathmondays::Variant;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ConfigArgs {
    /// Settings file to use [default: _mathmondays.yml]
    #[arg(short, long, value_name = "FILE")]
    config: Option<path::PathBuf>,
}

impl ConfigArgs {
    pub(crate) fn load_config(&self) -> Result<Config> {
        let config_path = self.config.as_deref();

        // Fetch config information if available
        let config = if let Some(config_path) = config_path {
            Config::from_file(config_path).with_context(|| {
                anyhow::format_err!("Error reading config file {}", config_path.display())
            })?
        } else {
            let cwd = env::current_dir().unwrap_or_default();
            Config::from_cwd(cwd)?
        };

        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct VariantArgs {
    /// Build to resolve settings for: `development` (`dev`) or `production` (`publish`)
    #[arg(long, value_name = "VARIANT", value_parser = parse_variant, default_value_t = Variant::Development)]
    variant: Variant,

    /// Resolve the settings used when publishing (`--variant production`)
    #[arg(long, conflicts_with = "variant")]
    publish: bool,

    /// Override a setting, e.g. `site_url=http://localhost:8000`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

impl VariantArgs {
    pub(crate) fn variant(&self) -> Variant {
        if self.publish {
            Variant::Production
        } else {
            self.variant
        }
    }

    pub(crate) fn overrides(&self) -> Result<Overrides> {
        let overrides = Overrides::from_pairs(self.overrides.iter().map(String::as_str))?;
        Ok(overrides)
    }

    pub(crate) fn resolve(&self, config: Config) -> Result<Settings> {
        let variant = self.variant();
        let overrides = self.overrides()?;
        log::debug!("Resolving {variant} settings");
        mathmondays::build_config(config, variant, &overrides)
    }
}

fn parse_variant(raw: &str) -> Result<Variant> {
    let variant = raw.parse::<Variant>()?;
    Ok(variant)
}

pub(crate) fn init_logging(
    level: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
    colored: bool,
) {
    if let Some(level) = level.log_level() {
        let palette = if colored {
            Palette::colored()
        } else {
            Palette::plain()
        };

        let mut builder = env_logger::Builder::new();
        builder.write_style(if colored {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        });

        builder.filter(None, level.to_level_filter());

        if level == log::Level::Trace || level == log::Level::Debug {
            builder.format_timestamp_secs();
        } else {
            builder.format(move |f, record| match record.level() {
                log::Level::Error => writeln!(
                    f,
                    "{}{}:{} {}",
                    palette.error.render(),
                    record.level(),
                    palette.error.render_reset(),
                    record.args()
                ),
                log::Level::Warn => writeln!(
                    f,
                    "{}{}:{} {}",
                    palette.warn.render(),
                    record.level(),
                    palette.warn.render_reset(),
                    record.args()
                ),
                log::Level::Info => writeln!(f, "{}", record.args()),
                log::Level::Debug | log::Level::Trace => writeln!(
                    f,
                    "{}{}:{} {}",
                    palette.debug.render(),
                    record.level(),
                    palette.debug.render_reset(),
                    record.args()
                ),
            });
        }

        builder.init();
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct Palette {
    error: anstyle::Style,
    warn: anstyle::Style,
    debug: anstyle::Style,
}

impl Palette {
    fn colored() -> Self {
        Self {
            error: anstyle::AnsiColor::Red.on_default() | anstyle::Effects::BOLD,
            warn: anstyle::AnsiColor::Yellow.on_default(),
            debug: anstyle::AnsiColor::Blue.on_default(),
        }
    }

    fn plain() -> Self {
        Self::default()
    }
}
