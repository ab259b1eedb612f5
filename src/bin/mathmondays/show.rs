use crate::args;
use crate::error::Result;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    #[default]
    Yaml,
    Json,
}

/// Print the resolved settings record
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    #[command(flatten)]
    variant: args::VariantArgs,

    #[command(flatten, next_help_heading = "Config")]
    config: args::ConfigArgs,
}

impl ShowArgs {
    pub(crate) fn run(&self) -> Result<()> {
        let config = self.config.load_config()?;
        let settings = self.variant.resolve(config)?;
        let rendered = match self.format {
            Format::Yaml => settings.to_yaml()?,
            Format::Json => settings.to_json()?,
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }
}
