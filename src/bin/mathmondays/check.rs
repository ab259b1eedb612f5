use anyhow::Context as _;
use mathmondays::Variant;

use crate::args;
use crate::error::Result;

/// Validate the settings of every build variant
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct CheckArgs {
    #[command(flatten, next_help_heading = "Config")]
    config: args::ConfigArgs,
}

impl CheckArgs {
    pub(crate) fn run(&self) -> Result<()> {
        let config = self.config.load_config()?;
        for variant in Variant::ALL {
            let settings = mathmondays::build_config(
                config.clone(),
                variant,
                &mathmondays::Overrides::empty(),
            )
            .with_context(|| anyhow::format_err!("{variant} settings failed to validate"))?;
            log::debug!(
                "{variant}: {} plugins, output to `{}`",
                settings.plugins.len(),
                settings.output_path
            );
            println!("{variant}: ok");
        }
        Ok(())
    }
}
