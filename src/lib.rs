//! Settings for the Math Mondays blog.
//!
//! [`load`] gives the canonical record for a build [`Variant`];
//! [`build_config`] composes an arbitrary base [`Config`] with overrides.

pub use mathmondays_config::Config;
pub use mathmondays_config::Overrides;
pub use mathmondays_config::Variant;

pub use crate::error::Error;
pub use crate::settings::Settings;
pub use crate::settings::build_config;
pub use crate::settings::load;

pub mod error;
pub mod filename;
pub mod markdown;
pub mod pagination;
pub mod permalink;
pub mod plugins;
pub mod settings;
pub mod slug;
pub mod urls;
