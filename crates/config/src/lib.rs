//! Raw settings for the Math Mondays blog, as written in `_mathmondays.yml`.
//!
//! Every type here deserializes with the canonical Math Mondays values as its
//! defaults, so an empty settings file describes the development site.

mod config;
mod feeds;
mod locale;
mod markdown;
mod overrides;
mod pagination;
mod paths;
mod site;
mod sitemap;
mod urls;

pub use self::config::*;
pub use self::feeds::*;
pub use self::locale::*;
pub use self::markdown::*;
pub use self::overrides::*;
pub use self::pagination::*;
pub use self::paths::*;
pub use self::site::*;
pub use self::sitemap::*;
pub use self::urls::*;

pub type RelPath = relative_path::RelativePathBuf;

/// Platform name to URI, in display order.
pub type FooterLinks = indexmap::IndexMap<String, String>;

type Status = status::Status;
type Result<T, E = Status> = std::result::Result<T, E>;
