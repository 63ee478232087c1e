#![forbid(unsafe_code)]

mod config;
mod domain;
mod error;
mod gettext;
pub mod global;
mod loader;
mod locale;
mod snapshot;

pub use crate::config::{
    DEFAULT_LANGUAGE, DEFAULT_LIBRARY, GettextConfig, load_config, load_config_or_default,
};
pub use crate::domain::Domain;
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::gettext::Gettext;
pub use crate::loader::{CatalogFormat, catalog_candidates, find_catalog, read_catalog};
pub use crate::locale::{DEFAULT_DOMAIN, Locale};
pub use crate::snapshot::{CatalogSnapshot, EntrySnapshot};
