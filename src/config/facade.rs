//! Configuration loading: defaults, global file, then `NOTEBOX_*` environment.

use super::sources::global_file;
use super::NoteboxConfig;
use crate::error::NoteError;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix; nested keys use `__` (`NOTEBOX_LOGGING__LEVEL`).
const ENV_PREFIX: &str = "NOTEBOX";

/// Loads [`NoteboxConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global config file and environment.
    pub fn load() -> Result<NoteboxConfig, NoteError> {
        let builder = global_file::add_to_builder(Config::builder())?;
        let config = builder.add_source(environment()).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from an explicit file (must exist) plus environment overrides.
    pub fn load_from_file(path: &Path) -> Result<NoteboxConfig, NoteError> {
        if !path.is_file() {
            return Err(NoteError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("ignore")
        .try_parsing(true)
}
