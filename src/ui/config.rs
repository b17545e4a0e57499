use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use pitwall::PitwallError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Dashboard state restored between runs
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) last_archive: Option<PathBuf>,
    pub(crate) selected_year: String,
    pub(crate) selected_event: String,
    pub(crate) selected_session: String,
    pub(crate) selected_driver: String,
}

impl AppConfig {
    pub(crate) fn local_path() -> Result<PathBuf, PitwallError> {
        Ok(dirs::config_dir()
            .ok_or(PitwallError::NoConfigDir)?
            .join("pitwall")
            .join(CONFIG_FILE_NAME))
    }

    pub(crate) fn from_local_file() -> Result<Option<Self>, PitwallError> {
        Self::load_from(&Self::local_path()?)
    }

    pub(crate) fn load_from(config_path: &Path) -> Result<Option<Self>, PitwallError> {
        if !config_path.exists() {
            debug!("No config file at {:?}", config_path);
            return Ok(None);
        }
        let file = std::fs::File::open(config_path)
            .map_err(|e| PitwallError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| PitwallError::ConfigSerializeError { source: e })
    }

    pub(crate) fn save_to(&self, config_path: &Path) -> Result<(), PitwallError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| PitwallError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| PitwallError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| PitwallError::ConfigSerializeError { source: e })
    }
}
