use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ViewerConfig;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "traceline.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load the viewer config.
///
/// With an explicit path, the file must exist and parse. Without one, a
/// missing `traceline.toml` in the current directory is not an error and
/// the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    match path {
        Some(p) => read_config(p),
        None => {
            let p = Path::new(CONFIG_FILE);
            if p.exists() {
                read_config(p)
            } else {
                Ok(ViewerConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}
