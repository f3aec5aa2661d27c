use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::debug;
use serde::Serialize;
use serde_json::Error as SerdeError;

use crate::model::ConnectionSet;

const CONFIG_FILE: &str = "ssh_config.json";

/// Local JSON cache of the connection set.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// `~/.config/sshman/ssh_config.json` on Linux, `%APPDATA%\sshman\...` on Windows, etc.
    pub fn new() -> io::Result<Self> {
        let proj = ProjectDirs::from("", "", "sshman")
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Unable to locate config dir"))?;
        Ok(Self {
            path: proj.config_dir().join(CONFIG_FILE),
        })
    }

    /// Use an explicit file path instead of the platform default.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached set. A missing file is an empty set; malformed JSON
    /// is an error the caller decides how to surface.
    pub fn load(&self) -> io::Result<ConnectionSet> {
        if !self.path.exists() {
            debug!("No config file at {:?}, starting empty", self.path);
            return Ok(ConnectionSet::new());
        }
        let file = fs::File::open(&self.path)?;
        serde_json::from_reader(file).map_err(SerdeError::into)
    }

    /// Overwrite the config file with `set` as 4-space-indented JSON.
    ///
    /// The parent directory must already exist. On failure the file may be
    /// out of sync with the in-memory set; the caller reports and carries on.
    pub fn persist(&self, set: &ConnectionSet) -> io::Result<()> {
        let file = fs::File::create(&self.path)?;
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(file, fmt);
        set.serialize(&mut ser).map_err(SerdeError::into)
    }
}
