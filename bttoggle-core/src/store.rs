/*!
 * Last Device Store
 * Remembers the most recently picked device address between runs
 */

use std::fs::{self, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{CtlError, Result};

pub const ADDRESS_LEN: usize = 17;

#[derive(Debug, Clone)]
pub struct LastDeviceStore {
    path: PathBuf,
}

impl LastDeviceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored address, creating an empty store file if needed.
    pub fn load(&self) -> Result<Option<String>> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        let address = content.trim_end_matches(&['\n', '\r'][..]);
        Ok((!address.is_empty()).then(|| address.to_string()))
    }

    /// Overwrites the store. Addresses of the wrong length are rejected
    /// without touching the file.
    pub fn save(&self, address: &str) -> Result<()> {
        if address.len() != ADDRESS_LEN {
            return Err(CtlError::InvalidAddress {
                address: address.to_string(),
            });
        }

        fs::write(&self.path, address)?;
        tracing::debug!("Stored last device {} in {}", address, self.path.display());
        Ok(())
    }
}
