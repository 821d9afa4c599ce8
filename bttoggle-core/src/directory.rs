/*!
 * Device Directory
 * Snapshot of the devices the control tool knows about
 */

use std::collections::btree_map::{BTreeMap, Values};
use std::collections::HashMap;

use crate::error::{CtlError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub name: String,
    pub address: String,
}

impl Device {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Devices from one `devices` listing, keyed by address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDirectory {
    devices: BTreeMap<String, Device>,
}

impl DeviceDirectory {
    /// Parses `devices` output, one `Device <address> <name...>` per line.
    ///
    /// Any non-blank line with fewer than three space separated fields fails
    /// the whole parse.
    pub fn parse(output: &str) -> Result<Self> {
        let mut devices = BTreeMap::new();

        for line in output.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let pieces: Vec<&str> = line.split(' ').collect();
            if pieces.len() < 3 {
                return Err(CtlError::MalformedOutput {
                    line: line.to_string(),
                });
            }

            let address = pieces[1].to_string();
            let name = pieces[2..].join(" ");
            devices.insert(address.clone(), Device { name, address });
        }

        Ok(Self { devices })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&Device> {
        self.devices.get(address)
    }

    pub fn iter(&self) -> Values<'_, String, Device> {
        self.devices.values()
    }

    /// Name to address view. Devices sharing a name collapse to one entry.
    pub fn by_name(&self) -> HashMap<String, String> {
        self.iter()
            .map(|device| (device.name.clone(), device.address.clone()))
            .collect()
    }
}

impl FromIterator<Device> for DeviceDirectory {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        Self {
            devices: iter
                .into_iter()
                .map(|device| (device.address.clone(), device))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DeviceDirectory {
    type Item = &'a Device;
    type IntoIter = Values<'a, String, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
