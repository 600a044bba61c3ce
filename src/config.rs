//! YAML configuration: device inventory and per-device command lists.
//!
//! Two input files drive a run. The inventory names the devices and their
//! credentials; the command-list file maps a device key to the ordered
//! "show" commands to collect. Loading failures are fatal — there is no
//! sensible run without them.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::registry::Vendor;

/// Device inventory, e.g.:
///
/// ```yaml
/// devices:
///   - host: 10.49.233.254
///     username: lab
///     password: lab123
///     vendor: juniper
///     model: MX204
/// ```
#[derive(Debug, Deserialize)]
pub struct Inventory {
    pub devices: Vec<DeviceConfig>,
}

/// One inventory entry.
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    /// Redacted in Debug output; exposed only at authentication time.
    pub password: SecretString,
    pub vendor: String,
    pub model: String,
}

fn default_port() -> u16 {
    22
}

impl DeviceConfig {
    /// Parsed vendor tag. Unknown vendors are a configuration error.
    pub fn vendor(&self) -> Result<Vendor> {
        Ok(self.vendor.parse::<Vendor>()?)
    }

    /// Key used for command-list lookup, result partitioning and artifact
    /// names: vendor and model lowercased, dashes dropped from the model.
    /// `juniper` + `MX-204` and `juniper` + `mx204` both key as
    /// `juniper_mx204`.
    pub fn device_key(&self) -> String {
        format!(
            "{}_{}",
            self.vendor.to_lowercase(),
            self.model.to_lowercase().replace('-', "")
        )
    }
}

impl Inventory {
    /// Load and validate an inventory file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let inventory: Inventory =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if inventory.devices.is_empty() {
            return Err(ConfigError::EmptyInventory {
                path: path.display().to_string(),
            }
            .into());
        }
        Ok(inventory)
    }
}

/// Ordered command lists keyed by device key, e.g.:
///
/// ```yaml
/// juniper_mx204:
///   - show arp no-resolve | no-more
///   - show vrrp summary | no-more
/// ```
///
/// Order is preserved — commands run and publish in list order.
#[derive(Debug, Deserialize)]
pub struct CommandLists(IndexMap<String, Vec<String>>);

impl CommandLists {
    /// Load a command-list file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let lists: CommandLists =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(lists)
    }

    /// The command list for a device key. A missing key is fatal: it means
    /// the run was asked to check a device nobody wrote commands for.
    pub fn commands_for(&self, device_key: &str) -> Result<&[String]> {
        self.0
            .get(device_key)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ConfigError::MissingCommandList {
                    device_key: device_key.to_string(),
                }
                .into()
            })
    }

    /// Device keys present in the file, in file order.
    pub fn device_keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Error;

    const INVENTORY_YAML: &str = "\
devices:
  - host: 10.49.233.254
    username: lab
    password: lab123
    vendor: juniper
    model: MX-204
";

    const COMMANDS_YAML: &str = "\
juniper_mx204:
  - show arp no-resolve | no-more
  - show vrrp summary | no-more
cisco_ncs5501:
  - show inventory
";

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_inventory() {
        let file = write_temp(INVENTORY_YAML);
        let inventory = Inventory::load(file.path()).unwrap();
        assert_eq!(inventory.devices.len(), 1);

        let device = &inventory.devices[0];
        assert_eq!(device.host, "10.49.233.254");
        assert_eq!(device.port, 22);
        assert_eq!(device.vendor().unwrap(), Vendor::Juniper);
        assert_eq!(device.device_key(), "juniper_mx204");
    }

    #[test]
    fn test_password_not_in_debug() {
        let file = write_temp(INVENTORY_YAML);
        let inventory = Inventory::load(file.path()).unwrap();
        let rendered = format!("{:?}", inventory.devices[0]);
        assert!(!rendered.contains("lab123"));
    }

    #[test]
    fn test_empty_inventory_rejected() {
        let file = write_temp("devices: []\n");
        let err = Inventory::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::EmptyInventory { .. })
        ));
    }

    #[test]
    fn test_unknown_vendor() {
        let yaml = INVENTORY_YAML.replace("juniper", "arista");
        let file = write_temp(&yaml);
        let inventory = Inventory::load(file.path()).unwrap();
        assert!(inventory.devices[0].vendor().is_err());
    }

    #[test]
    fn test_command_lists_lookup() {
        let file = write_temp(COMMANDS_YAML);
        let lists = CommandLists::load(file.path()).unwrap();

        let commands = lists.commands_for("juniper_mx204").unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], "show arp no-resolve | no-more");

        let keys: Vec<&str> = lists.device_keys().collect();
        assert_eq!(keys, ["juniper_mx204", "cisco_ncs5501"]);
    }

    #[test]
    fn test_missing_command_list() {
        let file = write_temp(COMMANDS_YAML);
        let lists = CommandLists::load(file.path()).unwrap();
        let err = lists.commands_for("juniper_mx480").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingCommandList { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Inventory::load("/nonexistent/deviceDetails.yaml").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Read { .. })));
    }
}
