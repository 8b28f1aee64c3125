//! Platform management-interface queries.
//!
//! A query names an object class and the attributes wanted from it; the
//! interface answers with the first matching object or `None`. [`SysfsDmi`]
//! serves the DMI classes from `/sys/class/dmi/id`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::source::traits::FileSystem;

/// Object class carrying BIOS identification.
pub const CLASS_BIOS: &str = "BIOS";
/// Object class describing the machine as a product.
pub const CLASS_PRODUCT: &str = "ComputerSystemProduct";

/// An object-class query with the attributes to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementQuery {
    pub class: String,
    pub attributes: Vec<String>,
}

impl ManagementQuery {
    pub fn new(class: impl Into<String>, attributes: &[&str]) -> Self {
        Self {
            class: class.into(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for ManagementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM {}", self.attributes.join(","), self.class)
    }
}

/// One object returned by a management query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementObject {
    attributes: BTreeMap<String, String>,
}

impl ManagementObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum ManagementError {
    #[error("unsupported management class `{0}`")]
    UnsupportedClass(String),
}

/// A platform management interface.
pub trait ManagementInterface: Send + Sync {
    /// Returns the first object matching `query`, or `None` when nothing
    /// matches.
    fn return_first(
        &self,
        query: &ManagementQuery,
    ) -> Result<Option<ManagementObject>, ManagementError>;
}

/// DMI data exported by the kernel under `<sys>/class/dmi/id`.
pub struct SysfsDmi {
    fs: Arc<dyn FileSystem>,
    sys_path: PathBuf,
}

impl SysfsDmi {
    pub fn new(fs: Arc<dyn FileSystem>, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            sys_path: sys_path.into(),
        }
    }

    /// Maps a class attribute to its sysfs file name.
    fn attribute_file(class: &str, attribute: &str) -> Result<Option<&'static str>, ManagementError> {
        let file = match class {
            CLASS_BIOS => match attribute {
                "Manufacturer" => Some("bios_vendor"),
                "SerialNumber" => Some("product_serial"),
                "Version" => Some("bios_version"),
                "ReleaseDate" => Some("bios_date"),
                _ => None,
            },
            CLASS_PRODUCT => match attribute {
                "Name" => Some("product_name"),
                "Vendor" => Some("sys_vendor"),
                "UUID" => Some("product_uuid"),
                _ => None,
            },
            other => return Err(ManagementError::UnsupportedClass(other.to_string())),
        };
        Ok(file)
    }
}

impl ManagementInterface for SysfsDmi {
    fn return_first(
        &self,
        query: &ManagementQuery,
    ) -> Result<Option<ManagementObject>, ManagementError> {
        let dir = self.sys_path.join("class/dmi/id");
        let mut object = ManagementObject::new();
        let mut found = false;

        for attribute in &query.attributes {
            let Some(file) = Self::attribute_file(&query.class, attribute)? else {
                debug!("no DMI attribute {} in class {}", attribute, query.class);
                continue;
            };
            if let Some(value) = self.fs.read_optional(&dir.join(file)) {
                object = object.with(attribute.as_str(), value.trim());
                found = true;
            }
        }

        Ok(found.then_some(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MockFs;

    fn dmi(fs: MockFs) -> SysfsDmi {
        SysfsDmi::new(Arc::new(fs), "/sys")
    }

    #[test]
    fn test_query_display() {
        let query = ManagementQuery::new(CLASS_BIOS, &["Manufacturer", "SerialNumber"]);
        assert_eq!(
            query.to_string(),
            "SELECT Manufacturer,SerialNumber FROM BIOS"
        );
    }

    #[test]
    fn test_sysfs_dmi_reads_attributes() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/dmi/id/bios_vendor", "LENOVO\n");
        fs.add_file("/sys/class/dmi/id/product_serial", "PF12345\n");

        let query = ManagementQuery::new(CLASS_BIOS, &["Manufacturer", "SerialNumber"]);
        let object = dmi(fs).return_first(&query).unwrap().unwrap();

        assert_eq!(object.get("Manufacturer"), Some("LENOVO"));
        assert_eq!(object.get("SerialNumber"), Some("PF12345"));
    }

    #[test]
    fn test_sysfs_dmi_partial_object() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/dmi/id/bios_vendor", "SeaBIOS\n");
        fs.add_unreadable("/sys/class/dmi/id/product_serial");

        let query = ManagementQuery::new(CLASS_BIOS, &["Manufacturer", "SerialNumber"]);
        let object = dmi(fs).return_first(&query).unwrap().unwrap();

        assert_eq!(object.get("Manufacturer"), Some("SeaBIOS"));
        assert_eq!(object.get("SerialNumber"), None);
    }

    #[test]
    fn test_sysfs_dmi_no_match() {
        let query = ManagementQuery::new(CLASS_PRODUCT, &["Name"]);
        assert!(dmi(MockFs::new()).return_first(&query).unwrap().is_none());
    }

    #[test]
    fn test_sysfs_dmi_unknown_class() {
        let query = ManagementQuery::new("Win32_Processor", &["Name"]);
        let err = dmi(MockFs::new()).return_first(&query).unwrap_err();
        assert!(matches!(err, ManagementError::UnsupportedClass(c) if c == "Win32_Processor"));
    }
}
