//! Update package metadata
//!
//! The package document lists its objects once per installation set, so a
//! device with A/B partitions picks the list matching the inactive set.

use crate::error::MetadataError;
use crate::object::UpdateObject;
use serde::{Deserialize, Serialize};

/// Update package metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdatePackage {
    /// Product identifier
    #[serde(default)]
    pub product: String,

    /// Package version
    pub version: String,

    /// Hardware this package may be installed on
    #[serde(default)]
    pub supported_hardware: SupportedHardware,

    /// Objects, one list per installation set
    pub objects: Vec<Vec<UpdateObject>>,
}

impl UpdatePackage {
    /// Decode package metadata from JSON bytes
    ///
    /// # Errors
    /// Returns error if the document does not match the metadata schema
    pub fn parse(bytes: &[u8]) -> Result<Self, MetadataError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Number of installation sets described
    #[inline]
    #[must_use]
    pub fn installation_sets(&self) -> usize {
        self.objects.len()
    }

    /// Objects for an installation set
    ///
    /// # Errors
    /// Returns error if the package has no list for `set`
    pub fn objects(&self, set: usize) -> Result<&[UpdateObject], MetadataError> {
        self.objects
            .get(set)
            .map(Vec::as_slice)
            .ok_or(MetadataError::MissingInstallationSet {
                set,
                available: self.objects.len(),
            })
    }
}

/// Hardware compatibility declaration
///
/// Either the keyword `"any"` or a list of hardware identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "HardwareRepr", into = "HardwareRepr")]
pub enum SupportedHardware {
    /// Installable everywhere
    #[default]
    Any,
    /// Installable on the listed hardware only
    List(Vec<String>),
}

impl SupportedHardware {
    /// Check whether `hardware` may install the package
    #[must_use]
    pub fn supports(&self, hardware: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(list) => list.iter().any(|h| h == hardware),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HardwareRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<HardwareRepr> for SupportedHardware {
    type Error = String;

    fn try_from(repr: HardwareRepr) -> Result<Self, Self::Error> {
        match repr {
            HardwareRepr::Keyword(k) if k == "any" => Ok(Self::Any),
            HardwareRepr::Keyword(k) => Err(format!("unknown supported-hardware keyword '{k}'")),
            HardwareRepr::List(list) => Ok(Self::List(list)),
        }
    }
}

impl From<SupportedHardware> for HardwareRepr {
    fn from(hw: SupportedHardware) -> Self {
        match hw {
            SupportedHardware::Any => Self::Keyword("any".to_string()),
            SupportedHardware::List(list) => Self::List(list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directive;

    const PACKAGE: &str = r#"{
        "product": "0123456789",
        "version": "1.2",
        "supported-hardware": ["board"],
        "objects": [
            [{"mode": "test", "filename": "testfile", "target": "/dev/device1",
              "sha256sum": "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4",
              "size": 4, "install-if-different": "sha256sum"}],
            [{"mode": "test", "filename": "testfile", "target": "/dev/device2",
              "sha256sum": "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4",
              "size": 4}]
        ]
    }"#;

    #[test]
    fn parse_package_with_two_sets() {
        let package = UpdatePackage::parse(PACKAGE.as_bytes()).unwrap();
        assert_eq!(package.version, "1.2");
        assert_eq!(package.installation_sets(), 2);

        let first = package.objects(0).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(
            first[0].install_if_different,
            Some(Directive::digest("sha256sum"))
        );

        let second = package.objects(1).unwrap();
        assert!(second[0].install_if_different.is_none());
    }

    #[test]
    fn missing_set_is_an_error() {
        let package = UpdatePackage::parse(PACKAGE.as_bytes()).unwrap();
        assert!(matches!(
            package.objects(2),
            Err(MetadataError::MissingInstallationSet {
                set: 2,
                available: 2
            })
        ));
    }

    #[test]
    fn supported_hardware_any_keyword() {
        let hw: SupportedHardware = serde_json::from_str(r#""any""#).unwrap();
        assert_eq!(hw, SupportedHardware::Any);
        assert!(hw.supports("whatever"));
        assert_eq!(serde_json::to_string(&hw).unwrap(), r#""any""#);
    }

    #[test]
    fn supported_hardware_list() {
        let package = UpdatePackage::parse(PACKAGE.as_bytes()).unwrap();
        assert!(package.supported_hardware.supports("board"));
        assert!(!package.supported_hardware.supports("other"));
    }

    #[test]
    fn supported_hardware_rejects_unknown_keyword() {
        assert!(serde_json::from_str::<SupportedHardware>(r#""some""#).is_err());
    }
}
