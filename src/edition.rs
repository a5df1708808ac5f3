//! Feature tier of the connected server and the operations it unlocks.

use crate::resource::Resource;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Server edition. Community is the conservative default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Edition {
    #[default]
    #[serde(rename = "CE")]
    Community,
    #[serde(rename = "PE")]
    Professional,
}

impl Edition {
    /// Parse the `edition` field of the system-info response.
    ///
    /// `PAAS` is the legacy cloud label for the professional tier. Anything
    /// unrecognized falls back to community.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PE" | "PAAS" => Self::Professional,
            _ => Self::Community,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Community => "CE",
            Self::Professional => "PE",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that exist only on professional servers.
pub const ENTERPRISE_ONLY: &[(Resource, &str)] = &[
    (Resource::EntityGroup, "getEntityGroupById"),
    (Resource::EntityGroup, "getEntityGroupsByType"),
    (Resource::EntityGroup, "getEntityGroupByOwnerAndNameAndType"),
    (Resource::EntityGroup, "getEntityGroupsByOwnerAndType"),
    (Resource::EntityGroup, "getEntityGroupsForEntity"),
    (Resource::Customer, "getCustomersByEntityGroupId"),
    (Resource::Customer, "getUserCustomers"),
    (Resource::Device, "getUserDevices"),
    (Resource::Device, "getDevicesByEntityGroupId"),
    (Resource::Asset, "getUserAssets"),
    (Resource::Asset, "getAssetsByEntityGroupId"),
];

static ENTERPRISE_SET: Lazy<HashSet<(Resource, &'static str)>> =
    Lazy::new(|| ENTERPRISE_ONLY.iter().copied().collect());

#[must_use]
pub fn is_enterprise_only(resource: Resource, operation: &str) -> bool {
    ENTERPRISE_SET.contains(&(resource, operation))
}

/// Whether `operation` on `resource` may run against a server of `edition`.
#[must_use]
pub fn is_operation_allowed(resource: Resource, operation: &str, edition: Edition) -> bool {
    edition == Edition::Professional || !is_enterprise_only(resource, operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enterprise_ops_denied_on_community() {
        for (resource, operation) in ENTERPRISE_ONLY {
            assert!(
                !is_operation_allowed(*resource, operation, Edition::Community),
                "{resource}:{operation} should be denied on CE"
            );
            assert!(is_operation_allowed(*resource, operation, Edition::Professional));
        }
    }

    #[test]
    fn test_community_ops_always_allowed() {
        for edition in [Edition::Community, Edition::Professional] {
            assert!(is_operation_allowed(Resource::Device, "getDeviceById", edition));
            assert!(is_operation_allowed(Resource::Telemetry, "getTimeseries", edition));
            assert!(is_operation_allowed(Resource::Customer, "getCustomers", edition));
        }
    }

    #[test]
    fn test_lookup_is_per_resource() {
        // Same name under a different resource is not in the set.
        assert!(!is_enterprise_only(Resource::Asset, "getUserDevices"));
        assert!(is_enterprise_only(Resource::Device, "getUserDevices"));
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Edition::from_label("PE"), Edition::Professional);
        assert_eq!(Edition::from_label("PAAS"), Edition::Professional);
        assert_eq!(Edition::from_label("paas"), Edition::Professional);
        assert_eq!(Edition::from_label("CE"), Edition::Community);
        assert_eq!(Edition::from_label(""), Edition::Community);
        assert_eq!(Edition::from_label("TRENDZ"), Edition::Community);
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Edition::Professional).unwrap(), "\"PE\"");
        let e: Edition = serde_json::from_str("\"CE\"").unwrap();
        assert_eq!(e, Edition::Community);
    }
}
