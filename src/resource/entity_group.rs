//! Entity group lookups. Every operation here requires a Professional Edition server.

use super::params::require;
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupRef {
    pub entity_group_id: String,
}

/// `groupType` is the member entity type, e.g. DEVICE, ASSET or CUSTOMER.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupsByType {
    pub group_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnedGroups {
    pub owner_type: String,
    pub owner_id: String,
    pub group_type: String,
    pub group_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityGroups {
    pub group_type: String,
    pub entity_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum EntityGroupOp {
    GetEntityGroupById(GroupRef),
    GetEntityGroupsByType(GroupsByType),
    GetEntityGroupByOwnerAndNameAndType(OwnedGroups),
    GetEntityGroupsByOwnerAndType(OwnedGroups),
    GetEntityGroupsForEntity(EntityGroups),
}

pub const OPERATIONS: &[&str] = &[
    "getEntityGroupById",
    "getEntityGroupsByType",
    "getEntityGroupByOwnerAndNameAndType",
    "getEntityGroupsByOwnerAndType",
    "getEntityGroupsForEntity",
];

impl EntityGroupOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetEntityGroupById(_) => "getEntityGroupById",
            Self::GetEntityGroupsByType(_) => "getEntityGroupsByType",
            Self::GetEntityGroupByOwnerAndNameAndType(_) => "getEntityGroupByOwnerAndNameAndType",
            Self::GetEntityGroupsByOwnerAndType(_) => "getEntityGroupsByOwnerAndType",
            Self::GetEntityGroupsForEntity(_) => "getEntityGroupsForEntity",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetEntityGroupById(p) => RequestSpec::get("/api/entityGroup/{entityGroupId}")
                .path_param("entityGroupId", require("entityGroupId", &p.entity_group_id)?),
            Self::GetEntityGroupsByType(p) => RequestSpec::get("/api/entityGroups/{groupType}")
                .path_param("groupType", require("groupType", &p.group_type)?),
            Self::GetEntityGroupByOwnerAndNameAndType(p) => {
                let name = urlencoding::encode(require("groupName", &p.group_name)?);
                RequestSpec::get("/api/entityGroup/{ownerType}/{ownerId}/{groupType}/{groupName}")
                    .path_param("ownerType", require("ownerType", &p.owner_type)?)
                    .path_param("ownerId", require("ownerId", &p.owner_id)?)
                    .path_param("groupType", require("groupType", &p.group_type)?)
                    .path_param("groupName", &name)
            }
            Self::GetEntityGroupsByOwnerAndType(p) => {
                RequestSpec::get("/api/entityGroups/{ownerType}/{ownerId}/{groupType}")
                    .path_param("ownerType", require("ownerType", &p.owner_type)?)
                    .path_param("ownerId", require("ownerId", &p.owner_id)?)
                    .path_param("groupType", require("groupType", &p.group_type)?)
            }
            Self::GetEntityGroupsForEntity(p) => {
                RequestSpec::get("/api/entityGroups/{groupType}/{entityId}")
                    .path_param("groupType", require("groupType", &p.group_type)?)
                    .path_param("entityId", require("entityId", &p.entity_id)?)
            }
        };
        Ok(spec)
    }
}
