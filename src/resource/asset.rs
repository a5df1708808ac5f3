//! Asset operations.

use super::params::{
    CustomerPageParams, GroupPageParams, NewEntityParams, TypedPageParams, require,
};
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetRef {
    pub asset_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetByName {
    pub asset_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum AssetOp {
    GetAssetById(AssetRef),
    CreateAsset(NewEntityParams),
    DeleteAsset(AssetRef),
    GetTenantAsset(AssetByName),
    GetTenantAssets(TypedPageParams),
    GetCustomerAssets(CustomerPageParams),
    GetUserAssets(TypedPageParams),
    GetAssetsByEntityGroupId(GroupPageParams),
}

pub const OPERATIONS: &[&str] = &[
    "getAssetById",
    "createAsset",
    "deleteAsset",
    "getTenantAsset",
    "getTenantAssets",
    "getCustomerAssets",
    "getUserAssets",
    "getAssetsByEntityGroupId",
];

impl AssetOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAssetById(_) => "getAssetById",
            Self::CreateAsset(_) => "createAsset",
            Self::DeleteAsset(_) => "deleteAsset",
            Self::GetTenantAsset(_) => "getTenantAsset",
            Self::GetTenantAssets(_) => "getTenantAssets",
            Self::GetCustomerAssets(_) => "getCustomerAssets",
            Self::GetUserAssets(_) => "getUserAssets",
            Self::GetAssetsByEntityGroupId(_) => "getAssetsByEntityGroupId",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetAssetById(p) => RequestSpec::get("/api/asset/{assetId}")
                .path_param("assetId", require("assetId", &p.asset_id)?),
            Self::CreateAsset(p) => RequestSpec::post("/api/asset").body(p.to_body("assetJson")?),
            Self::DeleteAsset(p) => RequestSpec::delete("/api/asset/{assetId}")
                .path_param("assetId", require("assetId", &p.asset_id)?),
            Self::GetTenantAsset(p) => RequestSpec::get("/api/tenant/assets")
                .query("assetName", require("assetName", &p.asset_name)?),
            Self::GetTenantAssets(p) => RequestSpec::get("/api/tenant/assets")
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetCustomerAssets(p) => RequestSpec::get("/api/customer/{customerId}/assets")
                .path_param("customerId", require("customerId", &p.customer_id)?)
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetUserAssets(p) => RequestSpec::get("/api/user/assets")
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetAssetsByEntityGroupId(p) => {
                RequestSpec::get("/api/entityGroup/{entityGroupId}/assets")
                    .path_param("entityGroupId", require("entityGroupId", &p.entity_group_id)?)
                    .extend_query(p.page.to_query())
            }
        };
        Ok(spec)
    }

    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        match self {
            Self::DeleteAsset(_) => json!({ "deleted": true }),
            _ => body,
        }
    }
}
