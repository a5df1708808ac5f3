//! Device operations.

use super::params::{
    CustomerPageParams, GroupPageParams, NewEntityParams, TypedPageParams, require,
};
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceRef {
    pub device_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceByName {
    pub device_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub label: String,
    pub customer_id: String,
    #[serde(alias = "deviceJson")]
    pub json: Option<Value>,
    /// Pre-provisioned access token for the device credentials.
    pub access_token: String,
}

impl NewDevice {
    fn to_body(&self) -> Result<Value> {
        NewEntityParams {
            name: self.name.clone(),
            entity_type: self.entity_type.clone(),
            label: self.label.clone(),
            customer_id: self.customer_id.clone(),
            json: self.json.clone(),
        }
        .to_body("deviceJson")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum DeviceOp {
    GetDeviceById(DeviceRef),
    CreateDevice(NewDevice),
    DeleteDevice(DeviceRef),
    GetTenantDevice(DeviceByName),
    GetTenantDevices(TypedPageParams),
    GetCustomerDevices(CustomerPageParams),
    GetUserDevices(TypedPageParams),
    GetDevicesByEntityGroupId(GroupPageParams),
}

pub const OPERATIONS: &[&str] = &[
    "getDeviceById",
    "createDevice",
    "deleteDevice",
    "getTenantDevice",
    "getTenantDevices",
    "getCustomerDevices",
    "getUserDevices",
    "getDevicesByEntityGroupId",
];

impl DeviceOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetDeviceById(_) => "getDeviceById",
            Self::CreateDevice(_) => "createDevice",
            Self::DeleteDevice(_) => "deleteDevice",
            Self::GetTenantDevice(_) => "getTenantDevice",
            Self::GetTenantDevices(_) => "getTenantDevices",
            Self::GetCustomerDevices(_) => "getCustomerDevices",
            Self::GetUserDevices(_) => "getUserDevices",
            Self::GetDevicesByEntityGroupId(_) => "getDevicesByEntityGroupId",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetDeviceById(p) => RequestSpec::get("/api/device/{deviceId}")
                .path_param("deviceId", require("deviceId", &p.device_id)?),
            Self::CreateDevice(p) => RequestSpec::post("/api/device")
                .query("accessToken", &p.access_token)
                .body(p.to_body()?),
            Self::DeleteDevice(p) => RequestSpec::delete("/api/device/{deviceId}")
                .path_param("deviceId", require("deviceId", &p.device_id)?),
            Self::GetTenantDevice(p) => RequestSpec::get("/api/tenant/devices")
                .query("deviceName", require("deviceName", &p.device_name)?),
            Self::GetTenantDevices(p) => RequestSpec::get("/api/tenant/devices")
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetCustomerDevices(p) => RequestSpec::get("/api/customer/{customerId}/devices")
                .path_param("customerId", require("customerId", &p.customer_id)?)
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetUserDevices(p) => RequestSpec::get("/api/user/devices")
                .extend_query(p.page.to_query())
                .query("type", &p.entity_type),
            Self::GetDevicesByEntityGroupId(p) => {
                RequestSpec::get("/api/entityGroup/{entityGroupId}/devices")
                    .path_param("entityGroupId", require("entityGroupId", &p.entity_group_id)?)
                    .extend_query(p.page.to_query())
            }
        };
        Ok(spec)
    }

    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        match self {
            Self::DeleteDevice(_) => json!({ "deleted": true }),
            _ => body,
        }
    }
}
