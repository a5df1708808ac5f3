//! Telemetry and attribute operations.
//!
//! Every route lives under `/api/plugins/telemetry`. Most operations address
//! an arbitrary entity by type and id; the `*Device*` variants are shortcuts
//! fixed to `DEVICE`. Writes and deletes answer with an empty body upstream,
//! so their results are replaced by a fixed status message.

use super::params::{SortOrder, parse_json_input, require};
use crate::client::RequestSpec;
use crate::error::Result;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

const TELEMETRY_BASE: &str = "/api/plugins/telemetry";

/// Attribute storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeScope {
    ClientScope,
    #[default]
    ServerScope,
    SharedScope,
}

impl AttributeScope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientScope => "CLIENT_SCOPE",
            Self::ServerScope => "SERVER_SCOPE",
            Self::SharedScope => "SHARED_SCOPE",
        }
    }
}

/// Entity addressed by a telemetry call. `entityType` defaults to `DEVICE`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityTarget {
    pub entity_type: String,
    pub entity_id: String,
}

impl Default for EntityTarget {
    fn default() -> Self {
        Self {
            entity_type: "DEVICE".into(),
            entity_id: String::new(),
        }
    }
}

impl EntityTarget {
    fn path(&self, suffix: &str) -> Result<String> {
        let entity_type = if self.entity_type.trim().is_empty() {
            "DEVICE"
        } else {
            self.entity_type.as_str()
        };
        let entity_id = require("entityId", &self.entity_id)?;
        Ok(format!("{TELEMETRY_BASE}/{entity_type}/{entity_id}/{suffix}"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeseriesQuery {
    #[serde(flatten)]
    pub target: EntityTarget,
    /// Comma-separated key list.
    pub keys: String,
    pub start_ts: i64,
    /// Missing or zero means "now".
    pub end_ts: Option<i64>,
    pub interval: i64,
    pub agg: String,
    pub interval_type: String,
    pub time_zone: String,
    pub order_by: SortOrder,
    pub limit: u32,
    pub use_strict_data_types: bool,
}

impl Default for TimeseriesQuery {
    fn default() -> Self {
        Self {
            target: EntityTarget::default(),
            keys: String::new(),
            start_ts: 0,
            end_ts: None,
            interval: 0,
            agg: "NONE".into(),
            interval_type: "MILLISECONDS".into(),
            time_zone: String::new(),
            order_by: SortOrder::Desc,
            limit: 50,
            use_strict_data_types: false,
        }
    }
}

impl TimeseriesQuery {
    fn to_request(&self, now_ms: i64) -> Result<RequestSpec> {
        let end_ts = match self.end_ts {
            None | Some(0) => now_ms,
            Some(ts) => ts,
        };
        Ok(RequestSpec::get(self.target.path("values/timeseries")?)
            .query("keys", require("keys", &self.keys)?)
            .query("startTs", self.start_ts)
            .query("endTs", end_ts)
            .query("interval", self.interval)
            .query("orderBy", self.order_by.as_str())
            .query("limit", self.limit)
            .query("useStrictDataTypes", self.use_strict_data_types)
            .query("agg", &self.agg)
            .query("intervalType", &self.interval_type)
            .query("timeZone", &self.time_zone))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatestQuery {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub keys: String,
    pub use_strict_data_types: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeQuery {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub keys: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopedTarget {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub scope: AttributeScope,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveAttributes {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub scope: AttributeScope,
    pub attributes_json: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveDeviceAttributes {
    pub device_id: String,
    pub scope: AttributeScope,
    pub attributes_json: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveTelemetry {
    #[serde(flatten)]
    pub target: EntityTarget,
    /// Retention in seconds, only used by `saveEntityTelemetryWithTTL`.
    pub ttl: i64,
    pub telemetry_json: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteAttributes {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub scope: AttributeScope,
    pub attribute_keys: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteDeviceAttributes {
    pub device_id: String,
    pub scope: AttributeScope,
    pub attribute_keys: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteTimeseries {
    #[serde(flatten)]
    pub target: EntityTarget,
    pub timeseries_keys: String,
    pub delete_all_data_for_keys: bool,
    pub delete_latest: bool,
    pub rewrite_latest_if_deleted: bool,
    pub delete_start_ts: Option<i64>,
    pub delete_end_ts: Option<i64>,
}

impl Default for DeleteTimeseries {
    fn default() -> Self {
        Self {
            target: EntityTarget::default(),
            timeseries_keys: String::new(),
            delete_all_data_for_keys: false,
            delete_latest: true,
            rewrite_latest_if_deleted: false,
            delete_start_ts: None,
            delete_end_ts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum TelemetryOp {
    GetTimeseries(TimeseriesQuery),
    GetTimeseriesKeys(EntityTarget),
    GetLatestTimeseries(LatestQuery),
    GetAttributes(AttributeQuery),
    GetAttributeKeys(EntityTarget),
    GetAttributeKeysByScope(ScopedTarget),
    SaveEntityAttributes(SaveAttributes),
    SaveDeviceAttributes(SaveDeviceAttributes),
    SaveEntityTelemetry(SaveTelemetry),
    #[serde(rename = "saveEntityTelemetryWithTTL")]
    SaveEntityTelemetryWithTtl(SaveTelemetry),
    DeleteEntityAttributes(DeleteAttributes),
    DeleteDeviceAttributes(DeleteDeviceAttributes),
    DeleteEntityTimeseries(DeleteTimeseries),
}

pub const OPERATIONS: &[&str] = &[
    "getTimeseries",
    "getTimeseriesKeys",
    "getLatestTimeseries",
    "getAttributes",
    "getAttributeKeys",
    "getAttributeKeysByScope",
    "saveEntityAttributes",
    "saveDeviceAttributes",
    "saveEntityTelemetry",
    "saveEntityTelemetryWithTTL",
    "deleteEntityAttributes",
    "deleteDeviceAttributes",
    "deleteEntityTimeseries",
];

fn device_path(device_id: &str, scope: AttributeScope) -> Result<String> {
    let device_id = require("deviceId", device_id)?;
    Ok(format!("{TELEMETRY_BASE}/DEVICE/{device_id}/{}", scope.as_str()))
}

impl TelemetryOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetTimeseries(_) => "getTimeseries",
            Self::GetTimeseriesKeys(_) => "getTimeseriesKeys",
            Self::GetLatestTimeseries(_) => "getLatestTimeseries",
            Self::GetAttributes(_) => "getAttributes",
            Self::GetAttributeKeys(_) => "getAttributeKeys",
            Self::GetAttributeKeysByScope(_) => "getAttributeKeysByScope",
            Self::SaveEntityAttributes(_) => "saveEntityAttributes",
            Self::SaveDeviceAttributes(_) => "saveDeviceAttributes",
            Self::SaveEntityTelemetry(_) => "saveEntityTelemetry",
            Self::SaveEntityTelemetryWithTtl(_) => "saveEntityTelemetryWithTTL",
            Self::DeleteEntityAttributes(_) => "deleteEntityAttributes",
            Self::DeleteDeviceAttributes(_) => "deleteDeviceAttributes",
            Self::DeleteEntityTimeseries(_) => "deleteEntityTimeseries",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetTimeseries(p) => p.to_request(Utc::now().timestamp_millis())?,
            Self::GetTimeseriesKeys(p) => RequestSpec::get(p.path("keys/timeseries")?),
            Self::GetLatestTimeseries(p) => RequestSpec::get(p.target.path("values/timeseries")?)
                .query("keys", require("keys", &p.keys)?)
                .query("useStrictDataTypes", p.use_strict_data_types),
            Self::GetAttributes(p) => RequestSpec::get(p.target.path("values/attributes")?)
                .query("keys", require("keys", &p.keys)?),
            Self::GetAttributeKeys(p) => RequestSpec::get(p.path("keys/attributes")?),
            Self::GetAttributeKeysByScope(p) => RequestSpec::get(
                p.target
                    .path(&format!("keys/attributes/{}", p.scope.as_str()))?,
            ),
            Self::SaveEntityAttributes(p) => RequestSpec::post(
                p.target.path(&format!("attributes/{}", p.scope.as_str()))?,
            )
            .body(parse_json_input("attributesJson", p.attributes_json.as_ref())?),
            Self::SaveDeviceAttributes(p) => RequestSpec::post(device_path(&p.device_id, p.scope)?)
                .body(parse_json_input("attributesJson", p.attributes_json.as_ref())?),
            Self::SaveEntityTelemetry(p) => RequestSpec::post(p.target.path("timeseries/ANY")?)
                .body(parse_json_input("telemetryJson", p.telemetry_json.as_ref())?),
            Self::SaveEntityTelemetryWithTtl(p) => {
                RequestSpec::post(p.target.path(&format!("timeseries/ANY/{}", p.ttl))?)
                    .body(parse_json_input("telemetryJson", p.telemetry_json.as_ref())?)
            }
            Self::DeleteEntityAttributes(p) => RequestSpec::delete(p.target.path(p.scope.as_str())?)
                .query("keys", require("attributeKeys", &p.attribute_keys)?),
            Self::DeleteDeviceAttributes(p) => {
                RequestSpec::delete(device_path(&p.device_id, p.scope)?)
                    .query("keys", require("attributeKeys", &p.attribute_keys)?)
            }
            Self::DeleteEntityTimeseries(p) => {
                let spec = RequestSpec::delete(p.target.path("timeseries/delete")?)
                    .query("keys", require("timeseriesKeys", &p.timeseries_keys)?)
                    .query("deleteAllDataForKeys", p.delete_all_data_for_keys)
                    .query("deleteLatest", p.delete_latest)
                    .query("rewriteLatestIfDeleted", p.rewrite_latest_if_deleted);
                if p.delete_all_data_for_keys {
                    spec
                } else {
                    spec.query_opt("startTs", p.delete_start_ts)
                        .query_opt("endTs", p.delete_end_ts)
                }
            }
        };
        Ok(spec)
    }

    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        let status = match self {
            Self::GetTimeseriesKeys(_) => return json!({ "timeseriesKeys": body }),
            Self::GetAttributeKeys(_) | Self::GetAttributeKeysByScope(_) => {
                return json!({ "attributeKeys": body });
            }
            Self::SaveEntityAttributes(_) => "Entity attributes saved successfully",
            Self::SaveDeviceAttributes(_) => "Device attributes saved successfully",
            Self::SaveEntityTelemetry(_) => "Telemetry submitted successfully",
            Self::SaveEntityTelemetryWithTtl(_) => "Telemetry with TTL submitted successfully",
            Self::DeleteEntityAttributes(_) => "Entity attributes deleted successfully",
            Self::DeleteDeviceAttributes(_) => "Device attributes deleted successfully",
            Self::DeleteEntityTimeseries(_) => "Entity timeseries deleted successfully",
            _ => return body,
        };
        json!({ "status": status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::error::Error;

    fn op(value: Value) -> TelemetryOp {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_timeseries_defaults() {
        let query: TimeseriesQuery = serde_json::from_value(json!({
            "entityId": "d-1",
            "keys": "temperature,humidity"
        }))
        .unwrap();
        let spec = query.to_request(1_700_000_000_000).unwrap();

        assert_eq!(spec.path, "/api/plugins/telemetry/DEVICE/d-1/values/timeseries");
        assert_eq!(
            spec.cleaned_query(),
            vec![
                ("keys", "temperature,humidity".to_string()),
                ("startTs", "0".to_string()),
                ("endTs", "1700000000000".to_string()),
                ("interval", "0".to_string()),
                ("orderBy", "DESC".to_string()),
                ("limit", "50".to_string()),
                ("useStrictDataTypes", "false".to_string()),
                ("agg", "NONE".to_string()),
                ("intervalType", "MILLISECONDS".to_string()),
            ]
        );
    }

    #[test]
    fn test_timeseries_explicit_window() {
        let query: TimeseriesQuery = serde_json::from_value(json!({
            "entityType": "ASSET",
            "entityId": "a-1",
            "keys": "power",
            "startTs": 1000,
            "endTs": 2000,
            "agg": "AVG",
            "interval": 60000,
            "timeZone": "Europe/Kyiv"
        }))
        .unwrap();
        let spec = query.to_request(9_999).unwrap();
        let pairs = spec.cleaned_query();

        assert_eq!(spec.path, "/api/plugins/telemetry/ASSET/a-1/values/timeseries");
        assert!(pairs.contains(&("endTs", "2000".to_string())));
        assert!(pairs.contains(&("agg", "AVG".to_string())));
        assert!(pairs.contains(&("timeZone", "Europe/Kyiv".to_string())));
    }

    #[test]
    fn test_zero_end_ts_means_now() {
        let query: TimeseriesQuery =
            serde_json::from_value(json!({"entityId": "d-1", "keys": "t", "endTs": 0})).unwrap();
        let spec = query.to_request(42).unwrap();
        assert!(spec.cleaned_query().contains(&("endTs", "42".to_string())));
    }

    #[test]
    fn test_timeseries_requires_keys() {
        let err = op(json!({"operation": "getTimeseries", "entityId": "d-1"}))
            .to_request()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("\"keys\""));
    }

    #[test]
    fn test_key_listings_are_wrapped() {
        let keys = op(json!({"operation": "getTimeseriesKeys", "entityId": "d-1"}));
        assert_eq!(
            keys.to_request().unwrap().path,
            "/api/plugins/telemetry/DEVICE/d-1/keys/timeseries"
        );
        assert_eq!(
            keys.shape_response(json!(["temperature"])),
            json!({"timeseriesKeys": ["temperature"]})
        );

        let scoped = op(json!({
            "operation": "getAttributeKeysByScope",
            "entityId": "d-1",
            "scope": "SHARED_SCOPE"
        }));
        assert_eq!(
            scoped.to_request().unwrap().path,
            "/api/plugins/telemetry/DEVICE/d-1/keys/attributes/SHARED_SCOPE"
        );
        assert_eq!(
            scoped.shape_response(json!(["fw"])),
            json!({"attributeKeys": ["fw"]})
        );
    }

    #[test]
    fn test_save_entity_attributes() {
        let op = op(json!({
            "operation": "saveEntityAttributes",
            "entityId": "d-1",
            "attributesJson": "{\"firmware\":\"1.2.0\"}"
        }));
        let spec = op.to_request().unwrap();

        assert_eq!(spec.method, Method::Post);
        assert_eq!(
            spec.path,
            "/api/plugins/telemetry/DEVICE/d-1/attributes/SERVER_SCOPE"
        );
        assert_eq!(spec.body_to_send(), Some(&json!({"firmware": "1.2.0"})));
        assert_eq!(
            op.shape_response(Value::Null),
            json!({"status": "Entity attributes saved successfully"})
        );
    }

    #[test]
    fn test_save_requires_json_body() {
        let err = op(json!({"operation": "saveEntityTelemetry", "entityId": "d-1"}))
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("telemetryJson"));
    }

    #[test]
    fn test_save_device_attributes_path() {
        let spec = op(json!({
            "operation": "saveDeviceAttributes",
            "deviceId": "d-7",
            "scope": "SHARED_SCOPE",
            "attributesJson": {"target": 21}
        }))
        .to_request()
        .unwrap();
        assert_eq!(spec.path, "/api/plugins/telemetry/DEVICE/d-7/SHARED_SCOPE");
    }

    #[test]
    fn test_telemetry_with_ttl() {
        let op = op(json!({
            "operation": "saveEntityTelemetryWithTTL",
            "entityId": "d-1",
            "ttl": 86400,
            "telemetryJson": [{"ts": 1, "values": {"t": 20}}]
        }));
        assert_eq!(op.name(), "saveEntityTelemetryWithTTL");
        assert_eq!(
            op.to_request().unwrap().path,
            "/api/plugins/telemetry/DEVICE/d-1/timeseries/ANY/86400"
        );
        assert_eq!(
            op.shape_response(Value::Null),
            json!({"status": "Telemetry with TTL submitted successfully"})
        );
    }

    #[test]
    fn test_delete_attributes() {
        let spec = op(json!({
            "operation": "deleteEntityAttributes",
            "entityId": "d-1",
            "scope": "CLIENT_SCOPE",
            "attributeKeys": "a,b"
        }))
        .to_request()
        .unwrap();
        assert_eq!(spec.method, Method::Delete);
        assert_eq!(spec.path, "/api/plugins/telemetry/DEVICE/d-1/CLIENT_SCOPE");
        assert_eq!(spec.cleaned_query(), vec![("keys", "a,b".to_string())]);

        let err = op(json!({"operation": "deleteDeviceAttributes", "deviceId": "d-1"}))
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("\"attributeKeys\""));
    }

    #[test]
    fn test_delete_timeseries_window() {
        let spec = op(json!({
            "operation": "deleteEntityTimeseries",
            "entityId": "d-1",
            "timeseriesKeys": "t",
            "deleteStartTs": 10,
            "deleteEndTs": 20
        }))
        .to_request()
        .unwrap();
        assert_eq!(
            spec.cleaned_query(),
            vec![
                ("keys", "t".to_string()),
                ("deleteAllDataForKeys", "false".to_string()),
                ("deleteLatest", "true".to_string()),
                ("rewriteLatestIfDeleted", "false".to_string()),
                ("startTs", "10".to_string()),
                ("endTs", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_delete_all_ignores_window() {
        let spec = op(json!({
            "operation": "deleteEntityTimeseries",
            "entityId": "d-1",
            "timeseriesKeys": "t",
            "deleteAllDataForKeys": true,
            "deleteStartTs": 10
        }))
        .to_request()
        .unwrap();
        assert!(!spec.cleaned_query().iter().any(|(k, _)| *k == "startTs"));
    }
}
