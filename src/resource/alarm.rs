//! Alarm operations.

use super::params::{PageQuery, require};
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlarmRef {
    pub alarm_id: String,
}

/// Status filters shared by the alarm queries.
///
/// `searchStatus` is one of ANY, ACTIVE, CLEARED, ACK, UNACK; `status`
/// combines both axes (e.g. ACTIVE_UNACK). Blank means no filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlarmFilter {
    pub search_status: String,
    pub status: String,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub fetch_originator: bool,
}

impl AlarmFilter {
    fn apply(&self, spec: RequestSpec) -> RequestSpec {
        spec.query("searchStatus", &self.search_status)
            .query("status", &self.status)
            .query_opt("startTime", self.start_ts)
            .query_opt("endTime", self.end_ts)
            .query("fetchOriginator", self.fetch_originator)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityAlarms {
    pub entity_type: String,
    pub entity_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(flatten)]
    pub filter: AlarmFilter,
}

impl Default for EntityAlarms {
    fn default() -> Self {
        Self {
            entity_type: "DEVICE".into(),
            entity_id: String::new(),
            page: PageQuery::default(),
            filter: AlarmFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllAlarms {
    pub assignee_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(flatten)]
    pub filter: AlarmFilter,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighestSeverity {
    pub entity_type: String,
    pub entity_id: String,
    pub search_status: String,
    pub status: String,
}

impl Default for HighestSeverity {
    fn default() -> Self {
        Self {
            entity_type: "DEVICE".into(),
            entity_id: String::new(),
            search_status: String::new(),
            status: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum AlarmOp {
    GetAlarmById(AlarmRef),
    GetAlarmInfoById(AlarmRef),
    GetAlarms(EntityAlarms),
    GetAllAlarms(AllAlarms),
    GetHighestAlarmSeverity(HighestSeverity),
    GetAlarmTypes(PageQuery),
}

pub const OPERATIONS: &[&str] = &[
    "getAlarmById",
    "getAlarmInfoById",
    "getAlarms",
    "getAllAlarms",
    "getHighestAlarmSeverity",
    "getAlarmTypes",
];

impl AlarmOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAlarmById(_) => "getAlarmById",
            Self::GetAlarmInfoById(_) => "getAlarmInfoById",
            Self::GetAlarms(_) => "getAlarms",
            Self::GetAllAlarms(_) => "getAllAlarms",
            Self::GetHighestAlarmSeverity(_) => "getHighestAlarmSeverity",
            Self::GetAlarmTypes(_) => "getAlarmTypes",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetAlarmById(p) => RequestSpec::get("/api/alarm/{alarmId}")
                .path_param("alarmId", require("alarmId", &p.alarm_id)?),
            Self::GetAlarmInfoById(p) => RequestSpec::get("/api/alarm/info/{alarmId}")
                .path_param("alarmId", require("alarmId", &p.alarm_id)?),
            Self::GetAlarms(p) => {
                let spec = RequestSpec::get("/api/alarm/{entityType}/{entityId}")
                    .path_param("entityType", require("entityType", &p.entity_type)?)
                    .path_param("entityId", require("entityId", &p.entity_id)?)
                    .extend_query(p.page.to_query());
                p.filter.apply(spec)
            }
            Self::GetAllAlarms(p) => {
                let spec = RequestSpec::get("/api/alarms")
                    .extend_query(p.page.to_query())
                    .query("assigneeId", &p.assignee_id);
                p.filter.apply(spec)
            }
            Self::GetHighestAlarmSeverity(p) => {
                let entity_type = if p.entity_type.trim().is_empty() {
                    "DEVICE"
                } else {
                    p.entity_type.as_str()
                };
                RequestSpec::get("/api/alarm/highestSeverity/{entityType}/{entityId}")
                    .path_param("entityType", entity_type)
                    .path_param("entityId", require("entityId", &p.entity_id)?)
                    .query("searchStatus", &p.search_status)
                    .query("status", &p.status)
            }
            Self::GetAlarmTypes(page) => {
                RequestSpec::get("/api/alarm/types").extend_query(page.to_query())
            }
        };
        Ok(spec)
    }
}
