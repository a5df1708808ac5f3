//! Dashboard operations.

use super::params::{PageQuery, parse_json_input, require};
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardRef {
    pub dashboard_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewDashboard {
    pub title: String,
    /// Full dashboard body (e.g. an exported dashboard). Overrides `title`.
    #[serde(alias = "dashboardJson")]
    pub json: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TenantDashboards {
    #[serde(flatten)]
    pub page: PageQuery,
    pub mobile: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerDashboards {
    pub customer_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
    pub include_customers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDashboards {
    #[serde(flatten)]
    pub page: PageQuery,
    pub mobile: bool,
    /// Filter by an operation the user is allowed to perform.
    pub dashboard_operation: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum DashboardOp {
    CreateDashboard(NewDashboard),
    GetDashboardById(DashboardRef),
    DeleteDashboard(DashboardRef),
    GetDashboards(TenantDashboards),
    GetCustomerDashboards(CustomerDashboards),
    GetUserDashboards(UserDashboards),
}

pub const OPERATIONS: &[&str] = &[
    "createDashboard",
    "getDashboardById",
    "deleteDashboard",
    "getDashboards",
    "getCustomerDashboards",
    "getUserDashboards",
];

impl DashboardOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateDashboard(_) => "createDashboard",
            Self::GetDashboardById(_) => "getDashboardById",
            Self::DeleteDashboard(_) => "deleteDashboard",
            Self::GetDashboards(_) => "getDashboards",
            Self::GetCustomerDashboards(_) => "getCustomerDashboards",
            Self::GetUserDashboards(_) => "getUserDashboards",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::CreateDashboard(p) => {
                let body = match &p.json {
                    Some(raw) => parse_json_input("dashboardJson", Some(raw))?,
                    None => json!({ "title": require("title", &p.title)? }),
                };
                RequestSpec::post("/api/dashboard").body(body)
            }
            Self::GetDashboardById(p) => RequestSpec::get("/api/dashboard/{dashboardId}")
                .path_param("dashboardId", require("dashboardId", &p.dashboard_id)?),
            Self::DeleteDashboard(p) => RequestSpec::delete("/api/dashboard/{dashboardId}")
                .path_param("dashboardId", require("dashboardId", &p.dashboard_id)?),
            Self::GetDashboards(p) => RequestSpec::get("/api/tenant/dashboards")
                .extend_query(p.page.to_query())
                .query("mobile", p.mobile),
            Self::GetCustomerDashboards(p) => {
                RequestSpec::get("/api/customer/{customerId}/dashboards")
                    .path_param("customerId", require("customerId", &p.customer_id)?)
                    .extend_query(p.page.to_query())
                    .query("includeCustomers", p.include_customers)
            }
            Self::GetUserDashboards(p) => RequestSpec::get("/api/user/dashboards")
                .extend_query(p.page.to_query())
                .query("mobile", p.mobile)
                .query("operation", &p.dashboard_operation)
                .query("userId", &p.user_id),
        };
        Ok(spec)
    }

    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        match self {
            Self::DeleteDashboard(_) => json!({ "deleted": true }),
            _ => body,
        }
    }
}
