//! Customer operations.

use super::params::{GroupPageParams, PageQuery, require};
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerRef {
    pub customer_id: String,
}

/// Title of a new customer, or the title to look one up by.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerTitle {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum CustomerOp {
    GetCustomerById(CustomerRef),
    CreateCustomer(CustomerTitle),
    DeleteCustomer(CustomerRef),
    GetCustomers(PageQuery),
    GetTenantCustomer(CustomerTitle),
    GetCustomersByEntityGroupId(GroupPageParams),
    GetUserCustomers(PageQuery),
}

pub const OPERATIONS: &[&str] = &[
    "getCustomerById",
    "createCustomer",
    "deleteCustomer",
    "getCustomers",
    "getTenantCustomer",
    "getCustomersByEntityGroupId",
    "getUserCustomers",
];

impl CustomerOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetCustomerById(_) => "getCustomerById",
            Self::CreateCustomer(_) => "createCustomer",
            Self::DeleteCustomer(_) => "deleteCustomer",
            Self::GetCustomers(_) => "getCustomers",
            Self::GetTenantCustomer(_) => "getTenantCustomer",
            Self::GetCustomersByEntityGroupId(_) => "getCustomersByEntityGroupId",
            Self::GetUserCustomers(_) => "getUserCustomers",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let spec = match self {
            Self::GetCustomerById(p) => RequestSpec::get("/api/customer/{customerId}")
                .path_param("customerId", require("customerId", &p.customer_id)?),
            Self::CreateCustomer(p) => RequestSpec::post("/api/customer")
                .body(json!({ "title": require("title", &p.title)? })),
            Self::DeleteCustomer(p) => RequestSpec::delete("/api/customer/{customerId}")
                .path_param("customerId", require("customerId", &p.customer_id)?),
            Self::GetCustomers(page) => {
                RequestSpec::get("/api/customers").extend_query(page.to_query())
            }
            Self::GetTenantCustomer(p) => RequestSpec::get("/api/tenant/customers")
                .query("customerTitle", require("title", &p.title)?),
            Self::GetCustomersByEntityGroupId(p) => {
                RequestSpec::get("/api/entityGroup/{entityGroupId}/customers")
                    .path_param("entityGroupId", require("entityGroupId", &p.entity_group_id)?)
                    .extend_query(p.page.to_query())
            }
            Self::GetUserCustomers(page) => {
                RequestSpec::get("/api/user/customers").extend_query(page.to_query())
            }
        };
        Ok(spec)
    }

    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        match self {
            Self::DeleteCustomer(_) => json!({ "deleted": true }),
            _ => body,
        }
    }
}
