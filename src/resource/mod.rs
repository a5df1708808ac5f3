//! Resource catalog and the typed operation union.
//!
//! An input item names a `resource` and an `operation`; the remaining fields
//! are that operation's parameters. Deserializing an item into [`Operation`]
//! picks the variant, and each variant knows how to build its upstream
//! request and shape the response.

pub mod alarm;
pub mod asset;
pub mod customer;
pub mod dashboard;
pub mod device;
pub mod entity_group;
pub mod params;
pub mod relation;
pub mod telemetry;

use crate::client::RequestSpec;
use crate::edition::{Edition, is_operation_allowed};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use alarm::AlarmOp;
pub use asset::AssetOp;
pub use customer::CustomerOp;
pub use dashboard::DashboardOp;
pub use device::DeviceOp;
pub use entity_group::EntityGroupOp;
pub use params::{PageQuery, SortOrder};
pub use relation::RelationOp;
pub use telemetry::{AttributeScope, TelemetryOp};

/// Upstream resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Alarm,
    Asset,
    Customer,
    Dashboard,
    Device,
    EntityGroup,
    Relation,
    Telemetry,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Self::Alarm,
        Self::Asset,
        Self::Customer,
        Self::Dashboard,
        Self::Device,
        Self::EntityGroup,
        Self::Relation,
        Self::Telemetry,
    ];

    /// Identifier used in input items.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Asset => "asset",
            Self::Customer => "customer",
            Self::Dashboard => "dashboard",
            Self::Device => "device",
            Self::EntityGroup => "entityGroup",
            Self::Relation => "relation",
            Self::Telemetry => "telemetry",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }

    /// Operation names accepted for this resource.
    #[must_use]
    pub fn operations(&self) -> &'static [&'static str] {
        match self {
            Self::Alarm => alarm::OPERATIONS,
            Self::Asset => asset::OPERATIONS,
            Self::Customer => customer::OPERATIONS,
            Self::Dashboard => dashboard::OPERATIONS,
            Self::Device => device::OPERATIONS,
            Self::EntityGroup => entity_group::OPERATIONS,
            Self::Relation => relation::OPERATIONS,
            Self::Telemetry => telemetry::OPERATIONS,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One fully-parameterized upstream operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "resource", rename_all = "camelCase")]
pub enum Operation {
    Alarm(AlarmOp),
    Asset(AssetOp),
    Customer(CustomerOp),
    Dashboard(DashboardOp),
    Device(DeviceOp),
    EntityGroup(EntityGroupOp),
    Relation(RelationOp),
    Telemetry(TelemetryOp),
}

impl Operation {
    /// Parse an input item, reporting unknown resources or operations and
    /// ill-typed parameters as configuration errors.
    pub fn from_item(item: &Value) -> Result<Self> {
        Self::deserialize(item).map_err(|e| Error::Config(format!("Invalid operation input: {e}")))
    }

    #[must_use]
    pub fn resource(&self) -> Resource {
        match self {
            Self::Alarm(_) => Resource::Alarm,
            Self::Asset(_) => Resource::Asset,
            Self::Customer(_) => Resource::Customer,
            Self::Dashboard(_) => Resource::Dashboard,
            Self::Device(_) => Resource::Device,
            Self::EntityGroup(_) => Resource::EntityGroup,
            Self::Relation(_) => Resource::Relation,
            Self::Telemetry(_) => Resource::Telemetry,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alarm(op) => op.name(),
            Self::Asset(op) => op.name(),
            Self::Customer(op) => op.name(),
            Self::Dashboard(op) => op.name(),
            Self::Device(op) => op.name(),
            Self::EntityGroup(op) => op.name(),
            Self::Relation(op) => op.name(),
            Self::Telemetry(op) => op.name(),
        }
    }

    /// Edition gate: fails with [`Error::Edition`] for a professional-only
    /// operation on a community server.
    pub fn check_edition(&self, edition: Edition) -> Result<()> {
        if is_operation_allowed(self.resource(), self.name(), edition) {
            return Ok(());
        }
        Err(Error::Edition {
            resource: self.resource().id(),
            operation: self.name(),
        })
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        match self {
            Self::Alarm(op) => op.to_request(),
            Self::Asset(op) => op.to_request(),
            Self::Customer(op) => op.to_request(),
            Self::Dashboard(op) => op.to_request(),
            Self::Device(op) => op.to_request(),
            Self::EntityGroup(op) => op.to_request(),
            Self::Relation(op) => op.to_request(),
            Self::Telemetry(op) => op.to_request(),
        }
    }

    /// Turn the decoded upstream body into the item's result.
    #[must_use]
    pub fn shape_response(&self, body: Value) -> Value {
        match self {
            Self::Asset(op) => op.shape_response(body),
            Self::Customer(op) => op.shape_response(body),
            Self::Dashboard(op) => op.shape_response(body),
            Self::Device(op) => op.shape_response(body),
            Self::Telemetry(op) => op.shape_response(body),
            Self::Alarm(_) | Self::EntityGroup(_) | Self::Relation(_) => body,
        }
    }
}
