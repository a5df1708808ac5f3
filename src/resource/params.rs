//! Parameter types and validation shared by several resources.

use crate::client::QueryValue;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Sort direction for paged listings and timeseries reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Page-link parameters accepted by every paged listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page_size: u32,
    pub page: u32,
    pub text_search: String,
    pub sort_property: String,
    pub sort_order: SortOrder,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_size: 10,
            page: 0,
            text_search: String::new(),
            sort_property: String::new(),
            sort_order: SortOrder::Desc,
        }
    }
}

impl PageQuery {
    /// Query pairs in upstream order. Empty text fields are dropped at dispatch.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, QueryValue)> {
        vec![
            ("pageSize".into(), self.page_size.into()),
            ("page".into(), self.page.into()),
            ("textSearch".into(), self.text_search.clone().into()),
            ("sortProperty".into(), self.sort_property.clone().into()),
            ("sortOrder".into(), self.sort_order.as_str().into()),
        ]
    }
}

/// Fail with a configuration error when a required parameter is blank.
pub fn require<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!(
            "Required parameter \"{name}\" is missing or empty."
        )));
    }
    Ok(value)
}

/// Accept a free-form JSON input given either inline or as a JSON string.
///
/// The result must be an object or an array.
pub fn parse_json_input(name: &str, raw: Option<&Value>) -> Result<Value> {
    let parsed = match raw {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .map_err(|e| Error::Config(format!("{name} must be valid JSON. {e}")))?,
        Some(value) => value.clone(),
        None => Value::Null,
    };

    match parsed {
        Value::Object(_) | Value::Array(_) => Ok(parsed),
        _ => Err(Error::Config(format!(
            "{name} must be a JSON object or JSON string."
        ))),
    }
}

/// `{name, type, label?, customerId?}` body shared by device and asset creation.
#[must_use]
pub fn entity_body(name: &str, entity_type: &str, label: &str, customer_id: &str) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("name".into(), name.into());
    body.insert("type".into(), entity_type.into());
    if !label.is_empty() {
        body.insert("label".into(), label.into());
    }
    if !customer_id.is_empty() {
        body.insert("customerId".into(), serde_json::json!({ "id": customer_id }));
    }
    Value::Object(body)
}

/// Parameters for creating a device or asset: either fields or a raw JSON body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEntityParams {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub label: String,
    pub customer_id: String,
    /// Full entity body. When set, the individual fields are ignored.
    #[serde(alias = "assetJson")]
    pub json: Option<Value>,
}

impl NewEntityParams {
    pub fn to_body(&self, json_name: &str) -> Result<Value> {
        if self.json.is_some() {
            return parse_json_input(json_name, self.json.as_ref());
        }
        let name = require("name", &self.name)?;
        Ok(entity_body(
            name,
            &self.entity_type,
            &self.label,
            &self.customer_id,
        ))
    }
}

/// Paged listing optionally filtered by entity type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypedPageParams {
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// Paged listing of a customer's entities.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerPageParams {
    pub customer_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// Paged listing of an entity group's members.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupPageParams {
    pub entity_group_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
}
