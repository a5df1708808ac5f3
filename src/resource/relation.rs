//! Entity relation lookups. Every query is restricted to the `COMMON` type group.

use super::params::require;
use crate::client::RequestSpec;
use crate::error::Result;
use serde::Deserialize;

const TYPE_GROUP: &str = "COMMON";

/// Both ends of a relation. Which fields are required depends on the operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationParams {
    pub from_id: String,
    pub from_type: String,
    pub relation_type: String,
    pub to_id: String,
    pub to_type: String,
}

impl RelationParams {
    fn from_side(&self, spec: RequestSpec) -> Result<RequestSpec> {
        Ok(spec
            .query("fromId", require("fromId", &self.from_id)?)
            .query("fromType", require("fromType", &self.from_type)?))
    }

    fn to_side(&self, spec: RequestSpec) -> Result<RequestSpec> {
        Ok(spec
            .query("toId", require("toId", &self.to_id)?)
            .query("toType", require("toType", &self.to_type)?))
    }

    fn relation_type(&self, spec: RequestSpec) -> Result<RequestSpec> {
        Ok(spec.query("relationType", require("relationType", &self.relation_type)?))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum RelationOp {
    GetRelation(RelationParams),
    FindByFrom(RelationParams),
    FindByFromWithRelationType(RelationParams),
    FindByTo(RelationParams),
    FindByToWithRelationType(RelationParams),
    FindInfoByFrom(RelationParams),
    FindInfoByTo(RelationParams),
}

pub const OPERATIONS: &[&str] = &[
    "getRelation",
    "findByFrom",
    "findByFromWithRelationType",
    "findByTo",
    "findByToWithRelationType",
    "findInfoByFrom",
    "findInfoByTo",
];

impl RelationOp {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetRelation(_) => "getRelation",
            Self::FindByFrom(_) => "findByFrom",
            Self::FindByFromWithRelationType(_) => "findByFromWithRelationType",
            Self::FindByTo(_) => "findByTo",
            Self::FindByToWithRelationType(_) => "findByToWithRelationType",
            Self::FindInfoByFrom(_) => "findInfoByFrom",
            Self::FindInfoByTo(_) => "findInfoByTo",
        }
    }

    pub fn to_request(&self) -> Result<RequestSpec> {
        let relations = RequestSpec::get("/api/relations");
        let spec = match self {
            Self::GetRelation(p) => {
                let spec = p.from_side(RequestSpec::get("/api/relation"))?;
                let spec = p.relation_type(spec)?.query("relationTypeGroup", TYPE_GROUP);
                return p.to_side(spec);
            }
            Self::FindByFrom(p) => p.from_side(relations)?,
            Self::FindByFromWithRelationType(p) => p.relation_type(p.from_side(relations)?)?,
            Self::FindByTo(p) => p.to_side(relations)?,
            Self::FindByToWithRelationType(p) => p.relation_type(p.to_side(relations)?)?,
            Self::FindInfoByFrom(p) => p.from_side(RequestSpec::get("/api/relations/info"))?,
            Self::FindInfoByTo(p) => p.to_side(RequestSpec::get("/api/relations/info"))?,
        };
        Ok(spec.query("relationTypeGroup", TYPE_GROUP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn op(value: Value) -> RelationOp {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_relation_needs_both_ends() {
        let spec = op(json!({
            "operation": "getRelation",
            "fromId": "a-1",
            "fromType": "ASSET",
            "relationType": "Contains",
            "toId": "d-1",
            "toType": "DEVICE"
        }))
        .to_request()
        .unwrap();

        assert_eq!(spec.path, "/api/relation");
        assert_eq!(
            spec.cleaned_query(),
            vec![
                ("fromId", "a-1".to_string()),
                ("fromType", "ASSET".to_string()),
                ("relationType", "Contains".to_string()),
                ("relationTypeGroup", "COMMON".to_string()),
                ("toId", "d-1".to_string()),
                ("toType", "DEVICE".to_string()),
            ]
        );

        let err = op(json!({"operation": "getRelation", "fromId": "a-1", "fromType": "ASSET"}))
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("\"relationType\""));
    }

    #[test]
    fn test_find_by_from_ignores_to_side() {
        let spec = op(json!({
            "operation": "findByFrom",
            "fromId": "a-1",
            "fromType": "ASSET",
            "toId": "ignored"
        }))
        .to_request()
        .unwrap();
        assert_eq!(spec.path, "/api/relations");
        assert_eq!(
            spec.cleaned_query(),
            vec![
                ("fromId", "a-1".to_string()),
                ("fromType", "ASSET".to_string()),
                ("relationTypeGroup", "COMMON".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_by_to_with_type() {
        let spec = op(json!({
            "operation": "findByToWithRelationType",
            "toId": "d-1",
            "toType": "DEVICE",
            "relationType": "Manages"
        }))
        .to_request()
        .unwrap();
        let query = spec.cleaned_query();
        assert!(query.contains(&("relationType", "Manages".to_string())));
        assert!(query.contains(&("toType", "DEVICE".to_string())));
    }

    #[test]
    fn test_info_lookup_path() {
        let spec = op(json!({"operation": "findInfoByTo", "toId": "d-1", "toType": "DEVICE"}))
            .to_request()
            .unwrap();
        assert_eq!(spec.path, "/api/relations/info");

        let err = op(json!({"operation": "findInfoByFrom"}))
            .to_request()
            .unwrap_err();
        assert!(err.to_string().contains("\"fromId\""));
    }
}
