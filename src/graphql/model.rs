use serde::Serialize;
use serde_json::Value;

use crate::record::DecodedRecord;
use crate::sink::SkipReason;

/// A weak reference to another entity by id. The store is not asked whether
/// the target exists; ownership stays with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub id: String,
}

/// Input shape of the `addProduct` mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductEntity {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<NodeRef>>,
}

/// Map a decoded record onto a [`ProductEntity`]. Pure.
///
/// The id comes from `product_id` or `id`; without either the record is not
/// product-shaped. Materials entries may be bare ids or objects carrying an
/// `id`; entries without one are dropped silently, order preserved.
pub fn transform(record: &DecodedRecord) -> Result<ProductEntity, SkipReason> {
    let id = record
        .text("product_id")
        .or_else(|| record.text("id"))
        .ok_or(SkipReason::NoProductInfo)?;
    let name = record.text("product_name").or_else(|| record.text("name"));
    let product_type = record
        .text("product_type")
        .or_else(|| record.text("type"))
        .unwrap_or_else(|| "Food".into());
    let created_at = record
        .text("createdAt")
        .unwrap_or_else(|| record.received_at.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    let node_ref = |key: &str| record.text(key).map(|id| NodeRef { id });

    Ok(ProductEntity {
        id,
        name,
        product_type,
        created_at,
        factory: node_ref("factory_id"),
        machine: node_ref("machine_id"),
        materials: record.array("materials").map(|items| material_refs(items)),
    })
}

fn material_refs(items: &[Value]) -> Vec<NodeRef> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(id) => Some(NodeRef { id: id.clone() }),
            Value::Object(map) => match map.get("id") {
                Some(Value::String(id)) => Some(NodeRef { id: id.clone() }),
                Some(Value::Number(id)) => Some(NodeRef { id: id.to_string() }),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::decode;

    fn record(json: &str) -> DecodedRecord {
        decode(
            "factory/data/sensor1",
            json.as_bytes(),
            "2024-01-01T00:00:00Z".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn transform_builds_the_full_entity() {
        let entity = transform(&record(
            r#"{"product_id":"P9001","product_name":"Classic Burger","product_type":"Food",
                "createdAt":"2024-05-01T10:00:00Z","factory_id":"F001","machine_id":"M101",
                "materials":[{"id":"MAT01","name":"Beef Patty"},{"id":"MAT02"}]}"#,
        ))
        .unwrap();
        assert_eq!(entity.id, "P9001");
        assert_eq!(entity.name.as_deref(), Some("Classic Burger"));
        assert_eq!(entity.created_at, "2024-05-01T10:00:00Z");
        assert_eq!(entity.factory, Some(NodeRef { id: "F001".into() }));
        assert_eq!(entity.machine, Some(NodeRef { id: "M101".into() }));
        assert_eq!(
            entity.materials,
            Some(vec![
                NodeRef { id: "MAT01".into() },
                NodeRef { id: "MAT02".into() }
            ])
        );
    }

    #[test]
    fn transform_accepts_a_bare_product_id() {
        // A scan payload with nothing product-shaped beyond the id still
        // yields a minimal entity.
        let entity = transform(&record(
            r#"{"scanner_id":"SCN001","product_id":"P001","material_id":"MAT001"}"#,
        ))
        .unwrap();
        assert_eq!(entity.id, "P001");
        assert_eq!(entity.name, None);
        assert_eq!(entity.product_type, "Food");
        assert_eq!(entity.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(entity.factory, None);
        assert_eq!(entity.materials, None);
    }

    #[test]
    fn transform_requires_a_product_identifier() {
        assert_eq!(
            transform(&record(r#"{"value": 23.5}"#)).unwrap_err(),
            SkipReason::NoProductInfo
        );
        // `id` alone is enough.
        assert_eq!(transform(&record(r#"{"id":"P2"}"#)).unwrap().id, "P2");
    }

    #[test]
    fn materials_entries_without_an_id_are_dropped() {
        let entity = transform(&record(
            r#"{"product_id":"P1",
                "materials":[{"id":"MAT01"},"MAT02",{"name":"no id"}]}"#,
        ))
        .unwrap();
        assert_eq!(
            entity.materials,
            Some(vec![
                NodeRef { id: "MAT01".into() },
                NodeRef { id: "MAT02".into() }
            ])
        );
    }

    #[test]
    fn transform_is_idempotent() {
        let rec = record(r#"{"product_id":"P1","materials":["MAT01"]}"#);
        assert_eq!(transform(&rec).unwrap(), transform(&rec).unwrap());
    }

    #[test]
    fn serialized_entity_omits_absent_relations() {
        let entity = transform(&record(r#"{"product_id":"P001"}"#)).unwrap();
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "P001",
                "type": "Food",
                "createdAt": "2024-01-01T00:00:00Z"
            })
        );
    }
}
