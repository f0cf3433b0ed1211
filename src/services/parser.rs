// src/services/parser.rs
// DOCUMENTATION: Raw document to LocationRecord normalization
// PURPOSE: Turn arbitrary remote JSON into a well-typed record without ever failing

use serde_json::{Map, Value};

use crate::models::{Coordinates, LocationRecord};
use crate::services::location_store::RawDocument;

/// Normalize one remote document.
///
/// Coordinates may arrive as a JSON-encoded string, as an object, or not at
/// all. Unusable coordinates leave the record in place (it still shows up in
/// lists) but with `coordinates: None` so it is never plotted or ranked.
///
/// Known fields land in typed slots only when they already have the expected
/// JSON type. A known field with any other type is not coerced; it is kept
/// verbatim in `extra` under its own key. Nulls count as absent.
pub fn parse_location(raw: &Map<String, Value>, doc_id: &str) -> LocationRecord {
    let mut record = LocationRecord::empty(doc_id);

    for (key, value) in raw {
        let typed = match key.as_str() {
            "id" | "coordinates" => true,
            _ if value.is_null() => true,
            "name" => text_slot(&mut record.name, value),
            "description" => text_slot(&mut record.description, value),
            "address" => text_slot(&mut record.address, value),
            "category" => text_slot(&mut record.category, value),
            "hours" => text_slot(&mut record.hours, value),
            "phone" => text_slot(&mut record.phone, value),
            "website" => text_slot(&mut record.website, value),
            "imageUrl" => text_slot(&mut record.image_url, value),
            "rating" => {
                record.rating = value.as_f64();
                record.rating.is_some()
            }
            _ => false,
        };

        if !typed {
            record.extra.insert(key.clone(), value.clone());
        }
    }

    record.coordinates = resolve_coordinates(raw.get("coordinates"), doc_id);
    record
}

/// Parse a whole result set, preserving order
pub fn parse_documents(documents: &[RawDocument]) -> Vec<LocationRecord> {
    documents
        .iter()
        .map(|doc| parse_location(&doc.fields, &doc.id))
        .collect()
}

/// Resolve the `coordinates` field.
/// DOCUMENTATION: string -> decode (warn and drop on failure),
/// object -> used as-is, anything else -> absent. The result is kept only
/// when `lat` and `lng` are both finite numbers.
pub fn resolve_coordinates(raw: Option<&Value>, doc_id: &str) -> Option<Coordinates> {
    let raw = raw?;
    let resolved = match raw {
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!(
                    "Discarding malformed coordinates for {}: {:?} ({})",
                    doc_id,
                    encoded,
                    e
                );
                return None;
            }
        },
        Value::Object(_) => raw.clone(),
        _ => return None,
    };

    let object = resolved.as_object()?;
    let coordinates = Coordinates::new(
        object.get("lat").and_then(Value::as_f64)?,
        object.get("lng").and_then(Value::as_f64)?,
    );

    if coordinates.is_usable() {
        Some(coordinates)
    } else {
        log::debug!("Coordinates for {} are not finite, skipping map pin", doc_id);
        None
    }
}

fn text_slot(slot: &mut Option<String>, value: &Value) -> bool {
    *slot = value.as_str().map(str::to_string);
    slot.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_object_coordinates_pass_through() {
        let raw = object(json!({
            "name": "Igreja de Nazareth",
            "coordinates": { "lat": -22.9326, "lng": -42.4898 }
        }));

        let record = parse_location(&raw, "doc-1");
        assert_eq!(record.id, "doc-1");
        assert_eq!(record.coordinates, Some(Coordinates::new(-22.9326, -42.4898)));
    }

    #[test]
    fn test_string_encoded_coordinates() {
        let raw = object(json!({ "coordinates": "{\"lat\":-22.9,\"lng\":-42.5}" }));
        let record = parse_location(&raw, "doc-2");
        assert_eq!(record.coordinates, Some(Coordinates::new(-22.9, -42.5)));
    }

    #[test]
    fn test_malformed_string_coordinates_are_absent() {
        let raw = object(json!({ "name": "Sem mapa", "coordinates": "{bad json" }));
        let record = parse_location(&raw, "doc-3");
        assert!(record.coordinates.is_none());
        assert_eq!(record.name.as_deref(), Some("Sem mapa"));
    }

    #[test]
    fn test_non_numeric_components_are_absent() {
        let cases = [
            json!({ "coordinates": { "lat": "-22.9", "lng": -42.5 } }),
            json!({ "coordinates": { "lat": -22.9 } }),
            json!({ "coordinates": null }),
            json!({ "coordinates": 42 }),
            json!({ "coordinates": "[1, 2]" }),
            json!({ "coordinates": [-22.9, -42.5] }),
            json!({}),
        ];
        for case in cases {
            let record = parse_location(&object(case.clone()), "doc");
            assert!(record.coordinates.is_none(), "expected none for {}", case);
        }
    }

    #[test]
    fn test_integer_coordinates_are_accepted() {
        let raw = object(json!({ "coordinates": { "lat": -23, "lng": -42 } }));
        let record = parse_location(&raw, "doc-4");
        assert_eq!(record.coordinates, Some(Coordinates::new(-23.0, -42.0)));
    }

    #[test]
    fn test_missing_optionals_stay_absent() {
        let raw = object(json!({
            "name": "Praia de Itaúna",
            "description": "Point do surf",
            "address": "Av. Oceânica",
            "category": "Praias e Lagoas"
        }));

        let record = parse_location(&raw, "itauna");
        assert_eq!(record.category.as_deref(), Some("Praias e Lagoas"));
        assert!(record.hours.is_none());
        assert!(record.phone.is_none());
        assert!(record.website.is_none());
        assert!(record.rating.is_none());
        assert!(record.image_url.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_optionals_and_extra_fields() {
        let raw = object(json!({
            "name": "Pousada do Farol",
            "hours": "24h",
            "phone": "(22) 2651-0000",
            "website": "https://farol.example",
            "rating": 4.7,
            "imageUrl": "https://img.example/farol.jpg",
            "instagram": "@farol"
        }));

        let record = parse_location(&raw, "farol");
        assert_eq!(record.hours.as_deref(), Some("24h"));
        assert_eq!(record.phone.as_deref(), Some("(22) 2651-0000"));
        assert_eq!(record.rating, Some(4.7));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/farol.jpg"));
        assert_eq!(record.extra.get("instagram"), Some(&json!("@farol")));
        assert!(!record.extra.contains_key("rating"));
    }

    #[test]
    fn test_mistyped_known_fields_pass_through() {
        let raw = object(json!({
            "name": "Quiosque do Zé",
            "rating": "4.5",
            "phone": 2226510000u64,
            "hours": null
        }));

        let record = parse_location(&raw, "quiosque");
        assert_eq!(record.rating, None);
        assert_eq!(record.phone, None);
        assert_eq!(record.extra.get("rating"), Some(&json!("4.5")));
        assert_eq!(record.extra.get("phone"), Some(&json!(2226510000u64)));
        assert!(!record.extra.contains_key("hours"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "quiosque",
                "name": "Quiosque do Zé",
                "rating": "4.5",
                "phone": 2226510000u64
            })
        );

        let cached: LocationRecord = serde_json::from_value(value).unwrap();
        assert_eq!(cached, record);
    }

    #[test]
    fn test_coordinate_object_keeps_only_lat_lng() {
        let raw = object(json!({
            "coordinates": { "lat": -22.93, "lng": -42.49, "label": "entrada" }
        }));

        let record = parse_location(&raw, "doc-5");
        assert_eq!(record.coordinates, Some(Coordinates::new(-22.93, -42.49)));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_parse_documents_keeps_order() {
        let docs = vec![
            RawDocument::new("b", object(json!({ "name": "B" }))),
            RawDocument::new("a", object(json!({ "name": "A" }))),
        ];
        let ids: Vec<String> = parse_documents(&docs).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
