use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

/// Convert a BSON document into plain JSON.
///
/// Store-native types become strings at any depth: `ObjectId` as lowercase
/// hex, `DateTime` as RFC 3339. The input is left untouched.
#[must_use]
pub fn normalize_document(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), normalize_bson(value)))
        .collect()
}

#[must_use]
pub fn normalize_bson(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Int32(n) => Value::from(*n),
        Bson::Int64(n) => Value::from(*n),
        Bson::Double(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        Bson::Array(items) => Value::Array(items.iter().map(normalize_bson).collect()),
        Bson::Document(doc) => Value::Object(normalize_document(doc)),
        other => Value::String(other.to_string()),
    }
}
