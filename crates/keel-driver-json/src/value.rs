use keel_core::{
    driver::Document,
    stmt::{self, Value},
};
use serde_json::{Map, Number, Value as Json};

/// Converts a stored document into a JSON object.
pub(crate) fn to_json(document: Document) -> Json {
    Json::Object(
        document
            .into_iter()
            .map(|(column, value)| (column, value_to_json(value)))
            .collect::<Map<_, _>>(),
    )
}

/// Reads a JSON object back into a document. Anything other than an object
/// yields `None`.
pub(crate) fn from_json(json: Json) -> Option<Document> {
    let Json::Object(map) = json else {
        return None;
    };

    Some(
        map.into_iter()
            .map(|(column, value)| (column, value_from_json(value)))
            .collect(),
    )
}

fn value_to_json(value: Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(v),
        Value::I64(v) => Json::Number(v.into()),
        Value::F64(v) => Number::from_f64(v).map_or(Json::Null, Json::Number),
        Value::String(v) => Json::String(v),
        Value::Bytes(v) => Json::Array(v.into_iter().map(|b| Json::Number(b.into())).collect()),
        Value::List(items) => Json::Array(items.into_iter().map(value_to_json).collect()),
        value => value_to_json(stmt::to_backend(value)),
    }
}

fn value_from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(v) => Value::Bool(v),
        Json::Number(n) => match n.as_i64() {
            Some(v) => Value::I64(v),
            None => Value::F64(n.as_f64().unwrap_or_default()),
        },
        Json::String(v) => Value::String(v),
        Json::Array(items) => Value::List(items.into_iter().map(value_from_json).collect()),
        Json::Object(map) => Value::String(Json::Object(map).to_string()),
    }
}
