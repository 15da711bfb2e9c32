//! The serialized function record.
//!
//! A constant serializes to its raw JSON value. A function serializes to an
//! object:
//!
//! ```json
//! {
//!   "type": "exponential" | "interval" | "categorical" | "identity",
//!   "property": "temp" | null,
//!   "base": 1.75 | null,
//!   "stops": [[key, value], ...] | [[zoomKey, [[attrKey, value], ...]], ...] | null,
//!   "default": value | null
//! }
//! ```
//!
//! The function kind is implied: no `property` means camera, flat stops mean
//! source, nested stops mean composite, and `"identity"` carries no stops at
//! all. Decoding funnels through the `Function` constructors, so a record
//! that violates a construction invariant is rejected as malformed.

use serde_json::{Map, Value as Json};

use crate::error::{Result, StyleError};
use crate::value::{StyleType, StyleValue};

use super::stops::{StopKey, StopTable};
use super::{Function, FunctionOptions, InterpolationMode};

/// Serialize a style value into the style representation.
pub(crate) fn encode<T: StyleType>(value: &StyleValue<T>) -> Json {
    match value {
        StyleValue::Constant(constant) => constant.to_json(),
        StyleValue::Function(function) => encode_function(function),
    }
}

/// Reconstruct a style value from the style representation.
pub(crate) fn decode<T: StyleType>(json: &Json) -> Result<StyleValue<T>> {
    match json {
        Json::Object(record) => decode_function(record).map(StyleValue::Function),
        constant => T::from_json(constant).map(StyleValue::Constant),
    }
}

fn encode_function<T: StyleType>(function: &Function<T>) -> Json {
    let (property, stops, base, default) = match function {
        Function::Camera(f) => (None, Some(encode_flat_stops(&f.stops)), f.base, None),
        Function::Source(f) => (
            Some(f.attribute.as_str()),
            Some(encode_flat_stops(&f.stops)),
            f.base,
            f.default.as_ref(),
        ),
        Function::Composite(f) => (
            Some(f.attribute.as_str()),
            Some(encode_nested_stops(&f.stops)),
            f.base,
            f.default.as_ref(),
        ),
        Function::Identity(f) => (Some(f.attribute.as_str()), None, None, f.default.as_ref()),
    };

    let mut record = Map::new();
    record.insert("type".to_string(), Json::from(function.mode().as_str()));
    record.insert(
        "property".to_string(),
        property.map_or(Json::Null, Json::from),
    );
    record.insert("base".to_string(), base.map_or(Json::Null, Json::from));
    record.insert("stops".to_string(), stops.unwrap_or(Json::Null));
    record.insert(
        "default".to_string(),
        default.map_or(Json::Null, StyleType::to_json),
    );
    Json::Object(record)
}

fn encode_flat_stops<T: StyleType>(stops: &StopTable<T>) -> Json {
    Json::from(
        stops
            .iter()
            .map(|(key, value)| Json::from(vec![key.to_json(), value.to_json()]))
            .collect::<Vec<_>>(),
    )
}

fn encode_nested_stops<T: StyleType>(stops: &StopTable<StopTable<T>>) -> Json {
    Json::from(
        stops
            .iter()
            .map(|(key, inner)| Json::from(vec![key.to_json(), encode_flat_stops(inner)]))
            .collect::<Vec<_>>(),
    )
}

fn decode_function<T: StyleType>(record: &Map<String, Json>) -> Result<Function<T>> {
    let mode = decode_mode(record)?;
    let property = match record.get("property") {
        None | Some(Json::Null) => None,
        Some(Json::String(name)) => Some(name.clone()),
        Some(other) => {
            return Err(StyleError::malformed(format!(
                "property must be a string or null, got {}",
                other
            )))
        }
    };
    let base = match record.get("base") {
        None | Some(Json::Null) => None,
        Some(value) => Some(value.as_f64().ok_or_else(|| {
            StyleError::malformed(format!("base must be a number or null, got {}", value))
        })?),
    };
    let default = match record.get("default") {
        None | Some(Json::Null) => None,
        Some(value) => Some(T::from_json(value)?),
    };
    let stops = match record.get("stops") {
        None | Some(Json::Null) => None,
        Some(Json::Array(entries)) => Some(entries.as_slice()),
        Some(other) => {
            return Err(StyleError::malformed(format!(
                "stops must be an array or null, got {}",
                other
            )))
        }
    };

    let mut options = FunctionOptions::new();
    options.interpolation_base = base;
    options.default_value = default;

    match (mode, property, stops) {
        (InterpolationMode::Identity, Some(attribute), None) => {
            Function::identity(attribute, options)
        }
        (InterpolationMode::Identity, _, Some(_)) => Err(StyleError::malformed(
            "identity function cannot carry stops",
        )),
        (InterpolationMode::Identity, None, None) => Err(StyleError::malformed(
            "identity function requires a property",
        )),
        (mode, _, None) => Err(StyleError::malformed(format!(
            "{} function requires stops",
            mode
        ))),
        (mode, None, Some(entries)) => {
            Function::camera(mode, decode_flat_stops(entries)?, options)
        }
        (mode, Some(attribute), Some(entries)) => {
            // Flat stops make a source function, nested stops a composite
            // one. Flat decode is attempted first; values that are
            // themselves stop arrays cannot parse as T, so the two shapes
            // never collide.
            match decode_flat_stops::<T>(entries) {
                Ok(table) => Function::source(mode, attribute, table, options),
                Err(flat_err) => match decode_nested_stops::<T>(entries) {
                    Ok(table) => Function::composite(mode, attribute, table, options),
                    Err(nested_err) => Err(if looks_nested(entries) {
                        nested_err
                    } else {
                        flat_err
                    }),
                },
            }
        }
    }
}

fn decode_mode(record: &Map<String, Json>) -> Result<InterpolationMode> {
    match record.get("type") {
        Some(value @ Json::String(name)) => serde_json::from_value(value.clone())
            .map_err(|_| StyleError::malformed(format!("unknown function type: '{}'", name))),
        Some(other) => Err(StyleError::malformed(format!(
            "function type must be a string, got {}",
            other
        ))),
        None => Err(StyleError::MalformedRecord {
            message: "missing function type".to_string(),
            help: Some(
                "objects are function records; constants serialize to their raw value".to_string(),
            ),
        }),
    }
}

fn decode_flat_stops<T: StyleType>(entries: &[Json]) -> Result<StopTable<T>> {
    let mut table = StopTable::new();
    for entry in entries {
        let (key, value) = split_pair(entry)?;
        table.insert(StopKey::from_json(key)?, T::from_json(value)?)?;
    }
    Ok(table)
}

fn decode_nested_stops<T: StyleType>(entries: &[Json]) -> Result<StopTable<StopTable<T>>> {
    let mut table = StopTable::new();
    for entry in entries {
        let (key, value) = split_pair(entry)?;
        let inner = value.as_array().ok_or_else(|| {
            StyleError::malformed(format!("inner stops must be an array, got {}", value))
        })?;
        table.insert(StopKey::from_json(key)?, decode_flat_stops(inner)?)?;
    }
    Ok(table)
}

fn split_pair(entry: &Json) -> Result<(&Json, &Json)> {
    let pair = entry.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
        StyleError::malformed(format!("stop entry must be a [key, value] pair, got {}", entry))
    })?;
    Ok((&pair[0], &pair[1]))
}

fn looks_nested(entries: &[Json]) -> bool {
    entries
        .first()
        .and_then(|entry| entry.as_array())
        .and_then(|pair| pair.get(1))
        .map(|value| {
            value
                .as_array()
                .is_some_and(|inner| inner.iter().all(|e| e.as_array().is_some()))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, Offset};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn round_trip<T: StyleType>(value: StyleValue<T>) {
        let encoded = encode(&value);
        let decoded: StyleValue<T> = decode(&encoded).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_constant_round_trips() {
        round_trip(StyleValue::<f64>::constant(3.0));
        round_trip(StyleValue::<bool>::constant(true));
        round_trip(StyleValue::<String>::constant("{name}".to_string()));
        round_trip(StyleValue::<Colour>::constant(Colour::RED));
        round_trip(StyleValue::<Offset>::constant(Offset::new(100.0, 0.0)));
    }

    #[test]
    fn test_camera_round_trips() {
        let stops = StopTable::from_pairs([
            (0.0, Colour::RED),
            (10.0, Colour::RED),
            (15.0, Colour::GREEN),
        ])
        .unwrap();
        let f = Function::camera(
            InterpolationMode::Exponential,
            stops,
            FunctionOptions::new().base(10.0),
        )
        .unwrap();
        round_trip(StyleValue::function(f));

        // interval camera stops over vector values
        let stops = StopTable::from_pairs([
            (0.0, Offset::new(100.0, 0.0)),
            (10.0, Offset::ZERO),
        ])
        .unwrap();
        let f =
            Function::camera(InterpolationMode::Interval, stops, FunctionOptions::new()).unwrap();
        round_trip(StyleValue::function(f));
    }

    #[test]
    fn test_source_round_trips() {
        let categorical = StopTable::from_pairs([("red", Colour::RED)]).unwrap();
        let f = Function::source(
            InterpolationMode::Categorical,
            "kind",
            categorical,
            FunctionOptions::new().default_value(Colour::BLUE),
        )
        .unwrap();
        round_trip(StyleValue::function(f));

        let booleans = StopTable::from_pairs([(false, 0.0), (true, 2.0)]).unwrap();
        let f = Function::source(
            InterpolationMode::Categorical,
            "fuzzy",
            booleans,
            FunctionOptions::new().default_value(42.0),
        )
        .unwrap();
        round_trip(StyleValue::function(f));

        let numeric = StopTable::from_pairs([(0.0, 0.0), (100.0, 10.0)]).unwrap();
        let f = Function::source(
            InterpolationMode::Exponential,
            "temp",
            numeric,
            FunctionOptions::new(),
        )
        .unwrap();
        round_trip(StyleValue::function(f));
    }

    #[test]
    fn test_identity_round_trips() {
        let f: Function<Colour> = Function::identity(
            "tint",
            FunctionOptions::new().default_value(Colour::GREEN),
        )
        .unwrap();
        round_trip(StyleValue::function(f));
    }

    #[test]
    fn test_composite_round_trips() {
        let inner = |radius: f64| StopTable::from_pairs([("green", radius)]).unwrap();
        let outer = StopTable::from_pairs([
            (0.0, inner(5.0)),
            (10.0, inner(5.0)),
            (15.0, inner(20.0)),
        ])
        .unwrap();
        let f = Function::composite(
            InterpolationMode::Categorical,
            "color",
            outer,
            FunctionOptions::new().default_value(2.0),
        )
        .unwrap();
        round_trip(StyleValue::function(f));
    }

    #[test]
    fn test_record_shape() {
        let stops = StopTable::from_pairs([(false, 0.0), (true, 2.0)]).unwrap();
        let f = Function::source(
            InterpolationMode::Categorical,
            "fuzzy",
            stops,
            FunctionOptions::new().default_value(42.0),
        )
        .unwrap();
        let record = encode(&StyleValue::function(f));
        insta::assert_json_snapshot!(
            record,
            @r###"
        {
          "base": null,
          "default": 42.0,
          "property": "fuzzy",
          "stops": [
            [
              false,
              0.0
            ],
            [
              true,
              2.0
            ]
          ],
          "type": "categorical"
        }
        "###
        );
    }

    #[test]
    fn test_decode_rejects_inconsistent_records() {
        // identity with stops
        let err = decode::<f64>(&json!({
            "type": "identity", "property": "size", "base": null,
            "stops": [[0, 1.0]], "default": null
        }))
        .unwrap_err();
        assert!(matches!(err, StyleError::MalformedRecord { .. }));

        // identity without a property
        assert!(decode::<f64>(&json!({"type": "identity", "property": null})).is_err());

        // unknown type string and non-string type
        assert!(decode::<f64>(&json!({"type": "cubic", "stops": [[0, 1.0]]})).is_err());
        assert!(decode::<f64>(&json!({"type": 3, "stops": [[0, 1.0]]})).is_err());

        // an object with no type is not a constant
        assert!(decode::<f64>(&json!({"stops": [[0, 1.0]]})).is_err());

        // stop-driven types without stops
        assert!(decode::<f64>(&json!({"type": "exponential", "property": "t"})).is_err());

        // camera function carrying a default
        assert!(decode::<f64>(&json!({
            "type": "interval", "property": null,
            "stops": [[0, 1.0]], "default": 3.0
        }))
        .is_err());

        // base outside exponential mode
        assert!(decode::<f64>(&json!({
            "type": "interval", "property": "t",
            "stops": [[0, 1.0]], "base": 2.0
        }))
        .is_err());

        // malformed stop entries and duplicate keys
        assert!(decode::<f64>(&json!({
            "type": "interval", "property": null, "stops": [[0, 1.0, 2.0]]
        }))
        .is_err());
        assert!(decode::<f64>(&json!({
            "type": "interval", "property": null, "stops": [[0, 1.0], [0, 2.0]]
        }))
        .is_err());
    }

    #[test]
    fn test_decode_distinguishes_source_and_composite() {
        let source = decode::<f64>(&json!({
            "type": "categorical", "property": "kind",
            "stops": [["red", 1.0]], "default": null
        }))
        .unwrap();
        assert_eq!(
            source.as_function().unwrap().kind(),
            crate::function::FunctionKind::Source
        );

        let composite = decode::<f64>(&json!({
            "type": "categorical", "property": "kind",
            "stops": [[0, [["red", 1.0]]], [10, [["red", 2.0]]]], "default": null
        }))
        .unwrap();
        assert_eq!(
            composite.as_function().unwrap().kind(),
            crate::function::FunctionKind::Composite
        );
    }

    #[test]
    fn test_flat_offset_stops_stay_flat() {
        // a [dx, dy] stop value must not be mistaken for a nested table
        let decoded = decode::<Offset>(&json!({
            "type": "interval", "property": null,
            "stops": [[0, [100.0, 0.0]], [10, [0.0, 0.0]]]
        }))
        .unwrap();
        let f = decoded.as_function().unwrap();
        assert_eq!(f.kind(), crate::function::FunctionKind::Camera);
        let evaluated = f.evaluate(5.0, &crate::types::Attributes::new()).unwrap();
        assert_eq!(evaluated, Offset::new(100.0, 0.0));
    }
}
