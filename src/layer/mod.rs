//! Layers and property bindings.
//!
//! A [`Layer`] owns one binding per declared property. Bindings store the
//! serialized style representation, so `get_property` always reconstructs
//! the typed value graph from it, the same path a style document loaded
//! from disk takes. Setting a property validates the value's type family
//! and, for data-driven functions, the slot's data-driven capability.

mod properties;

pub use properties::PropertySpec;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as Json;

use crate::error::{Result, StyleError};
use crate::value::{StyleType, StyleValue};

/// The rendering kind of a layer, which fixes its property registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Circle,
    Symbol,
    Line,
    Fill,
}

impl LayerKind {
    /// All properties this kind declares.
    pub fn properties(self) -> &'static [PropertySpec] {
        match self {
            LayerKind::Circle => properties::CIRCLE,
            LayerKind::Symbol => properties::SYMBOL,
            LayerKind::Line => properties::LINE,
            LayerKind::Fill => properties::FILL,
        }
    }

    /// Look up a property declaration by name.
    pub fn property(self, name: &str) -> Option<&'static PropertySpec> {
        self.properties().iter().find(|spec| spec.name == name)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Circle => "circle",
            LayerKind::Symbol => "symbol",
            LayerKind::Line => "line",
            LayerKind::Fill => "fill",
        };
        f.write_str(name)
    }
}

/// A style layer holding one property binding per declared slot.
///
/// Bindings hold the serialized representation exclusively; typed values
/// move in and out by copy, never by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: String,
    kind: LayerKind,
    overrides: BTreeMap<&'static str, Json>,
}

impl Layer {
    /// Create a layer with every property at its declared default.
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            overrides: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    fn spec(&self, name: &str) -> Result<&'static PropertySpec> {
        self.kind.property(name).ok_or_else(|| StyleError::NotFound {
            name: format!("{} property '{}'", self.kind, name),
        })
    }

    /// Bind a value to a property slot.
    ///
    /// Fails with `PropertyTypeMismatch` when the value's type family does
    /// not match the slot's declaration, or when a data-driven function is
    /// bound to a slot that cannot be data-driven.
    pub fn set_property<T: StyleType>(&mut self, name: &str, value: StyleValue<T>) -> Result<()> {
        let spec = self.spec(name)?;
        if spec.family != T::FAMILY {
            return Err(StyleError::PropertyTypeMismatch {
                property: spec.name.to_string(),
                message: format!("expected {} values, got {}", spec.family, T::FAMILY),
            });
        }
        if let StyleValue::Function(function) = &value {
            if function.kind().is_data_driven() && !spec.data_driven {
                return Err(StyleError::PropertyTypeMismatch {
                    property: spec.name.to_string(),
                    message: format!(
                        "{} functions need a data-driven property",
                        function.kind()
                    ),
                });
            }
        }
        self.overrides.insert(spec.name, value.to_json());
        Ok(())
    }

    /// Read a property slot back as a typed value.
    ///
    /// The value is reconstructed from the serialized representation: the
    /// stored override, or the slot's declared default when never set.
    pub fn get_property<T: StyleType>(&self, name: &str) -> Result<StyleValue<T>> {
        let spec = self.spec(name)?;
        if spec.family != T::FAMILY {
            return Err(StyleError::PropertyTypeMismatch {
                property: spec.name.to_string(),
                message: format!("holds {} values, requested {}", spec.family, T::FAMILY),
            });
        }
        match self.overrides.get(spec.name) {
            Some(record) => StyleValue::from_json(record),
            None => StyleValue::from_json(&serde_json::from_str(spec.default)?),
        }
    }

    /// Bind a property slot directly from its serialized representation.
    ///
    /// This is the path a style document loader takes: the record is
    /// validated against the slot's declared family, then stored as-is for
    /// `get_property` to reconstruct.
    pub fn set_property_record(&mut self, name: &str, record: Json) -> Result<()> {
        let spec = self.spec(name)?;
        spec.family
            .check_record(&record)
            .map_err(|err| StyleError::PropertyTypeMismatch {
                property: spec.name.to_string(),
                message: err.to_string(),
            })?;
        self.overrides.insert(spec.name, record);
        Ok(())
    }

    /// Return a property slot to its declared default.
    pub fn reset_property(&mut self, name: &str) -> Result<()> {
        let spec = self.spec(name)?;
        self.overrides.remove(spec.name);
        Ok(())
    }

    /// Whether a slot currently holds something other than its default.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{Function, FunctionOptions, InterpolationMode, StopTable};
    use crate::types::{Alignment, Colour, Offset};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constant_round_trips() {
        let mut symbol = Layer::new("symbols", LayerKind::Symbol);

        symbol
            .set_property("icon-allow-overlap", StyleValue::<bool>::constant(true))
            .unwrap();
        assert_eq!(
            symbol.get_property::<bool>("icon-allow-overlap").unwrap(),
            StyleValue::constant(true)
        );

        symbol
            .set_property("icon-halo-width", StyleValue::<f64>::constant(3.0))
            .unwrap();
        assert_eq!(
            symbol.get_property::<f64>("icon-halo-width").unwrap(),
            StyleValue::constant(3.0)
        );

        symbol
            .set_property("text-field", StyleValue::<String>::constant("{name}"))
            .unwrap();
        assert_eq!(
            symbol.get_property::<String>("text-field").unwrap(),
            StyleValue::constant("{name}".to_string())
        );

        let mut circle = Layer::new("circles", LayerKind::Circle);
        circle
            .set_property(
                "circle-translation",
                StyleValue::<Offset>::constant(Offset::new(100.0, 0.0)),
            )
            .unwrap();
        assert_eq!(
            circle.get_property::<Offset>("circle-translation").unwrap(),
            StyleValue::constant(Offset::new(100.0, 0.0))
        );

        circle
            .set_property(
                "circle-scale-alignment",
                StyleValue::<Alignment>::constant(Alignment::Map),
            )
            .unwrap();
        assert_eq!(
            circle
                .get_property::<Alignment>("circle-scale-alignment")
                .unwrap(),
            StyleValue::constant(Alignment::Map)
        );
    }

    #[test]
    fn test_camera_functions_on_non_data_driven_slots() {
        let mut circle = Layer::new("circles", LayerKind::Circle);

        let stops = StopTable::from_pairs([
            (0.0, Offset::new(100.0, 0.0)),
            (10.0, Offset::ZERO),
        ])
        .unwrap();
        let value = StyleValue::function(
            Function::camera(InterpolationMode::Interval, stops, FunctionOptions::new()).unwrap(),
        );
        circle.set_property("circle-translation", value.clone()).unwrap();
        assert_eq!(
            circle.get_property::<Offset>("circle-translation").unwrap(),
            value
        );

        let stops = StopTable::from_pairs([
            (0.0, Alignment::Map),
            (10.0, Alignment::Viewport),
        ])
        .unwrap();
        let value = StyleValue::function(
            Function::camera(InterpolationMode::Interval, stops, FunctionOptions::new()).unwrap(),
        );
        circle
            .set_property("circle-scale-alignment", value.clone())
            .unwrap();
        assert_eq!(
            circle
                .get_property::<Alignment>("circle-scale-alignment")
                .unwrap(),
            value
        );
    }

    #[test]
    fn test_data_driven_function_round_trips() {
        let mut circle = Layer::new("circles", LayerKind::Circle);

        let stops = StopTable::from_pairs([("red", Colour::RED)]).unwrap();
        let value = StyleValue::function(
            Function::source(
                InterpolationMode::Categorical,
                "red",
                stops,
                FunctionOptions::new().default_value(Colour::from_hex("#00FFFF").unwrap()),
            )
            .unwrap(),
        );
        circle.set_property("circle-color", value.clone()).unwrap();
        assert_eq!(circle.get_property::<Colour>("circle-color").unwrap(), value);

        let inner = |radius: f64| StopTable::from_pairs([("green", radius)]).unwrap();
        let outer = StopTable::from_pairs([
            (0.0, inner(5.0)),
            (10.0, inner(5.0)),
            (15.0, inner(20.0)),
            (20.0, inner(20.0)),
        ])
        .unwrap();
        let value = StyleValue::function(
            Function::composite(
                InterpolationMode::Categorical,
                "color",
                outer,
                FunctionOptions::new().default_value(2.0),
            )
            .unwrap(),
        );
        circle.set_property("circle-radius", value.clone()).unwrap();
        let returned = circle.get_property::<f64>("circle-radius").unwrap();
        assert_eq!(returned, value);

        // the reconstructed function still exposes its stop structure
        let function = returned.as_function().unwrap();
        assert_eq!(function.attribute(), Some("color"));
        if let Function::Composite(composite) = function {
            let zoom_keys: Vec<String> =
                composite.stops.keys().map(|k| k.to_string()).collect();
            assert_eq!(zoom_keys, vec!["0", "10", "15", "20"]);
        } else {
            panic!("expected a composite function");
        }
    }

    #[test]
    fn test_rejects_wrong_family() {
        let mut circle = Layer::new("circles", LayerKind::Circle);
        let err = circle
            .set_property("circle-radius", StyleValue::<bool>::constant(true))
            .unwrap_err();
        assert!(matches!(err, StyleError::PropertyTypeMismatch { .. }));

        circle
            .set_property("circle-radius", StyleValue::<f64>::constant(4.0))
            .unwrap();
        let err = circle.get_property::<bool>("circle-radius").unwrap_err();
        assert!(matches!(err, StyleError::PropertyTypeMismatch { .. }));
    }

    #[test]
    fn test_rejects_data_driven_function_on_fixed_slot() {
        let mut circle = Layer::new("circles", LayerKind::Circle);
        let stops = StopTable::from_pairs([(0.0, Offset::ZERO)]).unwrap();
        let err = circle
            .set_property(
                "circle-translation",
                StyleValue::function(
                    Function::source(
                        InterpolationMode::Interval,
                        "shift",
                        stops,
                        FunctionOptions::new(),
                    )
                    .unwrap(),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, StyleError::PropertyTypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_property() {
        let mut circle = Layer::new("circles", LayerKind::Circle);
        let err = circle
            .set_property("line-width", StyleValue::<f64>::constant(2.0))
            .unwrap_err();
        assert!(matches!(err, StyleError::NotFound { .. }));
        assert!(circle.get_property::<f64>("halo").is_err());
    }

    #[test]
    fn test_defaults_and_reset() {
        let mut circle = Layer::new("circles", LayerKind::Circle);
        assert_eq!(
            circle.get_property::<f64>("circle-radius").unwrap(),
            StyleValue::constant(5.0)
        );
        assert_eq!(
            circle.get_property::<Colour>("circle-color").unwrap(),
            StyleValue::constant(Colour::BLACK)
        );
        assert!(!circle.is_overridden("circle-radius"));

        circle
            .set_property("circle-radius", StyleValue::<f64>::constant(12.0))
            .unwrap();
        assert!(circle.is_overridden("circle-radius"));

        circle.reset_property("circle-radius").unwrap();
        assert_eq!(
            circle.get_property::<f64>("circle-radius").unwrap(),
            StyleValue::constant(5.0)
        );
    }

    #[test]
    fn test_set_property_record_from_style_document() {
        let mut circle = Layer::new("circles", LayerKind::Circle);
        circle
            .set_property_record(
                "circle-radius",
                serde_json::json!({
                    "type": "exponential", "property": null, "base": 1.5,
                    "stops": [[0, 2.0], [18, 14.0]], "default": null
                }),
            )
            .unwrap();
        let value = circle.get_property::<f64>("circle-radius").unwrap();
        let function = value.as_function().unwrap();
        assert_eq!(function.interpolation_base(), Some(1.5));

        // a boolean constant cannot land in a number slot
        let err = circle
            .set_property_record("circle-radius", serde_json::json!(true))
            .unwrap_err();
        assert!(matches!(err, StyleError::PropertyTypeMismatch { .. }));
    }

    #[test]
    fn test_hex_colour_set_reads_back_within_channel_accuracy() {
        let mut fill = Layer::new("land", LayerKind::Fill);
        let stored = Colour::from_hex("#336699").unwrap();
        fill.set_property("fill-color", StyleValue::<Colour>::constant(stored))
            .unwrap();
        let returned = fill.get_property::<Colour>("fill-color").unwrap();
        let returned = *returned.as_constant().unwrap();
        assert_eq!(returned, stored);
        assert!(returned.approx_eq(stored, Colour::CHANNEL_ACCURACY));
    }
}
