//! Typed style values.
//!
//! A [`StyleValue`] is either a constant or a [`Function`] of the same output
//! type. The [`StyleType`] trait defines the universe of types a style
//! property can range over (numbers, booleans, strings, colours, offsets,
//! enumerations) together with the per-type hooks the engine needs:
//! serialization to and from the style representation, coercion from raw
//! feature attributes, and channel blending for interpolatable types.

use std::fmt;

use serde_json::Value as Json;

use crate::error::{Result, StyleError};
use crate::function::Function;
use crate::types::{Alignment, AttrValue, Attributes, Colour, Offset};

/// The type family a style type belongs to.
///
/// Property slots declare a family; bindings are validated against it before
/// any value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Number,
    Boolean,
    String,
    Color,
    Vector,
    Enumeration,
}

impl TypeFamily {
    /// Decode a serialized record under this family, discarding the value.
    ///
    /// Lets callers that only know a slot's declared family (the CLI, a
    /// style document loader) validate a record without naming the Rust
    /// type.
    pub fn check_record(self, json: &Json) -> Result<()> {
        fn check<T: StyleType>(json: &Json) -> Result<()> {
            StyleValue::<T>::from_json(json).map(|_| ())
        }
        match self {
            TypeFamily::Number => check::<f64>(json),
            TypeFamily::Boolean => check::<bool>(json),
            TypeFamily::String => check::<String>(json),
            TypeFamily::Color => check::<Colour>(json),
            TypeFamily::Vector => check::<Offset>(json),
            TypeFamily::Enumeration => check::<Alignment>(json),
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeFamily::Number => "number",
            TypeFamily::Boolean => "boolean",
            TypeFamily::String => "string",
            TypeFamily::Color => "color",
            TypeFamily::Vector => "vector",
            TypeFamily::Enumeration => "enumeration",
        };
        f.write_str(name)
    }
}

/// A type a style property can range over.
pub trait StyleType: Clone + PartialEq + fmt::Debug + Sized {
    /// Family used for property-binding validation.
    const FAMILY: TypeFamily;

    /// Whether values can be blended by exponential interpolation.
    const INTERPOLATABLE: bool = false;

    /// Serialize into the style representation.
    fn to_json(&self) -> Json;

    /// Reconstruct from the style representation.
    fn from_json(json: &Json) -> Result<Self>;

    /// Coerce a raw feature attribute, for identity functions.
    ///
    /// Returns `None` when the attribute cannot represent this type.
    fn from_attr(value: &AttrValue) -> Option<Self>;

    /// Blend two values; `None` when the type cannot be interpolated.
    fn lerp(a: &Self, b: &Self, t: f64) -> Option<Self> {
        let _ = (a, b, t);
        None
    }
}

impl StyleType for f64 {
    const FAMILY: TypeFamily = TypeFamily::Number;
    const INTERPOLATABLE: bool = true;

    fn to_json(&self) -> Json {
        Json::from(*self)
    }

    fn from_json(json: &Json) -> Result<Self> {
        json.as_f64()
            .ok_or_else(|| StyleError::malformed(format!("expected a number, got {}", json)))
    }

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_number()
    }

    fn lerp(a: &Self, b: &Self, t: f64) -> Option<Self> {
        Some(a + (b - a) * t)
    }
}

impl StyleType for bool {
    const FAMILY: TypeFamily = TypeFamily::Boolean;

    fn to_json(&self) -> Json {
        Json::from(*self)
    }

    fn from_json(json: &Json) -> Result<Self> {
        json.as_bool()
            .ok_or_else(|| StyleError::malformed(format!("expected a boolean, got {}", json)))
    }

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_bool()
    }
}

impl StyleType for String {
    const FAMILY: TypeFamily = TypeFamily::String;

    fn to_json(&self) -> Json {
        Json::from(self.clone())
    }

    fn from_json(json: &Json) -> Result<Self> {
        json.as_str()
            .map(str::to_string)
            .ok_or_else(|| StyleError::malformed(format!("expected a string, got {}", json)))
    }

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl StyleType for Colour {
    const FAMILY: TypeFamily = TypeFamily::Color;
    const INTERPOLATABLE: bool = true;

    /// Colours serialize as `[r, g, b, a]` channel arrays so interpolated
    /// values survive a round-trip without 8-bit quantization.
    fn to_json(&self) -> Json {
        Json::from(vec![
            self.r as f64,
            self.g as f64,
            self.b as f64,
            self.a as f64,
        ])
    }

    /// Accepts either a channel array or a hex string (`"#RRGGBBAA"`).
    fn from_json(json: &Json) -> Result<Self> {
        match json {
            Json::String(hex) => Colour::from_hex(hex),
            Json::Array(channels) if channels.len() == 4 => {
                let mut out = [0.0f32; 4];
                for (slot, channel) in out.iter_mut().zip(channels) {
                    *slot = channel.as_f64().ok_or_else(|| {
                        StyleError::malformed(format!("non-numeric colour channel: {}", channel))
                    })? as f32;
                }
                Ok(Colour::new(out[0], out[1], out[2], out[3]))
            }
            _ => Err(StyleError::MalformedRecord {
                message: format!("expected a colour, got {}", json),
                help: Some("use a hex string or an [r, g, b, a] array".to_string()),
            }),
        }
    }

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_str().and_then(|s| Colour::from_hex(s).ok())
    }

    fn lerp(a: &Self, b: &Self, t: f64) -> Option<Self> {
        Some(a.lerp(*b, t))
    }
}

impl StyleType for Offset {
    const FAMILY: TypeFamily = TypeFamily::Vector;
    const INTERPOLATABLE: bool = true;

    fn to_json(&self) -> Json {
        Json::from(vec![self.dx, self.dy])
    }

    fn from_json(json: &Json) -> Result<Self> {
        let components = json
            .as_array()
            .filter(|a| a.len() == 2)
            .ok_or_else(|| StyleError::malformed(format!("expected [dx, dy], got {}", json)))?;
        let dx = components[0]
            .as_f64()
            .ok_or_else(|| StyleError::malformed("non-numeric offset component"))?;
        let dy = components[1]
            .as_f64()
            .ok_or_else(|| StyleError::malformed("non-numeric offset component"))?;
        Ok(Offset::new(dx, dy))
    }

    fn from_attr(_value: &AttrValue) -> Option<Self> {
        None
    }

    fn lerp(a: &Self, b: &Self, t: f64) -> Option<Self> {
        Some(a.lerp(*b, t))
    }
}

impl StyleType for Alignment {
    const FAMILY: TypeFamily = TypeFamily::Enumeration;

    fn to_json(&self) -> Json {
        Json::from(self.as_str())
    }

    fn from_json(json: &Json) -> Result<Self> {
        json.as_str()
            .ok_or_else(|| StyleError::malformed(format!("expected an alignment, got {}", json)))?
            .parse()
    }

    fn from_attr(value: &AttrValue) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

/// A typed style value: a constant, or a function of zoom and/or data.
///
/// Immutable once constructed; changing a property means binding a whole new
/// value. Equality is structural.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue<T: StyleType> {
    Constant(T),
    Function(Function<T>),
}

impl<T: StyleType> StyleValue<T> {
    /// Wrap a constant.
    pub fn constant(value: impl Into<T>) -> Self {
        StyleValue::Constant(value.into())
    }

    /// Wrap a function.
    pub fn function(function: Function<T>) -> Self {
        StyleValue::Function(function)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, StyleValue::Constant(_))
    }

    /// The constant arm, or `TypeMismatch` if this value is a function.
    pub fn as_constant(&self) -> Result<&T> {
        match self {
            StyleValue::Constant(value) => Ok(value),
            StyleValue::Function(_) => Err(StyleError::TypeMismatch {
                expected: "constant value".to_string(),
                found: "function".to_string(),
            }),
        }
    }

    /// The function arm, or `TypeMismatch` if this value is a constant.
    pub fn as_function(&self) -> Result<&Function<T>> {
        match self {
            StyleValue::Function(function) => Ok(function),
            StyleValue::Constant(_) => Err(StyleError::TypeMismatch {
                expected: "function".to_string(),
                found: "constant value".to_string(),
            }),
        }
    }

    /// Evaluate at the given zoom against a feature's attributes.
    ///
    /// Constants evaluate to themselves; functions dispatch on their kind.
    pub fn evaluate(&self, zoom: f64, attributes: &Attributes) -> Result<T> {
        match self {
            StyleValue::Constant(value) => Ok(value.clone()),
            StyleValue::Function(function) => function.evaluate(zoom, attributes),
        }
    }

    /// Serialize into the style representation.
    pub fn to_json(&self) -> Json {
        crate::function::record::encode(self)
    }

    /// Reconstruct from the style representation.
    pub fn from_json(json: &Json) -> Result<Self> {
        crate::function::record::decode(json)
    }
}

impl<T: StyleType> From<Function<T>> for StyleValue<T> {
    fn from(function: Function<T>) -> Self {
        StyleValue::Function(function)
    }
}
