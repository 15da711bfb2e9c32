//! Per-kind property registries.
//!
//! Each layer kind declares the paint and layout properties it understands:
//! the slot's type family, whether data-driven functions may drive it, and
//! its default value in the serialized style representation.

use crate::value::TypeFamily;

/// Declaration of one named property slot.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    pub name: &'static str,
    pub family: TypeFamily,
    /// Whether source, composite, and identity functions may drive the slot.
    pub data_driven: bool,
    /// Default value, as JSON in the style representation.
    pub default: &'static str,
}

impl PropertySpec {
    const fn new(
        name: &'static str,
        family: TypeFamily,
        data_driven: bool,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            family,
            data_driven,
            default,
        }
    }
}

pub(super) const CIRCLE: &[PropertySpec] = &[
    PropertySpec::new("circle-radius", TypeFamily::Number, true, "5"),
    PropertySpec::new("circle-color", TypeFamily::Color, true, "\"#000000\""),
    PropertySpec::new("circle-blur", TypeFamily::Number, true, "0"),
    PropertySpec::new("circle-opacity", TypeFamily::Number, true, "1"),
    PropertySpec::new("circle-translation", TypeFamily::Vector, false, "[0, 0]"),
    PropertySpec::new(
        "circle-scale-alignment",
        TypeFamily::Enumeration,
        false,
        "\"map\"",
    ),
];

pub(super) const SYMBOL: &[PropertySpec] = &[
    PropertySpec::new("icon-allow-overlap", TypeFamily::Boolean, false, "false"),
    PropertySpec::new("icon-halo-width", TypeFamily::Number, true, "0"),
    PropertySpec::new("text-field", TypeFamily::String, true, "\"\""),
    PropertySpec::new("text-size", TypeFamily::Number, true, "16"),
    PropertySpec::new("text-color", TypeFamily::Color, true, "\"#000000\""),
];

pub(super) const LINE: &[PropertySpec] = &[
    PropertySpec::new("line-color", TypeFamily::Color, true, "\"#000000\""),
    PropertySpec::new("line-width", TypeFamily::Number, true, "1"),
    PropertySpec::new("line-opacity", TypeFamily::Number, true, "1"),
    PropertySpec::new("line-translation", TypeFamily::Vector, false, "[0, 0]"),
];

pub(super) const FILL: &[PropertySpec] = &[
    PropertySpec::new("fill-color", TypeFamily::Color, true, "\"#000000\""),
    PropertySpec::new("fill-opacity", TypeFamily::Number, true, "1"),
    PropertySpec::new(
        "fill-outline-color",
        TypeFamily::Color,
        true,
        "\"#000000\"",
    ),
    PropertySpec::new("fill-antialias", TypeFamily::Boolean, false, "true"),
    PropertySpec::new("fill-translation", TypeFamily::Vector, false, "[0, 0]"),
];
