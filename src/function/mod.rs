//! Style functions: zoom- and data-driven property values.
//!
//! A function computes a property value from the camera zoom, a feature
//! attribute, or both. Four kinds exist:
//! - `Camera` - stops keyed by zoom; ignores feature data
//! - `Source` - stops keyed by a feature attribute; ignores zoom
//! - `Composite` - zoom-keyed outer stops over attribute-keyed inner stops
//! - `Identity` - passes the attribute's raw value through, coerced
//!
//! Invariants (an attribute name iff the kind reads feature data, an
//! interpolation base only with exponential mode, non-empty numeric-keyed
//! tables for the ordered modes) are enforced at construction, so
//! `evaluate` can only fail with `MissingAttribute` or `NoMatchingStop`.

mod interpolate;
pub(crate) mod record;
mod stops;

pub use stops::{StopKey, StopTable};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StyleError};
use crate::types::{AttrValue, Attributes};
use crate::value::StyleType;

/// How outputs are derived from a stop table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Blend between bracketing stops with exponential easing.
    Exponential,
    /// Step function: the greatest stop at or below the input.
    Interval,
    /// Exact key match.
    Categorical,
    /// No stops; the attribute value itself is the output.
    Identity,
}

impl InterpolationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterpolationMode::Exponential => "exponential",
            InterpolationMode::Interval => "interval",
            InterpolationMode::Categorical => "categorical",
            InterpolationMode::Identity => "identity",
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which inputs a function reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Camera,
    Source,
    Composite,
    Identity,
}

impl FunctionKind {
    /// Whether evaluation reads feature data.
    pub fn is_data_driven(self) -> bool {
        !matches!(self, FunctionKind::Camera)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionKind::Camera => "camera",
            FunctionKind::Source => "source",
            FunctionKind::Composite => "composite",
            FunctionKind::Identity => "identity",
        };
        f.write_str(name)
    }
}

/// Optional function configuration: interpolation base and default value.
///
/// Replaces a nullable options bag; both fields validate at function
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionOptions<T: StyleType> {
    pub interpolation_base: Option<f64>,
    pub default_value: Option<T>,
}

impl<T: StyleType> FunctionOptions<T> {
    pub fn new() -> Self {
        Self {
            interpolation_base: None,
            default_value: None,
        }
    }

    /// Set the exponential easing base.
    pub fn base(mut self, base: f64) -> Self {
        self.interpolation_base = Some(base);
        self
    }

    /// Set the fallback value for missing attributes and failed matches.
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl<T: StyleType> Default for FunctionOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A zoom-driven function.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFunction<T: StyleType> {
    pub mode: InterpolationMode,
    pub stops: StopTable<T>,
    pub base: Option<f64>,
}

/// A data-driven function over one feature attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFunction<T: StyleType> {
    pub mode: InterpolationMode,
    pub attribute: String,
    pub stops: StopTable<T>,
    pub base: Option<f64>,
    pub default: Option<T>,
}

/// A zoom-and-data-driven function with two-level stops.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFunction<T: StyleType> {
    pub mode: InterpolationMode,
    pub attribute: String,
    pub stops: StopTable<StopTable<T>>,
    pub base: Option<f64>,
    pub default: Option<T>,
}

/// A pass-through of one feature attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityFunction<T: StyleType> {
    pub attribute: String,
    pub default: Option<T>,
}

/// A style function of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Function<T: StyleType> {
    Camera(CameraFunction<T>),
    Source(SourceFunction<T>),
    Composite(CompositeFunction<T>),
    Identity(IdentityFunction<T>),
}

impl<T: StyleType> Function<T> {
    /// Build a camera function. Zoom keys must be numeric; a default value
    /// is rejected because camera evaluation never consults one.
    pub fn camera(
        mode: InterpolationMode,
        stops: StopTable<T>,
        options: FunctionOptions<T>,
    ) -> Result<Self> {
        if options.default_value.is_some() {
            return Err(StyleError::malformed(
                "camera functions cannot carry a default value",
            ));
        }
        let base = check_mode::<T>(mode, options.interpolation_base)?;
        check_stops(mode, &stops, StopDomain::Zoom)?;
        Ok(Function::Camera(CameraFunction { mode, stops, base }))
    }

    /// Build a source function over `attribute`.
    pub fn source(
        mode: InterpolationMode,
        attribute: impl Into<String>,
        stops: StopTable<T>,
        options: FunctionOptions<T>,
    ) -> Result<Self> {
        let base = check_mode::<T>(mode, options.interpolation_base)?;
        check_stops(mode, &stops, StopDomain::Attribute)?;
        Ok(Function::Source(SourceFunction {
            mode,
            attribute: attribute.into(),
            stops,
            base,
            default: options.default_value,
        }))
    }

    /// Build a composite function: zoom-keyed outer stops whose values are
    /// attribute-keyed inner tables.
    pub fn composite(
        mode: InterpolationMode,
        attribute: impl Into<String>,
        stops: StopTable<StopTable<T>>,
        options: FunctionOptions<T>,
    ) -> Result<Self> {
        let base = check_mode::<T>(mode, options.interpolation_base)?;
        if stops.is_empty() {
            return Err(StyleError::malformed(
                "composite function requires at least one zoom stop",
            ));
        }
        if !stops.all_numeric() {
            return Err(StyleError::malformed(
                "composite zoom stop keys must be numeric",
            ));
        }
        for (_, inner) in stops.iter() {
            check_stops(mode, inner, StopDomain::Attribute)?;
        }
        Ok(Function::Composite(CompositeFunction {
            mode,
            attribute: attribute.into(),
            stops,
            base,
            default: options.default_value,
        }))
    }

    /// Build an identity function over `attribute`.
    pub fn identity(attribute: impl Into<String>, options: FunctionOptions<T>) -> Result<Self> {
        if options.interpolation_base.is_some() {
            return Err(StyleError::malformed(
                "identity functions cannot carry an interpolation base",
            ));
        }
        Ok(Function::Identity(IdentityFunction {
            attribute: attribute.into(),
            default: options.default_value,
        }))
    }

    pub fn kind(&self) -> FunctionKind {
        match self {
            Function::Camera(_) => FunctionKind::Camera,
            Function::Source(_) => FunctionKind::Source,
            Function::Composite(_) => FunctionKind::Composite,
            Function::Identity(_) => FunctionKind::Identity,
        }
    }

    pub fn mode(&self) -> InterpolationMode {
        match self {
            Function::Camera(f) => f.mode,
            Function::Source(f) => f.mode,
            Function::Composite(f) => f.mode,
            Function::Identity(_) => InterpolationMode::Identity,
        }
    }

    /// The attribute this function reads, absent for camera functions.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Function::Camera(_) => None,
            Function::Source(f) => Some(&f.attribute),
            Function::Composite(f) => Some(&f.attribute),
            Function::Identity(f) => Some(&f.attribute),
        }
    }

    pub fn interpolation_base(&self) -> Option<f64> {
        match self {
            Function::Camera(f) => f.base,
            Function::Source(f) => f.base,
            Function::Composite(f) => f.base,
            Function::Identity(_) => None,
        }
    }

    pub fn default_value(&self) -> Option<&T> {
        match self {
            Function::Camera(_) => None,
            Function::Source(f) => f.default.as_ref(),
            Function::Composite(f) => f.default.as_ref(),
            Function::Identity(f) => f.default.as_ref(),
        }
    }

    /// Evaluate at `zoom` against a feature's attributes.
    ///
    /// Pure: no shared state is touched and cost is O(log n) in the stop
    /// count, so this is safe to call once per feature per frame.
    pub fn evaluate(&self, zoom: f64, attributes: &Attributes) -> Result<T> {
        match self {
            Function::Camera(f) => evaluate_camera(f, zoom),
            Function::Source(f) => match attributes.get(&f.attribute) {
                Some(attr) => match_stops(&f.stops, f.mode, f.base, attr, f.default.as_ref()),
                None => missing_attribute(&f.attribute, f.default.as_ref()),
            },
            Function::Composite(f) => match attributes.get(&f.attribute) {
                Some(attr) => evaluate_composite(f, zoom, attr),
                None => missing_attribute(&f.attribute, f.default.as_ref()),
            },
            Function::Identity(f) => match attributes.get(&f.attribute).and_then(T::from_attr) {
                Some(value) => Ok(value),
                None => missing_attribute(&f.attribute, f.default.as_ref()),
            },
        }
    }
}

enum StopDomain {
    Zoom,
    Attribute,
}

/// Mode-level invariants: the base goes with exponential only, exponential
/// needs an interpolatable output type, and the identity mode never pairs
/// with a stop table.
fn check_mode<T: StyleType>(mode: InterpolationMode, base: Option<f64>) -> Result<Option<f64>> {
    if mode == InterpolationMode::Identity {
        return Err(StyleError::malformed(
            "identity mode takes no stops; construct an identity function instead",
        ));
    }
    if mode == InterpolationMode::Exponential && !T::INTERPOLATABLE {
        return Err(StyleError::TypeMismatch {
            expected: "an interpolatable type".to_string(),
            found: format!("{} values", T::FAMILY),
        });
    }
    if let Some(base) = base {
        if mode != InterpolationMode::Exponential {
            return Err(StyleError::malformed(format!(
                "interpolation base is not meaningful for {} functions",
                mode
            )));
        }
        if !base.is_finite() || base <= 0.0 {
            return Err(StyleError::malformed(format!(
                "interpolation base must be a positive finite number, got {}",
                base
            )));
        }
    }
    Ok(base)
}

fn check_stops<V>(mode: InterpolationMode, stops: &StopTable<V>, domain: StopDomain) -> Result<()> {
    if stops.is_empty() {
        return Err(StyleError::malformed(format!(
            "a {} function requires at least one stop",
            mode
        )));
    }
    let ordered = matches!(
        mode,
        InterpolationMode::Exponential | InterpolationMode::Interval
    );
    match domain {
        StopDomain::Zoom => {
            if !stops.all_numeric() {
                return Err(StyleError::malformed("zoom stop keys must be numeric"));
            }
        }
        StopDomain::Attribute => {
            if ordered && !stops.all_numeric() {
                return Err(StyleError::malformed(format!(
                    "{} interpolation requires numeric stop keys",
                    mode
                )));
            }
        }
    }
    Ok(())
}

fn missing_attribute<T: StyleType>(attribute: &str, default: Option<&T>) -> Result<T> {
    default.cloned().ok_or_else(|| StyleError::MissingAttribute {
        attribute: attribute.to_string(),
    })
}

fn evaluate_camera<T: StyleType>(f: &CameraFunction<T>, zoom: f64) -> Result<T> {
    match f.mode {
        InterpolationMode::Exponential => {
            interpolate::exponential(&f.stops, zoom, f.base.unwrap_or(1.0))
        }
        InterpolationMode::Interval => interpolate::interval(&f.stops, zoom)
            .cloned()
            .ok_or_else(|| StyleError::malformed("camera function has no zoom stops")),
        InterpolationMode::Categorical => f
            .stops
            .get(&StopKey::Number(zoom))
            .cloned()
            .ok_or_else(|| StyleError::NoMatchingStop {
                input: format!("zoom {}", zoom),
            }),
        // ruled out at construction
        InterpolationMode::Identity => {
            Err(StyleError::malformed("camera function in identity mode"))
        }
    }
}

/// Match a feature attribute against a flat stop table.
///
/// Used directly by source functions and per bracket end by composite
/// functions. A miss (no matching key, or a non-numeric attribute under an
/// ordered mode) falls back to the default.
fn match_stops<T: StyleType>(
    stops: &StopTable<T>,
    mode: InterpolationMode,
    base: Option<f64>,
    attr: &AttrValue,
    default: Option<&T>,
) -> Result<T> {
    let matched = match mode {
        InterpolationMode::Categorical => stops.get(&StopKey::from(attr)).cloned(),
        InterpolationMode::Exponential => match attr.as_number() {
            Some(x) => Some(interpolate::exponential(stops, x, base.unwrap_or(1.0))?),
            None => None,
        },
        InterpolationMode::Interval => attr
            .as_number()
            .and_then(|x| interpolate::interval(stops, x).cloned()),
        InterpolationMode::Identity => None,
    };
    match matched {
        Some(value) => Ok(value),
        None => default.cloned().ok_or_else(|| StyleError::NoMatchingStop {
            input: attr.to_string(),
        }),
    }
}

/// Composite evaluation: bracket the zoom, evaluate the inner table at each
/// bracket end, then blend (exponential) or hold the lower end (interval,
/// categorical).
fn evaluate_composite<T: StyleType>(
    f: &CompositeFunction<T>,
    zoom: f64,
    attr: &AttrValue,
) -> Result<T> {
    let default = f.default.as_ref();
    match interpolate::bracket(&f.stops, zoom) {
        None => Err(StyleError::malformed("composite function has no zoom stops")),
        Some(interpolate::Bracket::Single(inner)) => {
            match_stops(inner, f.mode, f.base, attr, default)
        }
        Some(interpolate::Bracket::Span {
            lo_key,
            lo,
            hi_key,
            hi,
        }) => {
            let below = match_stops(lo, f.mode, f.base, attr, default)?;
            if f.mode == InterpolationMode::Exponential {
                let above = match_stops(hi, f.mode, f.base, attr, default)?;
                let t = interpolate::factor(zoom, lo_key, hi_key, f.base.unwrap_or(1.0));
                interpolate::blend(&below, &above, t)
            } else {
                Ok(below)
            }
        }
    }
}
