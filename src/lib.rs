//! stylefn - Typed style values and style functions for map layers
//!
//! A library for driving paintable layer properties from constants, zoom
//! level (camera functions), feature data (source functions), or both
//! (composite functions), with exponential, interval, categorical, and
//! identity interpolation over typed stop tables.

pub mod cli;
pub mod error;
pub mod function;
pub mod layer;
pub mod output;
pub mod types;
pub mod value;

pub use error::{Result, StyleError};
pub use function::{
    CameraFunction, CompositeFunction, Function, FunctionKind, FunctionOptions, IdentityFunction,
    InterpolationMode, SourceFunction, StopKey, StopTable,
};
pub use layer::{Layer, LayerKind, PropertySpec};
pub use types::{Alignment, AttrValue, Attributes, Colour, Offset};
pub use value::{StyleType, StyleValue, TypeFamily};
