pub mod completions;
pub mod eval;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as Json;

use crate::error::Result;
use crate::value::TypeFamily;

/// stylefn - typed style values and style functions for map layers
#[derive(Parser, Debug)]
#[command(name = "stylefn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a value record at a zoom level against feature attributes
    Eval(eval::EvalArgs),

    /// Validate value records without evaluating them
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Value family a record is decoded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Family {
    Number,
    Boolean,
    String,
    Color,
    Vector,
    Enumeration,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::Number,
        Family::Boolean,
        Family::String,
        Family::Color,
        Family::Vector,
        Family::Enumeration,
    ];

    pub fn family(self) -> TypeFamily {
        match self {
            Family::Number => TypeFamily::Number,
            Family::Boolean => TypeFamily::Boolean,
            Family::String => TypeFamily::String,
            Family::Color => TypeFamily::Color,
            Family::Vector => TypeFamily::Vector,
            Family::Enumeration => TypeFamily::Enumeration,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Number => "number",
            Family::Boolean => "boolean",
            Family::String => "string",
            Family::Color => "color",
            Family::Vector => "vector",
            Family::Enumeration => "enumeration",
        }
    }

    /// Decode a record under this family, discarding the value.
    pub(crate) fn check(self, json: &Json) -> Result<()> {
        self.family().check_record(json)
    }
}
