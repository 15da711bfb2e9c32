use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde_json::Value as Json;

use crate::error::{Result, StyleError};
use crate::output::Printer;
use crate::types::{Alignment, AttrValue, Attributes, Colour, Offset};
use crate::value::{StyleType, StyleValue};

use super::Family;

/// Evaluate a value record at a zoom level against feature attributes
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Record file to evaluate (JSON)
    pub file: PathBuf,

    /// Value family of the record
    #[arg(long, value_enum)]
    pub family: Family,

    /// Zoom level to evaluate at
    #[arg(long, default_value_t = 0.0)]
    pub zoom: f64,

    /// Feature attributes, repeatable
    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,
}

pub fn run(args: EvalArgs) -> Result<()> {
    let source = fs::read_to_string(&args.file)?;
    let record: Json = serde_json::from_str(&source)?;
    let attributes = parse_attributes(&args.attrs)?;

    let result = match args.family {
        Family::Number => evaluate::<f64>(&record, args.zoom, &attributes)?,
        Family::Boolean => evaluate::<bool>(&record, args.zoom, &attributes)?,
        Family::String => evaluate::<String>(&record, args.zoom, &attributes)?,
        Family::Color => evaluate::<Colour>(&record, args.zoom, &attributes)?,
        Family::Vector => evaluate::<Offset>(&record, args.zoom, &attributes)?,
        Family::Enumeration => evaluate::<Alignment>(&record, args.zoom, &attributes)?,
    };

    let printer = Printer::new();
    printer.status(
        "Evaluated",
        &format!("{} at zoom {}", args.file.display(), args.zoom),
    );
    println!("{}", result);
    Ok(())
}

fn evaluate<T: StyleType>(record: &Json, zoom: f64, attributes: &Attributes) -> Result<Json> {
    let value = StyleValue::<T>::from_json(record)?;
    Ok(value.evaluate(zoom, attributes)?.to_json())
}

/// Parse repeated `key=value` pairs. Values that read as booleans or numbers
/// become typed attributes; anything else stays a string.
fn parse_attributes(pairs: &[String]) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            StyleError::malformed(format!("attribute '{}' is not a KEY=VALUE pair", pair))
        })?;
        let value = if let Ok(b) = value.parse::<bool>() {
            AttrValue::Bool(b)
        } else if let Ok(n) = value.parse::<f64>() {
            AttrValue::Number(n)
        } else {
            AttrValue::String(value.to_string())
        };
        attributes.insert(key.to_string(), value);
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(&[
            "temp=30".to_string(),
            "kind=park".to_string(),
            "fuzzy=true".to_string(),
        ])
        .unwrap();
        assert_eq!(attrs.get("temp"), Some(&AttrValue::Number(30.0)));
        assert_eq!(attrs.get("kind"), Some(&AttrValue::String("park".to_string())));
        assert_eq!(attrs.get("fuzzy"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_parse_attributes_rejects_bare_keys() {
        assert!(parse_attributes(&["temp".to_string()]).is_err());
    }

    #[test]
    fn test_run_evaluates_record_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "categorical", "property": "kind",
                "stops": [["park", 4.0]], "default": 1.0, "base": null}}"#
        )
        .unwrap();

        let args = EvalArgs {
            file: file.path().to_path_buf(),
            family: Family::Number,
            zoom: 12.0,
            attrs: vec!["kind=park".to_string()],
        };
        run(args).unwrap();
    }

    #[test]
    fn test_run_rejects_malformed_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "identity", "stops": [[0, 1.0]]}}"#).unwrap();

        let args = EvalArgs {
            file: file.path().to_path_buf(),
            family: Family::Number,
            zoom: 0.0,
            attrs: vec![],
        };
        assert!(run(args).is_err());
    }
}
