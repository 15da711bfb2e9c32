use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::Value as Json;

use crate::error::{Result, StyleError};
use crate::output::{plural, Printer};

use super::Family;

/// Validate value records without evaluating them
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Record files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Restrict validation to one value family
    #[arg(long, value_enum)]
    pub family: Option<Family>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let printer = Printer::new();
    let mut failures = 0usize;

    for file in &args.files {
        match validate_file(file, args.family) {
            Ok(families) => printer.status(
                "Validated",
                &format!("{} ({})", file.display(), families.join(", ")),
            ),
            Err(err) => {
                failures += 1;
                printer.error("Invalid", &format!("{}: {}", file.display(), err));
            }
        }
    }

    if failures > 0 {
        return Err(StyleError::malformed(format!(
            "{} failed validation",
            plural(failures, "record", "records")
        )));
    }
    printer.info(
        "Finished",
        &format!("{} valid", plural(args.files.len(), "record", "records")),
    );
    Ok(())
}

/// Decode one record file, returning the families it decodes under.
fn validate_file(path: &Path, family: Option<Family>) -> Result<Vec<&'static str>> {
    let source = fs::read_to_string(path)?;
    let record: Json = serde_json::from_str(&source)?;

    match family {
        Some(family) => {
            family.check(&record)?;
            Ok(vec![family.as_str()])
        }
        None => {
            let mut accepted = Vec::new();
            let mut last_err = None;
            for family in Family::ALL {
                match family.check(&record) {
                    Ok(()) => accepted.push(family.as_str()),
                    Err(err) => last_err = Some(err),
                }
            }
            if accepted.is_empty() {
                // every family rejected it; surface the last error
                Err(last_err
                    .unwrap_or_else(|| StyleError::malformed("record decodes under no family")))
            } else {
                Ok(accepted)
            }
        }
    }
}
