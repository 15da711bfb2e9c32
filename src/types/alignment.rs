//! Alignment enumeration for scale/rotation alignment properties.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StyleError};

/// Reference frame a property is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Aligned to the map plane; follows rotation and tilt.
    Map,
    /// Aligned to the viewport; fixed relative to the screen.
    Viewport,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Map => "map",
            Alignment::Viewport => "viewport",
        }
    }
}

impl FromStr for Alignment {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "map" => Ok(Alignment::Map),
            "viewport" => Ok(Alignment::Viewport),
            _ => Err(StyleError::MalformedRecord {
                message: format!("unknown alignment: '{}'", s),
                help: Some("expected 'map' or 'viewport'".to_string()),
            }),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for a in [Alignment::Map, Alignment::Viewport] {
            assert_eq!(a.as_str().parse::<Alignment>().unwrap(), a);
        }
        assert!("screen".parse::<Alignment>().is_err());
    }
}
