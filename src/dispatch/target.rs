//! Write targets and value sources, parsed once at the command boundary

use std::fmt;
use std::str::FromStr;

use crate::error::{P12Error, Result};

/// What a write applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every setting with this NRPN number
    Number(u16),
    /// Every setting in the named bank
    Bank(String),
    /// Every setting in the registry
    All,
}

impl FromStr for Target {
    type Err = P12Error;

    /// `all`, an NRPN number, or anything else as a bank name
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(P12Error::InvalidArgument {
                reason: "empty target".to_string(),
            });
        }
        if s == "all" {
            return Ok(Target::All);
        }
        match s.parse::<u16>() {
            Ok(number) => Ok(Target::Number(number)),
            Err(_) => Ok(Target::Bank(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Number(number) => write!(f, "NRPN number {}", number),
            Target::Bank(name) => write!(f, "bank '{}'", name),
            Target::All => write!(f, "all settings"),
        }
    }
}

/// Where the written value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueSource {
    Explicit(i64),
    /// Uniform draw from each setting's own range
    #[default]
    Random,
}

impl FromStr for ValueSource {
    type Err = P12Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "random" {
            return Ok(ValueSource::Random);
        }
        s.parse::<i64>()
            .map(ValueSource::Explicit)
            .map_err(|_| P12Error::InvalidArgument {
                reason: format!("value must be a number or 'random', got '{}'", s),
            })
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Explicit(value) => write!(f, "{}", value),
            ValueSource::Random => write!(f, "random"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("all", Target::All)]
    #[test_case("100", Target::Number(100))]
    #[test_case(" 287 ", Target::Number(287))]
    #[test_case("osc", Target::Bank("osc".to_string()))]
    #[test_case("-1", Target::Bank("-1".to_string()))]
    fn test_target_parse(input: &str, expected: Target) {
        assert_eq!(input.parse::<Target>().unwrap(), expected);
    }

    #[test]
    fn test_target_parse_empty() {
        assert!("  ".parse::<Target>().is_err());
    }

    #[test_case("random", ValueSource::Random)]
    #[test_case("64", ValueSource::Explicit(64))]
    #[test_case("-3", ValueSource::Explicit(-3))]
    fn test_value_source_parse(input: &str, expected: ValueSource) {
        assert_eq!(input.parse::<ValueSource>().unwrap(), expected);
    }

    #[test]
    fn test_value_source_parse_invalid() {
        assert!(matches!(
            "loud".parse::<ValueSource>(),
            Err(P12Error::InvalidArgument { .. })
        ));
    }
}
