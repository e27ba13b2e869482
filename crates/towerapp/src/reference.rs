//! User-supplied resource references.
//!
//! A reference is parsed exactly once, from the raw command-line value and, when that
//! is absent, from the defaults read out of the environment. Everything downstream
//! (the resolver, titles, error messages) works on the parsed [`Reference`].
//!
//! | Input          | Parsed as                         |
//! |----------------|-----------------------------------|
//! | `123`          | `NumericId(123)`                  |
//! | `acme/rnaseq`  | `NamePair { "acme", "rnaseq" }`   |
//! | `rnaseq`       | `Name("rnaseq")`                  |
//! | *(nothing)*    | `Unset`                           |

use crate::error::{Result, TowerError};
use std::fmt;
use std::str::FromStr;

/// Name the platform gives the caller's personal workspace.
pub const USER_WORKSPACE_NAME: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    NumericId(i64),
    NamePair {
        organization: String,
        resource: String,
    },
    Name(String),
    Unset,
}

impl Reference {
    /// Parses `raw`, falling back to each default in order when `raw` is absent or blank.
    pub fn parse(raw: Option<&str>, defaults: &[Option<&str>]) -> Result<Self> {
        let candidate = std::iter::once(raw)
            .chain(defaults.iter().copied())
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty());

        match candidate {
            Some(value) => value.parse(),
            None => Ok(Reference::Unset),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Reference::Unset)
    }
}

impl FromStr for Reference {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Reference::Unset);
        }

        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<i64>() {
                Ok(id) if id > 0 => Ok(Reference::NumericId(id)),
                _ => Err(TowerError::InvalidReference(s.to_string())),
            };
        }

        if let Some((org, resource)) = s.split_once('/') {
            let (org, resource) = (org.trim(), resource.trim());
            if org.is_empty() || resource.is_empty() {
                return Err(TowerError::InvalidReference(s.to_string()));
            }
            return Ok(Reference::NamePair {
                organization: org.to_string(),
                resource: resource.to_string(),
            });
        }

        Ok(Reference::Name(s.to_string()))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::NumericId(id) => write!(f, "{}", id),
            Reference::NamePair {
                organization,
                resource,
            } => write!(f, "{}/{}", organization, resource),
            Reference::Name(name) => write!(f, "{}", name),
            Reference::Unset => write!(f, "{}", USER_WORKSPACE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(
            "27736513644467".parse::<Reference>().unwrap(),
            Reference::NumericId(27736513644467)
        );
    }

    #[test]
    fn test_zero_is_not_a_valid_id() {
        assert!("0".parse::<Reference>().is_err());
    }

    #[test]
    fn test_overflowing_id_rejected() {
        assert!("99999999999999999999".parse::<Reference>().is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            "acme / rnaseq".parse::<Reference>().unwrap(),
            Reference::NamePair {
                organization: "acme".into(),
                resource: "rnaseq".into()
            }
        );
    }

    #[test]
    fn test_pair_with_missing_half_rejected() {
        assert!("acme/".parse::<Reference>().is_err());
        assert!("/rnaseq".parse::<Reference>().is_err());
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(
            "rnaseq-42".parse::<Reference>().unwrap(),
            Reference::Name("rnaseq-42".into())
        );
    }

    #[test]
    fn test_raw_value_wins_over_defaults() {
        let r = Reference::parse(Some("acme/ws"), &[Some("99")]).unwrap();
        assert_eq!(
            r,
            Reference::NamePair {
                organization: "acme".into(),
                resource: "ws".into()
            }
        );
    }

    #[test]
    fn test_defaults_used_in_order() {
        let r = Reference::parse(None, &[None, Some("acme/ws")]).unwrap();
        assert!(matches!(r, Reference::NamePair { .. }));

        let r = Reference::parse(Some("  "), &[Some("42"), Some("acme/ws")]).unwrap();
        assert_eq!(r, Reference::NumericId(42));
    }

    #[test]
    fn test_nothing_given_is_unset() {
        let r = Reference::parse(None, &[None, None]).unwrap();
        assert!(r.is_unset());
        assert_eq!(r.to_string(), USER_WORKSPACE_NAME);
    }
}
