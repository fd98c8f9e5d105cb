//! Equality-based label selectors.
//!
//! Supports the subset of the Kubernetes selector grammar the autoscaler
//! sends for pod selectors: `k=v`, `k==v`, `k!=v`, `k` (exists) and `!k`
//! (does not exist), joined by commas.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ProviderError, ProviderResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    NotExists(String),
}

impl Requirement {
    fn matches(&self, labels: &HashMap<String, String>) -> bool {
        match self {
            Self::Equals(k, v) => labels.get(k) == Some(v),
            Self::NotEquals(k, v) => labels.get(k) != Some(v),
            Self::Exists(k) => labels.contains_key(k),
            Self::NotExists(k) => !labels.contains_key(k),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(k, v) => write!(f, "{k}={v}"),
            Self::NotEquals(k, v) => write!(f, "{k}!={v}"),
            Self::Exists(k) => write!(f, "{k}"),
            Self::NotExists(k) => write!(f, "!{k}"),
        }
    }
}

/// A parsed label selector. The empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Selector that matches every object.
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> ProviderResult<Self> {
        let invalid = |reason: &str| ProviderError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let mut requirements = Vec::new();
        for term in input.split(',').map(str::trim) {
            if term.is_empty() {
                if input.trim().is_empty() {
                    continue;
                }
                return Err(invalid("empty requirement"));
            }

            let requirement = if let Some((k, v)) = term.split_once("!=") {
                Requirement::NotEquals(k.trim().to_string(), v.trim().to_string())
            } else if let Some((k, v)) = term.split_once("==") {
                Requirement::Equals(k.trim().to_string(), v.trim().to_string())
            } else if let Some((k, v)) = term.split_once('=') {
                Requirement::Equals(k.trim().to_string(), v.trim().to_string())
            } else if let Some(k) = term.strip_prefix('!') {
                Requirement::NotExists(k.trim().to_string())
            } else {
                Requirement::Exists(term.to_string())
            };

            let key = match &requirement {
                Requirement::Equals(k, _)
                | Requirement::NotEquals(k, _)
                | Requirement::Exists(k)
                | Requirement::NotExists(k) => k,
            };
            if key.is_empty() {
                return Err(invalid("missing label key"));
            }
            if key.contains(['=', '!', ' ']) {
                return Err(invalid("malformed label key"));
            }

            requirements.push(requirement);
        }

        Ok(Self { requirements })
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_selector_matches_everything() {
        let selector = LabelSelector::parse("").unwrap();
        assert!(selector.is_empty());
        assert!(selector.matches(&labels(&[])));
        assert!(selector.matches(&labels(&[("app", "web")])));
    }

    #[test]
    fn equality_requirements() {
        let selector = LabelSelector::parse("app=web,tier==front").unwrap();
        assert!(selector.matches(&labels(&[("app", "web"), ("tier", "front")])));
        assert!(!selector.matches(&labels(&[("app", "web")])));
        assert!(!selector.matches(&labels(&[("app", "db"), ("tier", "front")])));
    }

    #[test]
    fn inequality_requirement() {
        let selector = LabelSelector::parse("app!=db").unwrap();
        assert!(selector.matches(&labels(&[("app", "web")])));
        assert!(selector.matches(&labels(&[])));
        assert!(!selector.matches(&labels(&[("app", "db")])));
    }

    #[test]
    fn existence_requirements() {
        let selector = LabelSelector::parse("name, !canary").unwrap();
        assert!(selector.matches(&labels(&[("name", "x")])));
        assert!(!selector.matches(&labels(&[("name", "x"), ("canary", "true")])));
        assert!(!selector.matches(&labels(&[])));
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert!(LabelSelector::parse("=web").is_err());
        assert!(LabelSelector::parse("app=web,,tier=front").is_err());
        assert!(LabelSelector::parse("!").is_err());
        assert!(matches!(
            LabelSelector::parse("app=web,"),
            Err(ProviderError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn display_round_trips_canonical_form() {
        let selector = LabelSelector::parse("app==web, !canary,tier").unwrap();
        assert_eq!(selector.to_string(), "app=web,!canary,tier");
    }
}
