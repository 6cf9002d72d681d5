//! Validation rules and their configuration form.

use crate::pattern::{matches_rule, PathPattern, PatternError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A predicate over a string leaf.
pub type CustomCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// RuleError is returned when a rule cannot be built from configuration.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("invalid regular expression {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule for {pattern:?} must set exactly one of startsWith, pattern, oneOf (found {found})")]
    Check { pattern: String, found: usize },
}

/// RuleCheck is the test a matching leaf must pass.
#[derive(Clone)]
pub enum RuleCheck {
    /// The value starts with at least one of the prefixes.
    StartsWith(Vec<String>),
    /// The regular expression matches somewhere in the value.
    Pattern(Regex),
    /// The value equals one of the listed strings.
    OneOf(Vec<String>),
    /// An arbitrary predicate supplied in code.
    Custom(CustomCheck),
}

impl RuleCheck {
    /// Wraps a closure as a custom check.
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        RuleCheck::Custom(Arc::new(check))
    }

    /// Returns true if `value` passes.
    pub fn check(&self, value: &str) -> bool {
        match self {
            RuleCheck::StartsWith(prefixes) => prefixes.iter().any(|p| value.starts_with(p.as_str())),
            RuleCheck::Pattern(re) => re.is_match(value),
            RuleCheck::OneOf(allowed) => allowed.iter().any(|a| a == value),
            RuleCheck::Custom(check) => check(value),
        }
    }
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::StartsWith(prefixes) => f.debug_tuple("StartsWith").field(prefixes).finish(),
            RuleCheck::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            RuleCheck::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
            RuleCheck::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// ValidationRule scopes a check to the leaves whose path ends with a pattern.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub match_pattern: PathPattern,
    pub message: String,
    pub check: RuleCheck,
}

impl ValidationRule {
    /// Creates a rule, compiling the match pattern.
    pub fn new(match_pattern: &str, message: impl Into<String>, check: RuleCheck) -> Result<Self, RuleError> {
        Ok(ValidationRule {
            match_pattern: PathPattern::compile(match_pattern)?,
            message: message.into(),
            check,
        })
    }

    /// Returns true if the rule applies to the leaf at `path`.
    pub fn applies_to(&self, path: &str) -> bool {
        matches_rule(path, &self.match_pattern)
    }

    /// Builds a rule from its configuration form.
    pub fn from_config(config: &ValidationRuleConfig) -> Result<Self, RuleError> {
        let check = config.rule.compile(&config.match_pattern)?;
        ValidationRule::new(&config.match_pattern, config.message.clone(), check)
    }
}

/// ValidationRuleConfig is a rule as written in the configuration file.
///
/// ```yaml
/// - match: "**.href"
///   message: "links must be https or site-relative"
///   rule:
///     pattern: "^(https://|/)"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRuleConfig {
    #[serde(rename = "match")]
    pub match_pattern: String,
    pub message: String,
    pub rule: RuleCheckConfig,
}

/// RuleCheckConfig holds exactly one of the configurable checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCheckConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<Prefixes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
}

/// One prefix or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prefixes {
    One(String),
    Many(Vec<String>),
}

impl Prefixes {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Prefixes::One(prefix) => vec![prefix],
            Prefixes::Many(prefixes) => prefixes,
        }
    }
}

impl RuleCheckConfig {
    /// Compiles the configured check. `match_pattern` is only used in errors.
    pub fn compile(&self, match_pattern: &str) -> Result<RuleCheck, RuleError> {
        let found = [
            self.starts_with.is_some(),
            self.pattern.is_some(),
            self.one_of.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if found != 1 {
            return Err(RuleError::Check {
                pattern: match_pattern.to_string(),
                found,
            });
        }

        if let Some(prefixes) = &self.starts_with {
            return Ok(RuleCheck::StartsWith(prefixes.clone().into_vec()));
        }
        if let Some(pattern) = &self.pattern {
            let re = Regex::new(pattern).map_err(|e| RuleError::Regex {
                pattern: pattern.clone(),
                source: e,
            })?;
            return Ok(RuleCheck::Pattern(re));
        }
        Ok(RuleCheck::OneOf(self.one_of.clone().unwrap_or_default()))
    }
}
