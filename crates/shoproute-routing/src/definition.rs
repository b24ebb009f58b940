//! Route definition records as stored in per-shop route tables
//!
//! A route table is an ordered list of records, each carrying either one
//! language-agnostic `pattern` or a per-language `patterns` map, plus the
//! target handler and action and optional static parameters. Declaration
//! order is evaluation order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use shoproute_core::{Error, Result};

/// One routing rule from a shop's route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDefinition {
    /// Single pattern valid for all languages (wrapped with an optional
    /// language prefix at compile time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Per-language pattern map; the default language's pattern is
    /// compiled unprefixed, all others get a `{lang}/` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<BTreeMap<String, String>>,

    /// Target handler name.
    pub handler: String,

    /// Target action name.
    pub action: String,

    /// Static extra parameters merged under the captured ones.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

impl RouteDefinition {
    /// Rule with one language-agnostic pattern.
    pub fn single(
        pattern: impl Into<String>,
        handler: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            pattern: Some(pattern.into()),
            patterns: None,
            handler: handler.into(),
            action: action.into(),
            params: HashMap::new(),
        }
    }

    /// Rule with per-language patterns.
    pub fn per_language<I, L, P>(
        patterns: I,
        handler: impl Into<String>,
        action: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: Into<String>,
    {
        Self {
            pattern: None,
            patterns: Some(
                patterns
                    .into_iter()
                    .map(|(l, p)| (l.into(), p.into()))
                    .collect(),
            ),
            handler: handler.into(),
            action: action.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Structural validation: exactly one pattern source, non-empty.
    pub fn validate(&self) -> Result<()> {
        match (&self.pattern, &self.patterns) {
            (Some(_), Some(_)) => Err(Error::Config(format!(
                "route to {}:{} has both 'pattern' and 'patterns'",
                self.handler, self.action
            ))),
            (None, None) => Err(Error::Config(format!(
                "route to {}:{} has neither 'pattern' nor 'patterns'",
                self.handler, self.action
            ))),
            (None, Some(patterns)) if patterns.is_empty() => Err(Error::Config(format!(
                "route to {}:{} has an empty 'patterns' map",
                self.handler, self.action
            ))),
            _ => Ok(()),
        }
    }
}

/// Deserialize a raw route table (as returned by a `RouteStore`) into an
/// ordered definition list, validating each record.
pub fn parse_route_table(value: &serde_json::Value) -> Result<Vec<RouteDefinition>> {
    if !value.is_array() {
        return Err(Error::Config(
            "route table must be a list of route definitions".to_string(),
        ));
    }

    let definitions: Vec<RouteDefinition> = serde_json::from_value(value.clone())
        .map_err(|e| Error::Config(format!("invalid route table: {}", e)))?;

    for definition in &definitions {
        definition.validate()?;
    }

    Ok(definitions)
}
