//! Ordered rule table matched against the path remainder.
//!
//! # Responsibilities
//! - Hold `(pattern, label)` pairs in evaluation order
//! - Evaluate rules in order, tracing every evaluation
//! - Report the first matching rule
//!
//! # Design Decisions
//! - Narrowing accepted paths is a data change (config), not a code change
//! - First match wins
//! - The shipped table starts with a match-everything rule

use regex::Regex;

use crate::config::RuleConfig;

/// A compiled routing rule.
#[derive(Debug, Clone)]
pub struct Rule {
    label: String,
    pattern: Regex,
}

impl Rule {
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, remainder: &str) -> bool {
        self.pattern.is_match(remainder)
    }
}

/// Rules evaluated in order against the path after the prefix.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile rules from configuration, preserving order.
    pub fn compile(configs: &[RuleConfig]) -> Result<Self, regex::Error> {
        let rules = configs
            .iter()
            .map(|c| Rule::new(c.label.clone(), &c.pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Label of the first rule matching `remainder`.
    pub fn first_match(&self, remainder: &str) -> Option<&str> {
        tracing::debug!(path = %remainder, "Checking path against routing rules");
        for (index, rule) in self.rules.iter().enumerate() {
            let matched = rule.matches(remainder);
            tracing::debug!(
                index,
                label = %rule.label,
                pattern = %rule.pattern.as_str(),
                matched,
                "Rule evaluated"
            );
            if matched {
                return Some(rule.label());
            }
        }
        None
    }

    pub fn matches_any(&self, remainder: &str) -> bool {
        self.first_match(remainder).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
