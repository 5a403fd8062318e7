//! In-memory rule lookup.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use super::Rule;
use crate::error::{EngineError, Result};

/// Rules indexed by id.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
    by_id: HashMap<String, usize>,
}

impl RuleStore {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut store = Self::default();
        for rule in rules {
            store.insert(rule);
        }
        store
    }

    /// Parse a JSON array of rules, or a single rule object.
    ///
    /// Every rule must carry an id.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let rules = match value {
            serde_json::Value::Array(_) => serde_json::from_value::<Vec<Rule>>(value)?,
            _ => vec![serde_json::from_value::<Rule>(value)?],
        };

        if let Some(idx) = rules.iter().position(|rule| rule.id.is_empty()) {
            return Err(EngineError::RuleLoad(format!("rule {} has no id", idx)));
        }

        Ok(Self::new(rules))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        debug!("Loaded {} rules from {}", store.len(), path.display());
        Ok(store)
    }

    /// Insert a rule, replacing any rule with the same id.
    pub fn insert(&mut self, rule: Rule) {
        match self.by_id.get(&rule.id) {
            Some(&idx) => {
                warn!("Duplicate rule id {}, keeping the later definition", rule.id);
                self.rules[idx] = rule;
            }
            None => {
                self.by_id.insert(rule.id.clone(), self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<&Rule> {
        self.by_id
            .get(id)
            .map(|&idx| &self.rules[idx])
            .ok_or_else(|| EngineError::RuleNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
