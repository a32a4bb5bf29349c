//! Replacement rule list: model, validation, mutation, persistence.
//!
//! The rule book is the sole unit of persisted state. Every structural
//! mutation re-derives the `order` field so it stays contiguous from 0;
//! no partially renumbered state is ever observable. Persistence is the
//! caller's job: mutations here only change in-memory state, and the CLI
//! saves after each successful one.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One literal-text replacement. An empty `replace_text` deletes
/// occurrences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementRule {
    /// Opaque identity, stable for the rule's lifetime.
    pub id: String,
    pub search_text: String,
    pub replace_text: String,
    pub is_enabled: bool,
    /// Application and display position, 0-based and contiguous.
    pub order: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("search text must not be empty")]
    EmptySearchText,
    #[error("a rule with search text '{0}' already exists")]
    DuplicateSearchText(String),
    #[error("no rule with id '{0}'")]
    UnknownRule(String),
    #[error("rule position {0} is out of range")]
    PositionOutOfRange(usize),
}

/// Ordered, mutable list of replacement rules.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    rules: Vec<ReplacementRule>,
}

impl RuleBook {
    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates and appends a new enabled rule at the end of the list.
    pub fn add(&mut self, search_text: &str, replace_text: &str) -> Result<String, RuleError> {
        let search_text = self.validate(search_text, None)?;
        let id = Uuid::new_v4().to_string();
        self.rules.push(ReplacementRule {
            id: id.clone(),
            search_text,
            replace_text: replace_text.to_string(),
            is_enabled: true,
            order: self.rules.len(),
        });
        Ok(id)
    }

    /// Rewrites an existing rule's texts; position and enabled state stay.
    pub fn update(
        &mut self,
        id: &str,
        search_text: &str,
        replace_text: &str,
    ) -> Result<(), RuleError> {
        let search_text = self.validate(search_text, Some(id))?;
        let rule = self.rule_mut(id)?;
        rule.search_text = search_text;
        rule.replace_text = replace_text.to_string();
        Ok(())
    }

    /// Deletes a rule and closes the gap in `order`.
    pub fn remove(&mut self, id: &str) -> Result<ReplacementRule, RuleError> {
        let position = self
            .rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or_else(|| RuleError::UnknownRule(id.to_string()))?;
        let removed = self.rules.remove(position);
        self.renumber();
        Ok(removed)
    }

    /// Flips one rule's enabled state; returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, RuleError> {
        let rule = self.rule_mut(id)?;
        rule.is_enabled = !rule.is_enabled;
        Ok(rule.is_enabled)
    }

    pub fn set_all_enabled(&mut self, enabled: bool) {
        for rule in &mut self.rules {
            rule.is_enabled = enabled;
        }
    }

    /// Moves the rule at position `from` to position `to`, renumbering.
    pub fn move_rule(&mut self, from: usize, to: usize) -> Result<(), RuleError> {
        if from >= self.rules.len() {
            return Err(RuleError::PositionOutOfRange(from));
        }
        if to >= self.rules.len() {
            return Err(RuleError::PositionOutOfRange(to));
        }
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        self.renumber();
        Ok(())
    }

    /// Replaces the whole list with nothing.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Trims the search text and rejects empty or duplicate values.
    /// Duplicate checks are case-sensitive exact matches and skip the rule
    /// identified by `exclude_id` so updates don't collide with themselves.
    fn validate(&self, search_text: &str, exclude_id: Option<&str>) -> Result<String, RuleError> {
        let trimmed = search_text.trim();
        if trimmed.is_empty() {
            return Err(RuleError::EmptySearchText);
        }
        let duplicate = self.rules.iter().any(|rule| {
            exclude_id.is_none_or(|id| rule.id != id) && rule.search_text == trimmed
        });
        if duplicate {
            return Err(RuleError::DuplicateSearchText(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    fn rule_mut(&mut self, id: &str) -> Result<&mut ReplacementRule, RuleError> {
        self.rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(|| RuleError::UnknownRule(id.to_string()))
    }

    fn renumber(&mut self) {
        for (position, rule) in self.rules.iter_mut().enumerate() {
            rule.order = position;
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating rules file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing rules JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening rules file {path:?}"))?;
        let reader = BufReader::new(file);
        let mut book: RuleBook =
            serde_json::from_reader(reader).context("Parsing rules JSON")?;
        // Hand-edited files may carry gaps or shuffled orders; restore the
        // contiguous-from-0 invariant before anything reads it.
        book.rules.sort_by_key(|rule| rule.order);
        book.renumber();
        Ok(book)
    }

    /// Like [`RuleBook::load`], but a missing file is an empty book.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
