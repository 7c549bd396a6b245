//! Custom alert rules and their ordered collection

use serde::{Deserialize, Serialize};

/// A configured audio cue: `beep_count` pips when the countdown reaches
/// `trigger_second` remaining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: u64,
    pub trigger_second: u64,
    pub beep_count: u32,
}

/// Ordered collection of alert rules
///
/// The list is kept sorted by descending trigger second (stable, so rules
/// sharing a trigger keep insertion order). Dispatch fires the first match
/// in this stored order.
#[derive(Debug, Clone)]
pub struct AlertSet {
    rules: Vec<AlertRule>,
    next_id: u64,
}

impl AlertSet {
    /// Create an empty alert set
    pub fn new() -> Self {
        Self { rules: Vec::new(), next_id: 1 }
    }

    /// Create an alert set with the stock rules: one beep at 30s remaining,
    /// two beeps at 15s remaining
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        set.add(30, 1);
        set.add(15, 2);
        set
    }

    /// Insert a new rule and return it
    ///
    /// Duplicate trigger seconds are permitted; the caller validates that
    /// both values are positive.
    pub fn add(&mut self, trigger_second: u64, beep_count: u32) -> AlertRule {
        let rule = AlertRule {
            id: self.next_id,
            trigger_second,
            beep_count,
        };
        self.next_id += 1;
        self.rules.push(rule.clone());
        self.rules.sort_by(|a, b| b.trigger_second.cmp(&a.trigger_second));
        rule
    }

    /// Delete the rule with the given id; absent ids are a no-op
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        self.rules.len() != before
    }

    /// All rules in stored (descending trigger) order
    pub fn list(&self) -> &[AlertRule] {
        &self.rules
    }

    /// The rule dispatched at `second` remaining, if any
    pub fn first_match(&self, second: u64) -> Option<&AlertRule> {
        self.rules.iter().find(|rule| rule.trigger_second == second)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for AlertSet {
    fn default() -> Self {
        Self::new()
    }
}
