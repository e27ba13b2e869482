//! Label set diffing.
//!
//! A label command computes the desired set from the resource's current labels and the
//! requested operation, diffs the two, then applies each change independently. A
//! change that fails is recorded in the [`LabelReport`] and the batch carries on; the
//! changes that went through are not rolled back.

use crate::error::{Result, TowerError};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Unique label names. Case-sensitive.
pub type LabelSet = BTreeSet<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDiff {
    pub to_add: LabelSet,
    pub to_remove: LabelSet,
}

impl LabelDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

pub fn diff(desired: &LabelSet, current: &LabelSet) -> LabelDiff {
    LabelDiff {
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(desired).cloned().collect(),
    }
}

/// Splits `prod,rna` style arguments into a set, dropping blanks.
pub fn parse_labels<S: AsRef<str>>(raw: &[S]) -> LabelSet {
    raw.iter()
        .flat_map(|s| s.as_ref().split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelOperation {
    #[default]
    Set,
    Add,
    Remove,
}

impl LabelOperation {
    /// The label set the resource should end up with.
    pub fn desired(&self, current: &LabelSet, requested: &LabelSet) -> LabelSet {
        match self {
            LabelOperation::Set => requested.clone(),
            LabelOperation::Add => current.union(requested).cloned().collect(),
            LabelOperation::Remove => current.difference(requested).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelChange {
    Add,
    Remove,
}

impl LabelChange {
    pub fn verb(&self) -> &'static str {
        match self {
            LabelChange::Add => "add",
            LabelChange::Remove => "remove",
        }
    }
}

/// A single label change the platform refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFailure {
    pub label: String,
    pub operation: LabelChange,
    pub message: String,
}

impl LabelFailure {
    pub fn warning(&self) -> String {
        format!(
            "Could not {} label '{}': {}",
            self.operation.verb(),
            self.label,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub failures: Vec<LabelFailure>,
}

impl LabelReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Attaches every label in `to_add` and detaches every label in `to_remove`.
pub fn apply<A, D>(diff: &LabelDiff, mut attach: A, mut detach: D) -> LabelReport
where
    A: FnMut(&str) -> Result<()>,
    D: FnMut(&str) -> Result<()>,
{
    let mut report = LabelReport::default();

    for label in &diff.to_add {
        match attach(label) {
            Ok(()) => report.added.push(label.clone()),
            Err(err) => report.failures.push(failure(label, LabelChange::Add, err)),
        }
    }

    for label in &diff.to_remove {
        match detach(label) {
            Ok(()) => report.removed.push(label.clone()),
            Err(err) => report.failures.push(failure(label, LabelChange::Remove, err)),
        }
    }

    report
}

fn failure(label: &str, operation: LabelChange, err: TowerError) -> LabelFailure {
    warn!(label, operation = operation.verb(), error = %err, "label change failed");
    LabelFailure {
        label: label.to_string(),
        operation,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> LabelSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff() {
        let d = diff(&set(&["a", "b"]), &set(&["b", "c"]));
        assert_eq!(d.to_add, set(&["a"]));
        assert_eq!(d.to_remove, set(&["c"]));
    }

    #[test]
    fn test_diff_is_case_sensitive() {
        let d = diff(&set(&["Prod"]), &set(&["prod"]));
        assert_eq!(d.to_add, set(&["Prod"]));
        assert_eq!(d.to_remove, set(&["prod"]));
    }

    #[test]
    fn test_identical_sets_have_empty_diff() {
        assert!(diff(&set(&["x", "y"]), &set(&["y", "x"])).is_empty());
    }

    #[test]
    fn test_operations() {
        let current = set(&["a", "b"]);
        let requested = set(&["b", "c"]);
        assert_eq!(LabelOperation::Set.desired(&current, &requested), set(&["b", "c"]));
        assert_eq!(
            LabelOperation::Add.desired(&current, &requested),
            set(&["a", "b", "c"])
        );
        assert_eq!(LabelOperation::Remove.desired(&current, &requested), set(&["a"]));
    }

    #[test]
    fn test_parse_labels_splits_commas() {
        assert_eq!(parse_labels(&["prod, rna", "", "prod"]), set(&["prod", "rna"]));
    }

    #[test]
    fn test_apply_collects_failures_and_continues() {
        let d = diff(&set(&["a", "b"]), &set(&["c"]));
        let mut attached = Vec::new();
        let report = apply(
            &d,
            |label| {
                if label == "a" {
                    Err(TowerError::Api {
                        status: 500,
                        message: "boom".into(),
                    })
                } else {
                    attached.push(label.to_string());
                    Ok(())
                }
            },
            |_| Ok(()),
        );
        assert_eq!(attached, vec!["b"]);
        assert_eq!(report.added, vec!["b"]);
        assert_eq!(report.removed, vec!["c"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, "a");
        assert_eq!(report.failures[0].operation, LabelChange::Add);
        assert_eq!(
            report.failures[0].warning(),
            "Could not add label 'a': API error 500: boom"
        );
    }

    #[test]
    fn test_apply_empty_diff_touches_nothing() {
        let mut calls = 0;
        let report = apply(
            &LabelDiff::default(),
            |_| {
                calls += 1;
                Ok(())
            },
            |_| Ok(()),
        );
        assert_eq!(calls, 0);
        assert!(report.is_clean());
    }
}
