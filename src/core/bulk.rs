//! Reconciliation of `/bulk/*` responses against the requested ids.

use crate::core::alert::{plural, Alert};
use crate::domain::model::BulkResponse;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub const SUCCESS_MARKER: &str = "SUCCESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl BulkAction {
    pub fn verb(self) -> &'static str {
        match self {
            BulkAction::Start => "start",
            BulkAction::Stop => "stop",
            BulkAction::Restart => "restart",
            BulkAction::Enable => "enable",
            BulkAction::Disable => "disable",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "lowercase")]
pub enum BulkOutcome {
    Succeeded,
    Failed(String),
    /// Requested but absent from the response.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItem {
    pub system_id: String,
    #[serde(flatten)]
    pub outcome: BulkOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub action: BulkAction,
    /// In request order.
    pub items: Vec<BulkItem>,
    /// Ids the backend answered for without being asked.
    pub unexpected: Vec<String>,
}

impl BulkReport {
    pub fn reconcile(action: BulkAction, requested: &[String], response: &BulkResponse) -> Self {
        let mut seen = BTreeSet::new();
        let items = requested
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(|id| {
                let outcome = match response.get(id) {
                    Some(value) if value.eq_ignore_ascii_case(SUCCESS_MARKER) => {
                        BulkOutcome::Succeeded
                    }
                    Some(value) => BulkOutcome::Failed(value.clone()),
                    None => BulkOutcome::Missing,
                };
                BulkItem {
                    system_id: id.clone(),
                    outcome,
                }
            })
            .collect();

        let mut unexpected: Vec<String> = response
            .keys()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned()
            .collect();
        unexpected.sort();

        Self {
            action,
            items,
            unexpected,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == BulkOutcome::Succeeded)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, BulkOutcome::Failed(_)))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.outcome == BulkOutcome::Missing)
            .count()
    }

    /// Ids to keep selected so the action can be retried.
    pub fn retry_ids(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .filter(|i| i.outcome != BulkOutcome::Succeeded)
            .map(|i| i.system_id.clone())
            .collect()
    }

    pub fn alert(&self) -> Alert {
        let total = self.items.len();
        let succeeded = self.succeeded();
        let mut message = format!(
            "Bulk {}: {} of {} succeeded",
            self.action,
            succeeded,
            plural(total, "provider")
        );
        if self.failed() > 0 {
            message.push_str(&format!(", {} failed", self.failed()));
        }
        if self.missing() > 0 {
            message.push_str(&format!(", {} without result", self.missing()));
        }

        if succeeded == total {
            Alert::success(message)
        } else if succeeded == 0 {
            Alert::error(message)
        } else {
            Alert::warning(message)
        }
    }
}
