//! Approval scope and recipient rules.
//!
//! A request targets a whole project, one job, or one item. Per scope the
//! state machine is `none -> awaiting -> approved`, with `awaiting -> none`
//! on cancel. Approved is terminal: cancelling an approved request fails,
//! and a fresh request for that scope first requires deleting the old row.

use crate::types::{CustomerId, DbId};

/// Customer tag marking a member as "not an approver". Matched after
/// trimming, case-insensitively.
pub const NON_APPROVER_TAG: &str = "na";

/// The granularity an approval request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ApprovalScope {
    Project,
    Job { job_id: DbId },
    Item { job_id: DbId, item_id: DbId },
}

impl ApprovalScope {
    /// Job id component, `None` at project scope.
    pub fn job_id(&self) -> Option<DbId> {
        match self {
            ApprovalScope::Project => None,
            ApprovalScope::Job { job_id } | ApprovalScope::Item { job_id, .. } => Some(*job_id),
        }
    }

    /// Item id component, `None` unless item-scoped.
    pub fn item_id(&self) -> Option<DbId> {
        match self {
            ApprovalScope::Item { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }

    /// Reconstruct a scope from nullable storage columns.
    pub fn from_columns(job_id: Option<DbId>, item_id: Option<DbId>) -> Self {
        match (job_id, item_id) {
            (Some(job_id), Some(item_id)) => ApprovalScope::Item { job_id, item_id },
            (Some(job_id), None) => ApprovalScope::Job { job_id },
            _ => ApprovalScope::Project,
        }
    }
}

/// Whether a member's tags mark them as a non-approver.
pub fn is_non_approver(tags: &[String]) -> bool {
    tags.iter()
        .any(|t| t.trim().eq_ignore_ascii_case(NON_APPROVER_TAG))
}

/// A project member resolved through the member directory.
#[derive(Debug, Clone)]
pub struct ApproverCandidate {
    pub customer_id: CustomerId,
    pub email: String,
    pub tags: Vec<String>,
}

/// Filter the effective member set down to approval recipients: drop the
/// requester and anyone tagged as a non-approver.
pub fn approval_recipients(
    candidates: &[ApproverCandidate],
    requester: CustomerId,
) -> Vec<&ApproverCandidate> {
    candidates
        .iter()
        .filter(|c| c.customer_id != requester && !is_non_approver(&c.tags))
        .collect()
}

/// Human-readable label for a scope, built from resolved display names.
/// Callers substitute placeholders when a lookup fails.
pub fn scope_label(project_name: &str, job_name: Option<&str>, item_title: Option<&str>) -> String {
    match (job_name, item_title) {
        (Some(job), Some(item)) => format!("{item} in {job} ({project_name})"),
        (Some(job), None) => format!("{job} ({project_name})"),
        _ => project_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: CustomerId, tags: &[&str]) -> ApproverCandidate {
        ApproverCandidate {
            customer_id: id,
            email: format!("c{id}@example.com"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_scope_columns_round_trip() {
        for scope in [
            ApprovalScope::Project,
            ApprovalScope::Job { job_id: 4 },
            ApprovalScope::Item { job_id: 4, item_id: 9 },
        ] {
            assert_eq!(
                ApprovalScope::from_columns(scope.job_id(), scope.item_id()),
                scope
            );
        }
    }

    #[test]
    fn test_na_tag_trimmed_case_insensitive() {
        assert!(is_non_approver(&["NA".to_string()]));
        assert!(is_non_approver(&[" na ".to_string()]));
        assert!(is_non_approver(&["wholesale".to_string(), "Na".to_string()]));
        assert!(!is_non_approver(&["nato".to_string()]));
        assert!(!is_non_approver(&[]));
    }

    #[test]
    fn test_recipients_exclude_requester_and_na() {
        let candidates = vec![
            candidate(1, &[]),
            candidate(2, &["NA"]),
            candidate(3, &["vip"]),
        ];
        let recipients = approval_recipients(&candidates, 3);
        assert_eq!(
            recipients.iter().map(|c| c.customer_id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_recipients_can_be_empty() {
        let candidates = vec![candidate(1, &["na"])];
        assert!(approval_recipients(&candidates, 2).is_empty());
    }

    #[test]
    fn test_scope_labels() {
        assert_eq!(scope_label("Deck A", None, None), "Deck A");
        assert_eq!(scope_label("Deck A", Some("Order 1"), None), "Order 1 (Deck A)");
        assert_eq!(
            scope_label("Deck A", Some("Order 1"), Some("Blue Widget")),
            "Blue Widget in Order 1 (Deck A)"
        );
    }
}
