//! Effective-permission evaluation for (project, customer) pairs.
//!
//! The owner never has a membership row; "owner" is derived from
//! `projects.owner_customer_id`. Everyone else gets the role stored on
//! their `project_members` row, or nothing at all.

use crate::error::CoreError;
use crate::types::CustomerId;

/// Stored membership role. The owner role is never stored (see [`Role`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Edit,
    View,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Edit => "edit",
            MemberRole::View => "view",
        }
    }

    /// Parse a stored role string. The db layer guards this with a CHECK
    /// constraint, so failure here means the row predates the constraint.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "edit" => Ok(MemberRole::Edit),
            "view" => Ok(MemberRole::View),
            other => Err(CoreError::Internal(format!("unknown member role: {other}"))),
        }
    }
}

/// Effective permission of a customer on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Edit,
    View,
}

impl Role {
    /// Owners and editors may mutate project content.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Owner | Role::Edit)
    }
}

/// Compute the effective role of `customer_id` on a project.
///
/// `members` is the full (customer_id, role) set for the project. Returns
/// `None` when the customer is neither the owner nor a member.
pub fn effective_role(
    owner_customer_id: CustomerId,
    members: &[(CustomerId, MemberRole)],
    customer_id: CustomerId,
) -> Option<Role> {
    if customer_id == owner_customer_id {
        return Some(Role::Owner);
    }
    members
        .iter()
        .find(|(id, _)| *id == customer_id)
        .map(|(_, role)| match role {
            MemberRole::Edit => Role::Edit,
            MemberRole::View => Role::View,
        })
}

/// Require edit-level access, failing `Forbidden` otherwise.
pub fn require_edit(role: Option<Role>) -> Result<Role, CoreError> {
    match role {
        Some(r) if r.can_edit() => Ok(r),
        Some(_) => Err(CoreError::Forbidden(
            "edit access required for this project".into(),
        )),
        None => Err(CoreError::Forbidden("not a member of this project".into())),
    }
}

/// Require ownership, failing `Forbidden` otherwise. Member management
/// (add/remove) is owner-only; editors cannot manage membership.
pub fn require_owner(role: Option<Role>) -> Result<(), CoreError> {
    match role {
        Some(Role::Owner) => Ok(()),
        Some(_) => Err(CoreError::Forbidden(
            "only the project owner can manage members".into(),
        )),
        None => Err(CoreError::Forbidden("not a member of this project".into())),
    }
}

/// Require any membership at all (view counts), failing `Forbidden` otherwise.
pub fn require_member(role: Option<Role>) -> Result<Role, CoreError> {
    role.ok_or_else(|| CoreError::Forbidden("not a member of this project".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: CustomerId = 10;
    const EDITOR: CustomerId = 20;
    const VIEWER: CustomerId = 30;
    const STRANGER: CustomerId = 99;

    fn members() -> Vec<(CustomerId, MemberRole)> {
        vec![(EDITOR, MemberRole::Edit), (VIEWER, MemberRole::View)]
    }

    #[test]
    fn test_owner_is_derived_not_stored() {
        // Owner has no membership row yet still resolves to Owner.
        assert_eq!(effective_role(OWNER, &members(), OWNER), Some(Role::Owner));
    }

    #[test]
    fn test_member_roles_resolve() {
        assert_eq!(effective_role(OWNER, &members(), EDITOR), Some(Role::Edit));
        assert_eq!(effective_role(OWNER, &members(), VIEWER), Some(Role::View));
    }

    #[test]
    fn test_stranger_has_no_role() {
        assert_eq!(effective_role(OWNER, &members(), STRANGER), None);
    }

    #[test]
    fn test_can_edit_levels() {
        assert!(Role::Owner.can_edit());
        assert!(Role::Edit.can_edit());
        assert!(!Role::View.can_edit());
    }

    #[test]
    fn test_require_edit_rejects_viewer_and_stranger() {
        assert!(require_edit(Some(Role::Edit)).is_ok());
        assert!(require_edit(Some(Role::View)).is_err());
        assert!(require_edit(None).is_err());
    }

    #[test]
    fn test_require_owner_rejects_editor() {
        assert!(require_owner(Some(Role::Owner)).is_ok());
        assert!(require_owner(Some(Role::Edit)).is_err());
        assert!(require_owner(None).is_err());
    }

    #[test]
    fn test_role_parse_round_trip() {
        assert_eq!(MemberRole::parse("edit").unwrap(), MemberRole::Edit);
        assert_eq!(MemberRole::parse("view").unwrap(), MemberRole::View);
        assert!(MemberRole::parse("admin").is_err());
    }
}
