use crate::types::DbId;

/// Domain error taxonomy shared by every mutation surface.
///
/// The api crate maps these onto HTTP statuses; the db and service layers
/// return them directly. Mutations never persist partial state when one of
/// these is raised.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid reorder: {0}")]
    InvalidOrder(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Job is locked: {0}")]
    Locked(String),

    #[error("Approval request already approved")]
    AlreadyApproved,

    #[error("No eligible approvers for this project")]
    NoApprovers,

    #[error("Not configured: {0}")]
    Configuration(String),

    /// An external lookup (catalog, member directory) failed. Read paths
    /// degrade to placeholder labels instead of surfacing this.
    #[error("Dependency failure: {0}")]
    Dependency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
