//! Sort-order maintenance for jobs-within-project and items-within-job.
//!
//! Both collections use the same scheme: append assigns `max + 1`
//! (starting at 1), and an explicit reorder must be a complete permutation
//! of the current member set. Reads always sort by `sort_order` ascending
//! with `id` as tiebreak.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Sort order for a new entity appended to a collection whose current
/// maximum is `current_max` (`None` when the collection is empty).
pub fn next_sort_order(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |m| m + 1)
}

/// Validate that `submitted` is a permutation of `current`.
///
/// Fails `InvalidOrder` on size mismatch, duplicate ids, or ids not in the
/// current set. Partial reorders are not supported.
pub fn validate_permutation(current: &[DbId], submitted: &[DbId]) -> Result<(), CoreError> {
    if submitted.len() != current.len() {
        return Err(CoreError::InvalidOrder(format!(
            "expected {} ids, got {}",
            current.len(),
            submitted.len()
        )));
    }
    let current_set: HashSet<DbId> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(submitted.len());
    for id in submitted {
        if !current_set.contains(id) {
            return Err(CoreError::InvalidOrder(format!(
                "id {id} is not part of this collection"
            )));
        }
        if !seen.insert(*id) {
            return Err(CoreError::InvalidOrder(format!("id {id} appears twice")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_sort_order_starts_at_one() {
        assert_eq!(next_sort_order(None), 1);
        assert_eq!(next_sort_order(Some(1)), 2);
        assert_eq!(next_sort_order(Some(41)), 42);
    }

    #[test]
    fn test_valid_permutation_accepted() {
        assert!(validate_permutation(&[1, 2, 3], &[3, 1, 2]).is_ok());
        assert!(validate_permutation(&[], &[]).is_ok());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = validate_permutation(&[1, 2, 3], &[1, 2]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrder(_)));
    }

    #[test]
    fn test_foreign_id_rejected() {
        let err = validate_permutation(&[1, 2, 3], &[1, 2, 9]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrder(_)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        // Same length, same id set coverage impossible with a dupe.
        let err = validate_permutation(&[1, 2, 3], &[1, 2, 2]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrder(_)));
    }
}
