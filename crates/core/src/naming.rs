//! Job naming rules.

/// Suffix appended when a locked job is duplicated for copy-on-write.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Name for the copy of a locked job.
pub fn copy_job_name(original: &str) -> String {
    format!("{original}{COPY_SUFFIX}")
}

/// Case-insensitive duplicate check against a project's existing job names.
///
/// Enforced at creation time in the application, not as a DB constraint.
pub fn is_duplicate_job_name(existing: &[String], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    existing.iter().any(|n| n.to_lowercase() == candidate)
}

/// Pick a name for `desired` that does not collide with `existing`.
///
/// On collision the name falls back to the copy sequence for its stem:
/// `X` takes `X (Copy)`, then `X (Copy 2)`, `X (Copy 3)` and so on. A
/// `desired` already carrying the copy suffix numbers from the same
/// stem, so repeated duplication of one job never collides.
pub fn unique_job_name(existing: &[String], desired: &str) -> String {
    if !is_duplicate_job_name(existing, desired) {
        return desired.to_string();
    }
    let stem = desired.strip_suffix(COPY_SUFFIX).unwrap_or(desired);
    let first = copy_job_name(stem);
    if !is_duplicate_job_name(existing, &first) {
        return first;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{stem} (Copy {n})");
        if !is_duplicate_job_name(existing, &candidate) {
            return candidate;
        }
        n += 1;
    }
}
