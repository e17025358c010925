//! Orchestration between repositories and the external capabilities.

pub mod access;
pub mod approval;
