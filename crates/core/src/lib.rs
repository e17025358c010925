//! Domain logic for the Orderdesk project/job/item model.
//!
//! Everything in this crate is pure: no I/O, no database handles. The db
//! and api crates call into these modules for the rules that must hold no
//! matter which surface triggered the mutation.

pub mod access;
pub mod approval;
pub mod cart;
pub mod error;
pub mod naming;
pub mod ordering;
pub mod types;
