pub mod approvals;
pub mod cart;
pub mod items;
pub mod jobs;
pub mod members;
pub mod pricing;
pub mod projects;
pub mod sharing;
