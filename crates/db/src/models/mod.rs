pub mod approval;
pub mod job;
pub mod job_item;
pub mod member;
pub mod project;
pub mod share_token;
pub mod shop_settings;
