pub mod approval_repo;
pub mod cart_repo;
pub mod job_item_repo;
pub mod job_repo;
pub mod member_repo;
pub mod project_repo;
pub mod share_token_repo;
pub mod shop_settings_repo;

pub use approval_repo::ApprovalRepo;
pub use cart_repo::{CartRepo, SaveCartOutcome};
pub use job_item_repo::JobItemRepo;
pub use job_repo::JobRepo;
pub use member_repo::MemberRepo;
pub use project_repo::ProjectRepo;
pub use share_token_repo::ShareTokenRepo;
pub use shop_settings_repo::ShopSettingsRepo;
