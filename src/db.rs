pub mod allowed_admin_repo;
pub use allowed_admin_repo::AllowedAdminRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
