pub mod admins;
pub mod auth;
pub mod contact;
pub mod leads;
