pub mod admin_service;
pub mod auth;
pub mod email_service;
pub mod google;
pub mod lead_service;
pub mod recaptcha;
