pub mod ambient;
pub mod home;
pub mod not_found;
