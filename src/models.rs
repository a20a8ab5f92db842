pub mod auth;
pub mod inventory;
pub mod tenancy;
pub mod view;
