pub mod auth;
pub mod incidents;
pub mod materials;
pub mod reports;
