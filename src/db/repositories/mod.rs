mod incident_repository;
mod material_repository;
mod report_repository;
mod user_repository;

pub use incident_repository::{IncidentFilter, IncidentRepository};
pub use material_repository::MaterialRepository;
pub use report_repository::ReportRepository;
pub use user_repository::UserRepository;
