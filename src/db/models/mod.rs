mod incident;
mod material;
mod report;
mod user;

pub use incident::*;
pub use material::*;
pub use report::*;
pub use user::*;
