pub mod models;
pub mod handlers;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use router::*;
pub use store::PatientStore;
