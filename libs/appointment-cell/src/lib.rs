pub mod handlers;
pub mod mapping;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use router::{appointment_routes, AppointmentState};
pub use store::AppointmentStore;
