pub mod dashboard;
pub mod health;
pub mod prices;
pub mod products;
pub mod routes;

pub use routes::{router, ApiState};
