pub mod models;
pub mod store;

pub use store::Store;

/// Embedded migrations, shared by the binaries and the test suites.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
