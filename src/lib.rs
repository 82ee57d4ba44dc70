//! RiverGuard: citizen river-pollution reporting.
//!
//! The crate keeps the screen logic (filters, timeline lookups, the report
//! wizard, the image uploader, the map adapter, forum forms) as plain
//! modules and serves it as JSON through an axum router. All data comes
//! from a seeded in-memory [`catalog::Catalog`]; submissions go to a
//! simulated backend.
//!
//! Module boundaries follow the same gateway layout as the binary:
//! `models` and `routes` re-export what their siblings need.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod forum;
pub mod location;
pub mod map;
pub mod models;
pub mod state;
pub mod submit;
pub mod timeline;
pub mod uploader;
pub mod wizard;

mod routes;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
