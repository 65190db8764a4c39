pub mod bootstrap;
pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;
pub mod observability;
pub mod openapi;

pub use startup::{run, run_connect_editor};
