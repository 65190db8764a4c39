pub mod errors;
pub mod db;
pub mod file;
pub mod connector_config;
