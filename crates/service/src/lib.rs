//! Service layer: document storage and the connector config editor.
//! - Repository traits separate persistence from business rules.
//! - Validation lives in `models`; services decide when it runs.
//! - Errors are typed so the HTTP layer can map them to status codes.

pub mod errors;
pub mod file;
pub mod connect;
#[cfg(test)]
pub mod test_support;
