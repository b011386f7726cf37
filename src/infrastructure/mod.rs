//! Infrastructure layer: I/O implementations, YAML adapter and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod traits;
pub mod yaml;

pub use error::{InfraError, InfraResult};
