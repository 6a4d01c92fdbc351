//! Infrastructure layer - external dependency implementations.

pub mod backend;
pub mod correlation;
pub mod ports;
pub mod random;
pub mod resilient_backend;
pub mod settings;
