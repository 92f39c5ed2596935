//! Domain helpers shared across recipe services.
//!
//! This crate contains only pure functions and types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod email;
pub mod upload;
