//! Auth types shared across recipe services.
//!
//! Provides JWT issuing/validation and the `Identity` bearer-token extractor.

pub mod identity;
pub mod token;
