//! Data models

pub mod customer;
pub mod form;
pub mod prediction;

pub use customer::*;
pub use form::*;
pub use prediction::*;
