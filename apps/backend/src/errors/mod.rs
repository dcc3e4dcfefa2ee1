//! Error taxonomy: HTTP-agnostic domain errors plus stable wire codes.

pub mod domain;
pub mod error_code;

pub use error_code::ErrorCode;
