//! Core traits, common domain types, request/result value objects, and the
//! library-wide error type.

pub mod engine;
pub mod request;
pub mod serialization;
pub mod types;

pub use engine::*;
pub(crate) use engine::ensure_finite;
pub use request::*;
pub use serialization::*;
pub use types::*;
