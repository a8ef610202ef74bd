//! # Domain Layer
//!
//! Session models, exchange records and the error taxonomy.
//! This layer is independent of transport and rendering.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
