//! # Application Layer
//!
//! Ports, the exchange use case, and the session controller coordinating
//! domain state with connector implementations.

pub mod interfaces;
pub mod session;
pub mod use_cases;

pub use interfaces::*;
pub use session::*;
pub use use_cases::*;
