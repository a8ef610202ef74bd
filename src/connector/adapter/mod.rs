mod gemini_client;
mod mock_generator;
mod static_suggestions;

pub use gemini_client::*;
pub use mock_generator::*;
pub use static_suggestions::*;
