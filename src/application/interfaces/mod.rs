mod answer_generator;
mod suggestion_provider;

pub use answer_generator::*;
pub use suggestion_provider::*;
