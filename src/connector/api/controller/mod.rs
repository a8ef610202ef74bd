pub mod ask_controller;
pub mod suggest_controller;

pub use ask_controller::AskController;
pub use suggest_controller::SuggestController;
