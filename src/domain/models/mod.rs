mod exchange;
mod history;
mod session;

pub use exchange::*;
pub use history::*;
pub use session::*;
