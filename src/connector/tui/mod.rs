//! Interactive terminal front-end for a [`ChatSession`](crate::ChatSession).

mod app;
mod clipboard;
mod markdown;
mod theme;
mod view;

pub use app::{run, TuiApp};
pub use theme::Theme;
