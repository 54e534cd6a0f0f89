//! Console front end: the interactive menu, one-shot commands and charts.

pub mod app;
pub mod menu;
pub mod plots;
pub mod report;

pub use app::{App, EvalChart};
pub use menu::Menu;
