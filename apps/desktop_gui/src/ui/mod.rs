//! UI layer for the desktop window: app shell and view functions.

pub mod app;
pub mod widgets;

pub use app::{DesktopGuiApp, StartupConfig};
