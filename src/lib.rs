pub mod app;
pub mod canvas;
pub mod error;
pub mod format;
pub mod logging;
