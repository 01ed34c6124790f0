pub mod config;
pub mod driver;
pub mod event;
pub mod format;
pub mod logging;
pub mod sink;
pub mod system;
