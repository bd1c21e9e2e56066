pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod panel;
pub mod quote_source;
pub mod ratio;
pub mod render;
