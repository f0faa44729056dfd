pub mod api;
pub mod config_io;
pub mod token;
