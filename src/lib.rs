pub mod config;
pub mod server;
pub mod telegram;
pub mod validate;
