//! Server module for Tokenmeter
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for the server
//! - `loader`: Configuration loading from files and environment
//! - `init`: Server initialization and run loop

pub mod config;
mod init;
mod loader;

pub use init::run;
pub use loader::load_config;
