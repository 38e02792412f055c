// CLI module for tagsniff
//
// Only compiled into the binary; the library never depends on it.

pub mod commands;
pub mod config;
pub mod output;

pub use config::Config;
