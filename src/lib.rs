#![warn(rust_2018_idioms)]

pub mod cli;
mod commands;
mod config;
mod errors;
mod location;
mod pretty;
mod router;
mod stats;
pub mod storage;

#[cfg(test)]
mod testing;

pub use self::commands::{Download, Upload};
pub use self::config::Config;
pub use self::errors::{Error, ErrorKind};
pub use self::location::Location;
pub use self::router::Transfer;
