pub mod batch;
pub mod config;
pub mod demo;
pub mod discover;
pub mod export;
pub mod replay;

mod error;
pub use error::{DiscoverError, ProcessError};

pub use config::{Cli, Config};
