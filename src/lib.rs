pub mod config;
pub mod error;
pub mod serial;
pub mod server;
pub mod storage;

pub use error::{Error, Result};
