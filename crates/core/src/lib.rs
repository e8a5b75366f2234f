pub mod auth;
pub mod boundary;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{HostboundError, Result};
