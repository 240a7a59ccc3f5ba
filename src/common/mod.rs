//! Common utilities and types shared across fusis

pub mod config;
pub mod error;
pub mod request_log;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use utils::{format_duration, parse_duration, validate_name};
