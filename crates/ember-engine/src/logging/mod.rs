//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else logs through the `log`
//! facade; only this module knows about `env_logger`.

mod init;

pub use init::{LoggingConfig, init_logging};
