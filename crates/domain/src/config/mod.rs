//! Configuration module for iterdns
//!
//! - `root`: Main configuration and CLI overrides
//! - `resolver`: Root hints, probe timeout and delegation guards
//! - `server`: Resolver service binding
//! - `logging`: Log level and trace log destination
//! - `lookup`: Batch lookup client settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod lookup;
pub mod resolver;
pub mod root;
pub mod server;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use lookup::LookupConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
