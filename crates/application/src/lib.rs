//! iterdns Application Layer
//!
//! Ports the infrastructure implements, the caller-owned answer cache, and
//! the lookup use case that ties cache, resolver and trace sink together.
pub mod ports;
pub mod services;
pub mod use_cases;
