//! iterdns Infrastructure Layer
//!
//! Wire codec, UDP probe, the iterative resolver itself and the trace log sinks.
pub mod dns;
