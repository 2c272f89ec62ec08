//! Iterative resolution engine
//!
//! Walks the delegation chain from the root servers down to an authoritative
//! server, one probe at a time:
//!
//! - **core**: the delegation walk and candidate fallback
//! - **glue**: resolves referral nameserver hostnames when glue is missing
//! - **classifier**: stage classification and response summaries
//! - **recorder**: accumulates the flattened step trace

pub mod classifier;
pub mod core;
pub mod glue;
pub mod recorder;

pub use classifier::{classify_stage, summarize};
pub use self::core::IterativeResolver;
pub use glue::GlueChain;
pub use recorder::TraceRecorder;
