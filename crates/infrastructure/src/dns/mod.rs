pub mod forwarding;
pub mod query_logger;
pub mod resolver;
pub mod transport;

pub use query_logger::{ConsoleTraceSink, FileTraceSink, TraceLineFormatter};
pub use resolver::IterativeResolver;
pub use transport::UdpProbe;
