pub mod graceful_shutdown;
pub mod serve;
pub mod tracing;
