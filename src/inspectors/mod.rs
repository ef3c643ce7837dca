//! EVM execution inspectors
//!
//! - `call_tracer`: Reconstructs the call tree of a transaction from its
//!   instruction stream and queues finished trees for scanning
//!
//! Inspectors implement the core traits needed for integration with
//! [`TraceEvm`](crate::TraceEvm).

pub mod call_tracer;

pub use call_tracer::CallTracer;
