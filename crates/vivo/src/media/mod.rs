pub mod resolved_stream;

pub use resolved_stream::{ResolvedStream, ResolvedStreamBuilder};
