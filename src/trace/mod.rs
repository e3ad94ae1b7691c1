//! Trace Store & Reconstructor: the back-pointer buffer and the
//! deterministic backward walk that recovers a gapped alignment from it.

mod reconstruct;
mod store;

pub use reconstruct::{reconstruct, Reconstruction};
pub use store::TraceStore;
