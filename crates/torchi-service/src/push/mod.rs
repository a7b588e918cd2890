//! The interactive push engine.

pub mod correlator;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use correlator::{ReplyCorrelator, WaiterGuard};
pub use orchestrator::{DispatchError, PushOrchestrator};
