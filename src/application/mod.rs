//! Application layer: the conversion engine and the recipient intake flow.
//!
//! Both are explicit state containers behind `tokio::sync::RwLock`, mutated
//! only through their transition methods. Simulated asynchronous work runs as
//! spawned tasks guarded by per-field request sequences, so only the latest
//! operation for a field may commit its result.

pub mod conversion;
pub mod recipient;
pub mod sequence;
pub mod session;
