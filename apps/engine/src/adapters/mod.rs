//! In-memory implementations of the collaborator traits.
//!
//! These back the integration tests and the simulator binary. The
//! store enforces the uniqueness rules a production storage layer
//! would carry ((session, round_number), one vote per (round, player),
//! join-code uniqueness) so races surface as detectable Conflicts.

pub mod memory_media;
pub mod memory_store;

pub use memory_media::MemoryMediaStore;
pub use memory_store::MemoryBackend;
