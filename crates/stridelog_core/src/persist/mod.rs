//! Durable persistence for the workout collection.
//!
//! # Responsibility
//! - Encode/decode full workout snapshots (`codec`).
//! - Store snapshots in named flat slots (`flat_store`).
//!
//! # Invariants
//! - The persisted copy is always a full snapshot of the store.

pub mod codec;
pub mod flat_store;
