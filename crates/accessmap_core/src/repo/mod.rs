//! Persistence layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the whole-collection feedback persistence contract.
//! - Isolate SQLite and JSON encoding details from the pipeline.
//!
//! # Invariants
//! - The persisted collection is replaced atomically; partial writes are
//!   never observable on a later load.
//! - Undecodable persisted content degrades to an empty collection without
//!   touching the stored bytes.

pub mod feedback_repo;
