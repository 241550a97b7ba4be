//! Domain model for remote places, user feedback and renderable points.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one wire-faithful shape per data source (remote vs. user).
//!
//! # Invariants
//! - Remote records are immutable once fetched and replaced wholesale.
//! - Feedback records are append-only; they are never edited or deleted.
//! - Renderable points always carry a usable coordinate.

pub mod feedback;
pub mod geo;
pub mod place;
pub mod point;
