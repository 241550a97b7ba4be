//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate fetcher, classifier and store into the screen-session
//!   aggregation pipeline.
//! - Keep UI/FFI layers decoupled from transport and storage details.

pub mod session;
