//! FFI bindings crate for the Flutter shell.

pub mod api;
