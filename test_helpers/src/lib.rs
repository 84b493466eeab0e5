//! Test helpers shared across crates.
//!
//! This crate provides a builder for declaration manifests and small text
//! helpers for inspecting generated code.

pub mod manifest;
pub mod text;
