//! # piper-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the piper workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the primitives the text layer
//! (`piper-lang`) and the interpreter (`piper-pipeline`) build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
