// fencekeep-core/src/engines/mod.rs
//! Concrete `MarkupStripper` implementations.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod ammonia_engine;
