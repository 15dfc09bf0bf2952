// fencekeep/src/lib.rs
//! # fencekeep CLI
//!
//! Command-line front end for `fencekeep-core`: sanitize markdown while
//! keeping fenced diagrams intact, check edits the way a form field would,
//! and list the diagram sources in a document.

pub mod cli;
pub mod commands;
pub mod logger;

pub use commands::blocks::run_blocks;
pub use commands::check::run_check;
pub use commands::sanitize::run_sanitize;
