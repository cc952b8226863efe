//! Integration test suite for jsdoc2md
//!
//! End-to-end tests running the built-in extractor, structurer and renderer
//! against JavaScript fixtures on disk, plus the `jsdoc2md` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **facade**: raw data, template data and caching through the facade
//! - **render**: markdown output and template customization
//! - **namepaths**: kind grouping on real sources
//! - **cli**: the command-line binary

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod facade;
mod namepaths;
mod render;
