//! Unit test suite for jsdoc2md
//!
//! Exercises the facade against recording test doubles, so every test can see
//! exactly which stages ran.
//!
//! ```bash
//! cargo test --test unit
//! ```

#[path = "../common/mod.rs"]
mod common;

mod facade_tests;
mod options_tests;
