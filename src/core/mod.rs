//! Core types shared across the documentation pipeline.
//!
//! This module holds the error layer used by every stage and the [`Kind`]
//! classification attached to raw doclets and template data entries.
//!
//! # Error Handling
//!
//! Stages return [`anyhow::Result`]. Failures this crate raises itself are
//! [`DocError`] values, so callers can recover the precise failure with
//! `error.downcast_ref::<DocError>()` no matter how many context layers were
//! added on the way up. The CLI converts any error into an [`ErrorContext`]
//! through [`user_friendly_error`] before printing it.

pub mod error;
mod kind;

pub use error::{DocError, ErrorContext, user_friendly_error};
pub use kind::{Access, Kind, Scope};
