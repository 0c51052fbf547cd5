//! Common utilities for the FlexiMart catalog workspace
//!
//! This crate provides the shared error type used across all catalog crates.

pub mod error;

pub use error::{CatalogError, Result};
