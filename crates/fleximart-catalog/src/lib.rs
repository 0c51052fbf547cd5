//! MongoDB-backed product catalog for FlexiMart
//!
//! This crate provides the data-access layer for the FlexiMart product
//! catalog: connection management, typed document CRUD, and the canned
//! catalog operations (bulk load, filtered search, review analysis,
//! review append, category statistics).
//!
//! # Features
//! - Async/await support via tokio
//! - Typed BSON (de)serialization through serde
//! - Query and aggregation-pipeline builders
//! - Input validation for collection names and filters
//! - Unique index management for `product_id`

pub mod connection;
pub mod document;
pub mod pipeline;
pub mod product;
pub mod query;
pub mod samples;
pub mod store;
pub mod validation;

pub use connection::{Connection, PoolConfig};
pub use document::Document;
pub use fleximart_common::{CatalogError, Result};
pub use pipeline::Pipeline;
pub use product::{CategoryStats, Product, ProductSummary, RatedProduct, Review};
pub use query::QueryBuilder;
pub use store::ProductStore;
pub use validation::{validate_filter, ValidatedCollectionName};
