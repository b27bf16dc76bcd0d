//! # dochub-core
//!
//! Core crate for DocHub. Contains the byte-storage trait, configuration
//! schemas, the folder-upload progress event schema, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other DocHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
