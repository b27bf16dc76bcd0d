//! HTTP request handlers.

pub mod document;
pub mod folder;
pub mod health;
pub mod upload;
