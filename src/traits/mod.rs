//! Trait definitions for Cloud Foundry operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! API differences in the implementations.

mod delete;
mod list;

pub use delete::Delete;
pub use list::{List, ListStream};
