//! Integration test utilities for the blog server
//!
//! [`harness`] drives the full router in-process over the in-memory backend;
//! [`helpers`] spawns a real server against PostgreSQL and Redis.

pub mod fixtures;
pub mod harness;
pub mod helpers;

pub use fixtures::*;
pub use harness::*;
pub use helpers::*;
