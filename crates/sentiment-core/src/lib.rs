//! Core types and trait definitions for the sentiment voting service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// `VoteStore` spells out `Send` futures; test doubles implement it with `async fn`.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod guard;
pub mod identity;
pub mod phase;
pub mod store;
pub mod vote;

pub use error::{Error, Result};

#[cfg(test)]
mod memory;
