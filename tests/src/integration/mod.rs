//! # Integration Tests
//!
//! Full engine flows through the public API.

pub mod events;
pub mod sales;
