//! Test helpers module
//!
//! Utilities for driving the ClubPortal router over real TCP connections
//! against the in-memory store and a temporary media root.

pub mod server;
pub mod test_data;

pub use server::*;
pub use test_data::*;
