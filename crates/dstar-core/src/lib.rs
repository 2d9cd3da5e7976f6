#![warn(missing_docs)]
//! Core types and utilities for `dstar`.
//!
//! This crate provides the per-cell search record, the indexed priority frontier, and the traits
//! the planner is written against.

mod node;
mod pqueue;
pub mod traits;

pub use crate::node::*;
pub use crate::pqueue::*;
