//! Grid addressing, traversal costs and per-cell search storage for 8-connected grid maps.

mod cost_map;
mod direction;
mod grid;
mod node_store;

pub mod eight_connected;

pub use self::cost_map::*;
pub use self::direction::*;
pub use self::eight_connected::{octile_distance, EightConnectedExpander};
pub use self::grid::*;
pub use self::node_store::*;
