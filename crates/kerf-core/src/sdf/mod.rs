//! The SDF expression graph: 3D nodes, the 2D cross-section nodes
//! that feed `extrude`/`revolve`, and the shared plumbing modules that
//! `Node`'s match arms dispatch into.

mod bridge;
mod edgebreak;
mod modifiers;
pub mod node;
pub mod node2;
mod ops;
pub mod primitives;
mod root_finder;
mod transforms;

pub use node::{Axis, Node, Readback};
pub use node2::{Node2, Readback2};

pub use bridge::{extrude, revolve};
pub use node2::{circle2d, polygon, rect2d};
pub use primitives::{box3, cone, cylinder, plane, sphere, torus};
