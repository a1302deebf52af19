//! # Property Graph Model
//!
//! Clean DTOs for the labeled property graph that OWL2 structures are
//! encoded into. These types cross every boundary: translator ↔ query
//! synthesizer ↔ bulk export ↔ store ↔ reconstructor.
//!
//! Design rule: NO ontology types here. This module is pure data:
//! no I/O, no state, no async.

pub mod node;
pub mod edge;
pub mod relationship;
pub mod label;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use edge::Edge;
pub use relationship::{Relationship, RelId, Direction};
pub use label::{NodeLabel, EdgeLabel};
pub use value::Value;
pub use property_map::{contains_all, props, PropertyMap};
