//! Generic A* search with pluggable collaborators.
//!
//! The [`Pathfinder`] driver knows nothing about the search space. It is
//! generic over three traits:
//!
//! | Trait | Responsibility |
//! |---|---|
//! | [`Map`] | neighbour topology, per-node flag cache |
//! | [`Goal`] | heuristic, edge cost, node validity, termination |
//! | [`Storage`] | node records, open and closed lists |
//!
//! Two storages ship with the crate: [`ListStorage`] (flat vectors, linear
//! lookups) and [`HashStorage`] (hash maps plus an indexed heap). [`Graph`]
//! and [`GraphGoal`] cover explicit weighted graphs.
//!
//! The driver never panics on a normal outcome: a search either reaches
//! [`Status::Succeeded`] with the terminal node available through
//! [`Pathfinder::current_node`], or ends in [`Status::Failed`].

mod arena;
mod config;
mod flags;
mod graph;
mod hash_storage;
mod list_storage;
mod node;
mod pathfinder;
mod queue;
mod traits;

pub use arena::NodeArena;
pub use config::{DEFAULT_EPSILON, SearchConfig};
pub use flags::AStarFlags;
pub use graph::{Graph, GraphGoal};
pub use hash_storage::HashStorage;
pub use list_storage::ListStorage;
pub use node::{Node, NodeHandle, NodeId};
pub use pathfinder::{Pathfinder, SearchStats, Status};
pub use queue::OpenQueue;
pub use traits::{Goal, Map, Storage};
