mod astar;
mod bfs;
mod expand;
mod graph;
mod mcts;
mod node;
mod policy;
mod searcher;
mod state_index;
mod ucb;
mod walk;

pub use astar::{AStar, AStarConfig};
pub use bfs::Bfs;
pub use expand::{expand, Expansion};
pub use graph::SearchGraph;
pub use mcts::{Mcts, MctsConfig};
pub use node::Node;
pub use policy::{follow_policy, select_leaf, TreePolicy};
pub use searcher::{Budget, Outcome, Searcher};
pub use state_index::{Handle, StateIndex};
pub use walk::{PolicySearch, RandomWalk};
