//! Data model layer.

pub mod file_tree;
pub mod ids;
pub mod tree_history;

pub use file_tree::{
    collect_subtree_ids, language_for_name, Node, NodeBody, NodeId, NodeKind, Snapshot,
};
pub use ids::{next_sequence, now_millis, unique_id};
pub use tree_history::TreeHistory;
