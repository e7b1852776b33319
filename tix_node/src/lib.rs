//! Tag combination nodes 标签组合节点
//!
//! One node per distinct tag combination, five parallel collections per
//! node, all on the shard its identity hashes to.
//! 每个标签组合一个节点，每个节点五个平行集合，
//! 全部落在其标识哈希到的分片上。

mod entry;
mod lattice;
mod node;

pub use entry::{Entry, SortBy};
pub use lattice::Lattice;
pub use node::Node;
