//! tix - tag indexing & searching 标签索引与检索
//!
//! Items carry weighted tags. For selected tag combinations the index
//! keeps three parallel rankings in a sharded set/zset/hash store, so
//! "top K items carrying all of these tags" is one ranged read.
//! 条目携带带权标签。索引为选定的标签组合在分片的集合 / 有序集合 /
//! 哈希存储中维护三个平行排序，「携带全部标签的前 K 个条目」只需
//! 一次区间读取。

mod error;
mod index;
mod item;
mod pending;
mod product;
mod query;
mod worker;

pub use error::{TixError, TixResult};
pub use index::{Index, IndexOpts, QueryOptions};
pub use item::{HighNotify, Item, ItemLoad};
pub use tix_comm::ItemId;
pub use tix_node::SortBy;
pub use tix_rule::Rule;
