//! Key layout constants 键布局常量
//!
//! Every key in the backing store is `what || kind prefix || identity`.
//! The prefixes are deliberately short, they appear in every key.
//! 存储中的每个键都是 `what || 类型前缀 || 标识`，前缀刻意很短。

/// Per-item tag record hash 条目标签记录哈希
pub const KEY_ITEM_TAG_HASH: &str = "tith.";

/// Node member set 节点成员集合
pub const KEY_BASE_SET: &str = "tbin.";

/// Per-shard set of high node identities 每分片的高位节点标识集合
pub const KEY_HIGH_TAGS: &str = "thts.";

/// Rank by raw score 按原始分数排序
pub const KEY_SCORE_RANK: &str = "tsin.";

/// Rank by creation date 按创建时间排序
pub const KEY_DATE_RANK: &str = "tdin.";

/// Rank by faded score 按衰减分数排序
pub const KEY_OVERALL_RANK: &str = "toin.";

/// Co-occurring tag frequency rank 共现标签频率排序
pub const KEY_RELATIVE_RANK: &str = "trin.";

/// Co-occurring tag sample set 共现标签随机集合
pub const KEY_RAND_SUGGEST: &str = "trss.";

/// Separator inside composite node identities 复合节点标识内的分隔符
pub const TAG_SEP: &str = "|";
