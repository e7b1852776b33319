//! Shard routing 分片路由

use crate::ShardId;

/// Route a node identity to a shard by 32-bit checksum
/// 通过 32 位校验和把节点标识路由到分片
///
/// Deterministic: the same identity always lands on the same shard, so
/// reads and writes agree without coordination.
/// 确定性：同一标识总是落在同一分片，读写无需协调。
#[inline]
pub fn shard_of(identity: &str, shards: u32) -> ShardId {
  ShardId(crc32fast::hash(identity.as_bytes()) % shards.max(1))
}
