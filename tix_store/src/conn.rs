//! Connection and store traits 连接与存储 trait

use tix_comm::ShardId;

use crate::{Cmd, Reply, StoreResult};

/// Pipelined connection 流水线连接
///
/// `send` queues, `flush` transmits, `recv` yields replies in send order.
/// A connection is exclusive for the duration of one logical operation.
/// `send` 入队，`flush` 发送，`recv` 按发送顺序取应答。
/// 一个连接在单次逻辑操作期间独占。
pub trait Conn {
  fn send(&mut self, cmd: Cmd);

  fn flush(&mut self) -> StoreResult<()>;

  fn recv(&mut self) -> StoreResult<Reply>;

  /// Single command round trip 单命令往返
  #[inline]
  fn exec(&mut self, cmd: Cmd) -> StoreResult<Reply> {
    self.send(cmd);
    self.flush()?;
    self.recv()
  }
}

/// Sharded connection provider 分片连接提供者
pub trait Store: Send + Sync {
  /// Reading connection for a shard 某分片的读连接
  fn read(&self, shard: ShardId) -> Box<dyn Conn + '_>;

  /// Writing connection for a shard 某分片的写连接
  fn write(&self, shard: ShardId) -> Box<dyn Conn + '_>;

  /// Number of shards 分片数量
  fn shards(&self) -> u32;
}
