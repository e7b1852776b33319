//! In-memory backing store 内存存储
//!
//! Implements the full store contract with per-shard mutexed maps.
//! Meant for tests and single-process embedding, not durability.
//! 以每分片互斥锁的映射实现完整存储契约，用于测试与单进程内嵌，
//! 不提供持久化。

mod glob;
mod shard;

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
};

use tix_comm::ShardId;
use tix_store::{Cmd, Conn, Reply, Store, StoreError, StoreResult};

pub use glob::glob_match;
use shard::Shard;

/// Sharded in-memory store 分片内存存储
pub struct MemStore {
  shards: Vec<Arc<Mutex<Shard>>>,
}

impl MemStore {
  /// Create with a shard count 以分片数创建
  pub fn new(shards: u32) -> Self {
    let shards = shards.max(1);
    Self {
      shards: (0..shards).map(|_| Arc::default()).collect(),
    }
  }

  fn conn(&self, shard: ShardId) -> MemConn {
    // Out-of-range shards clamp to 0, the router never produces them
    // 越界分片钳制为 0，路由不会产生越界值
    let slot = self.shards.get(shard.0 as usize).unwrap_or(&self.shards[0]);
    MemConn {
      shard: slot.clone(),
      queue: Vec::new(),
      replies: VecDeque::new(),
    }
  }
}

impl Store for MemStore {
  fn read(&self, shard: ShardId) -> Box<dyn Conn + '_> {
    Box::new(self.conn(shard))
  }

  fn write(&self, shard: ShardId) -> Box<dyn Conn + '_> {
    Box::new(self.conn(shard))
  }

  fn shards(&self) -> u32 {
    self.shards.len() as u32
  }
}

/// Pipelined connection to one shard 指向单个分片的流水线连接
pub struct MemConn {
  shard: Arc<Mutex<Shard>>,
  queue: Vec<Cmd>,
  replies: VecDeque<Reply>,
}

impl Conn for MemConn {
  fn send(&mut self, cmd: Cmd) {
    self.queue.push(cmd);
  }

  fn flush(&mut self) -> StoreResult<()> {
    if self.queue.is_empty() {
      return Ok(());
    }
    // One lock per flush, the whole pipeline executes atomically
    // 每次 flush 只加一次锁，整条流水线原子执行
    let mut shard = self
      .shard
      .lock()
      .map_err(|_| StoreError::protocol("shard poisoned"))?;
    for cmd in self.queue.drain(..) {
      self.replies.push_back(shard.exec(cmd));
    }
    Ok(())
  }

  fn recv(&mut self) -> StoreResult<Reply> {
    self.replies.pop_front().ok_or(StoreError::NoReply)
  }
}
