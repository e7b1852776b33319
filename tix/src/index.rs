//! Index facade 索引门面

use std::{
  sync::{
    Arc,
    mpsc::{SyncSender, sync_channel},
  },
  thread::JoinHandle,
};

use log::error;
use tix_comm::ItemId;
use tix_node::{Lattice, SortBy};
use tix_rule::{CompiledRule, Rule};
use tix_store::Store;

use crate::{
  HighNotify, ItemLoad, TixError, TixResult,
  pending::Pending,
  query,
  worker::{Job, Worker},
};

/// Channel capacity per unit of boundary, sized to absorb one promotion
/// without blocking the promoter
/// 每单位界限的通道容量，足以吸收一次升位而不阻塞发起方
const QUEUE_FACTOR: usize = 50;

/// Index configuration 索引配置
pub struct IndexOpts {
  /// Keyspace label, keep it short, it prefixes every key
  /// 键空间标签，尽量短，它是所有键的前缀
  pub what: String,

  /// Promotion threshold, balances index size against search speed
  /// 升位阈值，在索引大小与检索速度之间权衡
  pub high_node_boundary: usize,

  /// Declarative tag rules 声明式标签规则
  pub rule: Rule,

  /// Item loader 条目加载回调
  pub item_load: Option<ItemLoad>,

  /// Needed by `random_suggest_tags`, more than doubles indexing work for
  /// tag-heavy items 供 `random_suggest_tags` 使用，标签多的条目索引
  /// 开销翻倍以上
  pub enable_random_suggest_tags: bool,

  /// Called when a tag combination turns high 标签组合升位时调用
  pub on_high: Option<HighNotify>,

  /// Backing store client 存储客户端
  pub store: Arc<dyn Store>,
}

/// Shared between worker and queries worker 与查询共享
pub(crate) struct Inner {
  pub lat: Lattice,
  pub rule: CompiledRule,
  pub boundary: usize,
  pub enable_random_suggest: bool,
  pub item_load: ItemLoad,
  pub on_high: Option<HighNotify>,
}

struct Started {
  inner: Arc<Inner>,
  tx: SyncSender<Job>,
  pending: Arc<Pending>,
  handle: Option<JoinHandle<()>>,
}

/// A tag index over one keyspace 一个键空间上的标签索引
pub struct Index {
  opts: IndexOpts,
  started: Option<Started>,
}

impl Index {
  pub fn new(opts: IndexOpts) -> Self {
    Self {
      opts,
      started: None,
    }
  }

  /// Validate, compile rules, spawn the worker. Idempotent.
  /// 校验、编译规则、启动 worker，幂等。
  pub fn init(&mut self) -> TixResult<()> {
    if self.started.is_some() {
      return Ok(());
    }
    if self.opts.high_node_boundary < 3 {
      return Err(TixError::BoundaryTooLow(self.opts.high_node_boundary));
    }
    let Some(item_load) = self.opts.item_load.clone() else {
      return Err(TixError::NoItemLoad);
    };

    let inner = Arc::new(Inner {
      lat: Lattice::new(self.opts.what.clone(), self.opts.store.clone()),
      rule: self.opts.rule.compile(),
      boundary: self.opts.high_node_boundary,
      enable_random_suggest: self.opts.enable_random_suggest_tags,
      item_load,
      on_high: self.opts.on_high.clone(),
    });

    let (tx, rx) = sync_channel(QUEUE_FACTOR * self.opts.high_node_boundary);
    let pending = Arc::new(Pending::default());
    let worker = Worker::new(inner.clone(), rx, tx.clone(), pending.clone());

    let handle = std::thread::Builder::new()
      .name("tix-worker".into())
      .spawn(move || {
        // Store state may be half pipelined after a panic, log and die
        // rather than resume 恐慌后存储状态可能写了一半，记录并退出，
        // 不尝试恢复
        if std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| worker.run())).is_err() {
          error!("indexing worker panicked");
        }
      })
      .map_err(|e| TixError::Store(e.into()))?;

    self.started = Some(Started {
      inner,
      tx,
      pending,
      handle: Some(handle),
    });
    Ok(())
  }

  fn started(&self) -> TixResult<&Started> {
    self.started.as_ref().ok_or(TixError::NotStarted)
  }

  fn enqueue(&self, job: Job) -> TixResult<()> {
    let started = self.started()?;
    started.pending.add(1);
    if started.tx.send(job).is_err() {
      started.pending.done();
      return Err(TixError::WorkerGone);
    }
    Ok(())
  }

  /// Index or re-index an item, this is also "create"
  /// 索引或重索引条目，也就是「创建」
  pub fn update(&self, id: ItemId) -> TixResult<()> {
    self.enqueue(Job::Op {
      id,
      removing: false,
    })
  }

  /// Drop an item from the index 从索引删除条目
  pub fn remove(&self, id: ItemId) -> TixResult<()> {
    self.enqueue(Job::Op { id, removing: true })
  }

  /// Block until every enqueued job finished 阻塞到所有入队任务完成
  pub fn wait_all_indexing_done(&self) {
    if let Some(started) = &self.started {
      started.pending.wait();
    }
  }

  /// Top items carrying all tags, `[start, stop]` inclusive descending by
  /// the overall rank 携带全部标签的条目，按 overall 降序的闭区间
  pub fn query(&self, tags: &[String], start: i64, stop: i64) -> Vec<ItemId> {
    self.query_options(tags, start, stop, &QueryOptions::default())
  }

  pub fn query_options(
    &self,
    tags: &[String],
    start: i64,
    stop: i64,
    options: &QueryOptions,
  ) -> Vec<ItemId> {
    match &self.started {
      Some(s) => query::query(&s.inner, tags, start, stop, options.sort_by),
      None => Vec::new(),
    }
  }

  /// How many items carry all the tags 多少条目携带全部标签
  pub fn item_count(&self, tags: &[String]) -> u64 {
    match &self.started {
      Some(s) => query::item_count(&s.inner, tags),
      None => 0,
    }
  }

  /// Most frequent co-occurring tags 最常共现的标签
  pub fn relative_tags(&self, tags: &[String], count: u64) -> Vec<String> {
    match &self.started {
      Some(s) => query::relative_tags(&s.inner, tags, count),
      None => Vec::new(),
    }
  }

  pub fn relative_tags_count(&self, tags: &[String]) -> u64 {
    match &self.started {
      Some(s) => query::relative_tags_count(&s.inner, tags),
      None => 0,
    }
  }

  /// Random sample of tags seen next to these tags
  /// 与这些标签相邻出现过的标签随机样本
  pub fn random_suggest_tags(&self, tags: &[String], count: u64) -> Vec<String> {
    match &self.started {
      Some(s) => query::random_suggest_tags(&s.inner, tags, count),
      None => Vec::new(),
    }
  }

  /// Stop the worker and join it 停止 worker 并等待退出
  pub fn shutdown(&mut self) {
    if let Some(mut started) = self.started.take() {
      let _ = started.tx.send(Job::Stop);
      if let Some(handle) = started.handle.take() {
        let _ = handle.join();
      }
    }
  }
}

impl Drop for Index {
  fn drop(&mut self) {
    self.shutdown();
  }
}

/// Query tuning 查询选项
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
  pub sort_by: SortBy,
}
