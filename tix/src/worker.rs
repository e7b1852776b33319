//! Indexing worker 索引 worker
//!
//! One dedicated thread drains the job channel, coalescing bursts, and
//! serializes every mutation of the node lattice and the per-item record.
//! 唯一的专职线程排空任务通道、合并突发，并串行化节点格与条目记录的
//! 全部变更。

use std::{
  collections::HashSet,
  sync::{
    Arc,
    mpsc::{Receiver, RecvTimeoutError, SyncSender},
  },
  time::Duration,
};

use log::{debug, error, info};
use tix_comm::{ItemId, TAG_SEP};
use tix_node::{Entry, Node};
use tix_rule::TagInfo;

use crate::{TixResult, index::Inner, pending::Pending, product::Product};

/// Quiescence window before a batch flushes 批次刷出前的静默窗口
const QUIESCE: Duration = Duration::from_millis(10);

/// Random-suggest looks at this many tuple tags at most
/// 随机建议最多看这么多元组标签
const SUGGEST_CAP: usize = 10;

/// One queued request 一个入队请求
#[derive(Debug, Clone, Copy)]
pub(crate) enum Job {
  Op { id: ItemId, removing: bool },
  Stop,
}

/// A high tag picked into a combination 被选入组合的高位标签
#[derive(Clone)]
struct HighTag {
  tag: String,
  score: f64,
  relative: bool,
}

pub(crate) struct Worker {
  inner: Arc<Inner>,
  rx: Receiver<Job>,
  tx: SyncSender<Job>,
  pending: Arc<Pending>,
}

impl Worker {
  pub fn new(
    inner: Arc<Inner>,
    rx: Receiver<Job>,
    tx: SyncSender<Job>,
    pending: Arc<Pending>,
  ) -> Self {
    Self {
      inner,
      rx,
      tx,
      pending,
    }
  }

  pub fn run(&self) {
    // Batch keyed by (id, kind): same-kind duplicates coalesce, an update
    // and a remove of one id stay distinct events in arrival order
    // 批次按 (id, 种类) 去重：同种合并，同 id 的更新与删除按到达顺序
    // 保留为两个事件
    let mut batch: Vec<(ItemId, bool)> = Vec::new();
    let mut queued: HashSet<(u64, bool)> = HashSet::new();

    loop {
      if batch.is_empty() {
        match self.rx.recv() {
          Ok(Job::Op { id, removing }) => self.absorb(id, removing, &mut batch, &mut queued),
          Ok(Job::Stop) | Err(_) => break,
        }
      } else {
        match self.rx.recv_timeout(QUIESCE) {
          Ok(Job::Op { id, removing }) => self.absorb(id, removing, &mut batch, &mut queued),
          Ok(Job::Stop) => {
            self.flush(&mut batch, &mut queued);
            break;
          }
          Err(RecvTimeoutError::Timeout) => {
            if !self.flush(&mut batch, &mut queued) {
              return;
            }
          }
          Err(RecvTimeoutError::Disconnected) => {
            self.flush(&mut batch, &mut queued);
            break;
          }
        }
      }
    }
    debug!("indexing worker drained and stopped");
  }

  fn absorb(
    &self,
    id: ItemId,
    removing: bool,
    batch: &mut Vec<(ItemId, bool)>,
    queued: &mut HashSet<(u64, bool)>,
  ) {
    if queued.insert((id.0, removing)) {
      batch.push((id, removing));
    } else {
      // Burst collapsed into the earlier identical job
      // 突发合并进先前的同种任务
      self.pending.done();
    }
  }

  /// Process the batch, false when the worker must die
  /// 处理批次，返回 false 表示 worker 必须退出
  fn flush(&self, batch: &mut Vec<(ItemId, bool)>, queued: &mut HashSet<(u64, bool)>) -> bool {
    for (id, removing) in batch.drain(..) {
      let r = if removing {
        self.remove(id)
      } else {
        self.update(id)
      };
      self.pending.done();
      if let Err(e) = r {
        // A half-flushed pipeline leaves unknown state, stop writing
        // 半途失败的流水线状态未知，停止写入
        error!("job for item {id} failed, worker exits: {e}");
        return false;
      }
    }
    queued.clear();
    true
  }

  /// Tag infos of the item as of now 条目当前的标签信息
  fn current_infos(&self, item: &dyn crate::Item) -> Vec<TagInfo> {
    let (tags, scores) = item.tags_with_score();
    let mut infos: Vec<TagInfo> = tags
      .into_iter()
      .enumerate()
      .map(|(i, tag)| {
        let score = scores
          .as_ref()
          .and_then(|s| s.get(i))
          .copied()
          .unwrap_or(1.0);
        TagInfo::new(tag, score)
      })
      .collect();
    let owner = item.owner_id();
    if owner != 0 {
      infos.push(TagInfo::synthetic(format!("belongs_to:{owner}")));
    }
    self.inner.rule.apply_for_indexing(infos)
  }

  fn update(&self, id: ItemId) -> TixResult<()> {
    let Some(item) = (self.inner.item_load)(id) else {
      debug!("item {id} not loadable, skip update");
      return Ok(());
    };
    let infos = self.current_infos(item.as_ref());
    let entry = Entry {
      id,
      score: item.score(),
      date: item.create_date(),
    };

    // Diff against the last indexed record 与上次索引的记录求差
    let prev = self.inner.lat.item_tags(id)?;
    for (title, aliases) in removed_titles(prev, &infos) {
      self.detach_tag(id, &title)?;
      for alias in aliases.split(TAG_SEP).filter(|a| !a.is_empty()) {
        self.detach_tag(id, alias)?;
      }
    }

    let record: Vec<(String, String)> = infos
      .iter()
      .map(|i| (i.title.clone(), i.aliases.join(TAG_SEP)))
      .collect();
    self.inner.lat.put_item_tags(id, &record)?;

    // Attach to every single-tag node, remembering which tags are high
    // 附着到每个单标签节点，并记下哪些标签已是高位
    let mut mat: Vec<Vec<HighTag>> = Vec::new();
    for info in &infos {
      let mut row = Vec::new();
      let mut tags = vec![(info.title.as_str(), info.score)];
      tags.extend(
        info
          .aliases
          .iter()
          .map(String::as_str)
          .zip(info.alias_scores.iter().copied()),
      );
      for (tag, score) in tags {
        let node = self.inner.lat.single(tag, score);
        let count = node.attach(&entry)?;
        if self.try_promote(&node, count)? {
          return Ok(());
        }
        if node.is_high()? {
          row.push(HighTag {
            tag: tag.to_string(),
            score,
            relative: info.enable_relative,
          });
        }
      }
      if !row.is_empty() {
        mat.push(row);
      }
    }

    // Deeper combinations only form once two infos contribute high tags
    // 至少两个标签贡献高位后才生成更深组合
    if mat.len() < 2 {
      return Ok(());
    }
    let product = Product::new(mat.iter().map(Vec::len).collect());
    for k in 0..product.total() {
      let mut tuple: Vec<HighTag> = product
        .decode(k)
        .into_iter()
        .enumerate()
        .map(|(row, pick)| mat[row][pick].clone())
        .collect();
      tuple.sort_by(|a, b| a.tag.cmp(&b.tag));

      if k == 0 && self.inner.enable_random_suggest {
        self.random_suggest(&tuple)?;
      }

      let root = self.inner.lat.node(Vec::new(), 1.0);
      if self.updating_deeper(&root, &tuple, true, &entry)? {
        return Ok(());
      }
    }
    Ok(())
  }

  /// Walk every sorted combination whose proper prefixes are all high
  /// 遍历所有真前缀皆为高位的有序组合
  ///
  /// Returns true when a promotion aborted the job.
  /// 升位中止任务时返回 true。
  fn updating_deeper(
    &self,
    node: &Node<'_>,
    right: &[HighTag],
    relative: bool,
    entry: &Entry,
  ) -> TixResult<bool> {
    let count = node.attach(entry)?;
    if self.try_promote(node, count)? {
      return Ok(true);
    }

    if node.is_high()? {
      for (i, ht) in right.iter().enumerate() {
        let suffix = &right[i + 1..];
        let deeper = relative && ht.relative;
        if node.tags().contains(&ht.tag) {
          // Alias duplicates collapse back onto this node
          // 别名重复折叠回本节点
          if self.updating_deeper(node, suffix, deeper, entry)? {
            return Ok(true);
          }
          continue;
        }
        let mut tags = node.tags().to_vec();
        tags.push(ht.tag.clone());
        let child = self.inner.lat.node(tags, node.tags_score() * ht.score);
        if self.updating_deeper(&child, suffix, deeper, entry)? {
          return Ok(true);
        }
      }
    }

    // Co-occurrence stats: each residual combination learns how popular
    // the removed tag is next to it
    // 共现统计：每个去一标签的组合得知被移除标签在其旁的热度
    if relative && node.tags().len() >= 2 {
      for (i, tag) in node.tags().iter().enumerate() {
        let mut residual = node.tags().to_vec();
        residual.remove(i);
        self
          .inner
          .lat
          .node(residual, 1.0)
          .set_relative_tags(tag, count)?;
      }
    }
    Ok(false)
  }

  /// Promote when the member count hits the boundary 成员数到界即升位
  ///
  /// Every member is re-enqueued so the newly admissible deeper lattice
  /// gets populated, and the current job aborts.
  /// 重新入队全部成员以填充新开放的更深格，当前任务中止。
  fn try_promote(&self, node: &Node<'_>, count: u64) -> TixResult<bool> {
    if count != self.inner.boundary as u64 || node.is_high()? {
      return Ok(false);
    }
    node.set_high()?;
    info!("node {:?} turned high", node.tags());
    if let Some(notify) = &self.inner.on_high {
      notify(node.tags());
    }

    let members = node.items()?;
    self.pending.add(members.len());
    let tx = self.tx.clone();
    let pending = self.pending.clone();
    // A helper thread re-enqueues so the worker never blocks on its own
    // channel 由辅助线程重新入队，worker 不会阻塞在自己的通道上
    std::thread::spawn(move || {
      for id in members {
        if tx.send(Job::Op { id, removing: false }).is_err() {
          pending.done();
        }
      }
    });
    Ok(true)
  }

  fn remove(&self, id: ItemId) -> TixResult<()> {
    // The loader race: an externally deleted item skips the job
    // 加载竞态：条目已被外部删除则跳过任务
    if (self.inner.item_load)(id).is_none() {
      debug!("item {id} not loadable, skip remove");
      return Ok(());
    }
    let prev = self.inner.lat.item_tags(id)?;
    for (title, aliases) in prev {
      self.detach_tag(id, &title)?;
      for alias in aliases.split(TAG_SEP).filter(|a| !a.is_empty()) {
        self.detach_tag(id, alias)?;
      }
    }
    self.inner.lat.put_item_tags(id, &[])?;
    Ok(())
  }

  fn detach_tag(&self, id: ItemId, tag: &str) -> TixResult<()> {
    let node = self.inner.lat.single(tag, 1.0);
    node.detach(id)?;
    node.detach_deeper(id)?;
    Ok(())
  }

  /// Seed suggestion sets from the first combination of this job
  /// 用本任务的第一个组合播种建议集合
  fn random_suggest(&self, tuple: &[HighTag]) -> TixResult<()> {
    for i in 0..tuple.len().min(SUGGEST_CAP) {
      let prefix: Vec<String> = tuple[..i].iter().map(|h| h.tag.clone()).collect();
      self
        .inner
        .lat
        .single(tuple[i].tag.clone(), 1.0)
        .add_random_suggest_tags(&prefix)?;
    }
    Ok(())
  }
}

/// Titles present last time but gone now, with their recorded aliases
/// 上次存在而这次消失的标题及其记录的别名
fn removed_titles(mut prev: Vec<(String, String)>, infos: &[TagInfo]) -> Vec<(String, String)> {
  prev.sort();
  let mut curr: Vec<&str> = infos.iter().map(|i| i.title.as_str()).collect();
  curr.sort_unstable();

  let mut out = Vec::new();
  let mut j = 0;
  for (title, aliases) in prev {
    while j < curr.len() && curr[j] < title.as_str() {
      j += 1;
    }
    if j >= curr.len() || curr[j] != title {
      out.push((title, aliases));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use tix_rule::TagInfo;

  use super::removed_titles;

  #[test]
  fn diff_removed() {
    let prev = vec![
      ("b".to_string(), String::new()),
      ("a".to_string(), "x|y".to_string()),
      ("c".to_string(), String::new()),
    ];
    let curr = vec![TagInfo::new("b", 1.0)];
    let removed = removed_titles(prev, &curr);
    assert_eq!(
      removed,
      [
        ("a".to_string(), "x|y".to_string()),
        ("c".to_string(), String::new()),
      ]
    );
  }

  #[test]
  fn diff_empty_prev() {
    assert!(removed_titles(Vec::new(), &[TagInfo::new("a", 1.0)]).is_empty());
  }
}
