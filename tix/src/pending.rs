//! Pending-work counter 待处理计数器
//!
//! Counts enqueued jobs, `wait` blocks until the worker drains them all.
//! 统计入队的任务，`wait` 阻塞到 worker 全部处理完。

use std::sync::{Condvar, Mutex, MutexGuard};

#[derive(Default)]
pub(crate) struct Pending {
  n: Mutex<usize>,
  cv: Condvar,
}

impl Pending {
  pub fn add(&self, n: usize) {
    *self.lock() += n;
  }

  pub fn done(&self) {
    let mut g = self.lock();
    *g = g.saturating_sub(1);
    if *g == 0 {
      self.cv.notify_all();
    }
  }

  pub fn wait(&self) {
    let mut g = self.lock();
    while *g > 0 {
      g = match self.cv.wait(g) {
        Ok(g) => g,
        Err(e) => e.into_inner(),
      };
    }
  }

  fn lock(&self) -> MutexGuard<'_, usize> {
    // A poisoned counter is still a counter 计数器中毒后仍可用
    match self.n.lock() {
      Ok(g) => g,
      Err(e) => e.into_inner(),
    }
  }
}
