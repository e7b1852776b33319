//! Index errors 索引错误

use thiserror::Error;
use tix_store::StoreError;

pub type TixResult<T> = Result<T, TixError>;

#[derive(Error, Debug)]
pub enum TixError {
  #[error("high node boundary {0} too low, need >= 3")]
  BoundaryTooLow(usize),

  #[error("item loader missing")]
  NoItemLoad,

  #[error("index not started")]
  NotStarted,

  #[error("indexing worker gone")]
  WorkerGone,

  #[error("store: {0}")]
  Store(#[from] StoreError),
}
