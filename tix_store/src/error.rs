//! Store errors 存储错误

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("protocol: {0}")]
  Protocol(Box<str>),

  #[error("wrong reply: expect {expect}, got {got}")]
  WrongReply {
    expect: &'static str,
    got: &'static str,
  },

  #[error("no reply pending")]
  NoReply,
}

impl StoreError {
  /// Create a protocol error 创建协议错误
  #[inline]
  pub fn protocol(msg: impl Into<Box<str>>) -> Self {
    Self::Protocol(msg.into())
  }
}
