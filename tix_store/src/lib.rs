//! Backing store contract 存储契约
//!
//! The index never talks to a concrete server. It speaks this command set
//! over pipelined per-shard connections, the host plugs in the client.
//! 索引不直接依赖具体服务端，而是通过按分片的流水线连接说这套命令，
//! 客户端由宿主注入。

mod cmd;
mod conn;
mod error;

pub use cmd::{Cmd, Reply};
pub use conn::{Conn, Store};
pub use error::{StoreError, StoreResult};
