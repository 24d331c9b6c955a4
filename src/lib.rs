//! コラッツ軌道の最長探索
//!
//! [1, N] の全開始値について 3n+1 軌道の長さを並列に計算し、
//! 最長の軌道を持つ開始値を求める。
//! 探索は途中で停止でき、u64 を超える軌道はオーバーフローとして検出する。

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod partition;
pub mod signal;
pub mod trajectory;
pub mod worker;

pub use aggregate::{aggregate, PartialResult};
pub use engine::{search, AggregateReport, Outcome, SearchEngine, SearchRequest, OVERFLOW_MESSAGE, STOPPED_MESSAGE};
pub use error::{Result, SearchError};
pub use partition::{partition, Shard};
pub use signal::{CancellationToken, OverflowSignal};
pub use trajectory::{trajectory, trajectory_length, Overflow, Trajectory, SAFE_ODD_LIMIT};
pub use worker::{scan, POLL_INTERVAL};
