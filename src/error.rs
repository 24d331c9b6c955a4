//! 探索の起動時エラー。
//!
//! オーバーフローと停止要求は想定内の結果なので `Outcome` で表し、
//! ここには探索そのものを始められない場合だけを置く。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// 探索範囲は 1 から始まるので limit = 0 は空
    #[error("search limit must be at least 1")]
    EmptyRange,

    /// ワーカースレッドを起動できなかった
    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
