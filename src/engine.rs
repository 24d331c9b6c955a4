use rayon::prelude::*;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregate::{aggregate, PartialResult};
use crate::error::{Result, SearchError};
use crate::partition::{partition, Shard};
use crate::signal::{CancellationToken, OverflowSignal};
use crate::worker::scan;

/// 1回の探索の入力。探索中は変更しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    limit: u64,
    workers: usize,
}

impl SearchRequest {
    /// workers = 0 は 1 として扱う
    pub fn new(limit: u64, workers: usize) -> Self {
        SearchRequest { limit, workers: workers.max(1) }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// 探索の終わり方。必ずどれか1つだけ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 全範囲を走査し終えた
    Completed { best_start: u64, best_length: u64 },
    /// 停止要求で打ち切った（途中結果は捨てる）
    Stopped,
    /// いずれかの軌道が u64 を超えた
    Overflow,
}

pub const STOPPED_MESSAGE: &str = "Stopped by user.";
pub const OVERFLOW_MESSAGE: &str = "Calculation failed: Sequence overflowed 64-bit limit.";

/// 探索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

impl AggregateReport {
    /// 最長の軌道を持つ開始値。完了時のみ。
    pub fn best_start(&self) -> Option<u64> {
        match self.outcome {
            Outcome::Completed { best_start, .. } => Some(best_start),
            _ => None,
        }
    }

    /// 最長の軌道長。完了時のみ。
    pub fn best_length(&self) -> Option<u64> {
        match self.outcome {
            Outcome::Completed { best_length, .. } => Some(best_length),
            _ => None,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn was_stopped(&self) -> bool {
        self.outcome == Outcome::Stopped
    }

    pub fn had_overflow(&self) -> bool {
        self.outcome == Outcome::Overflow
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }

    /// 表示用の要約文
    pub fn summary_message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Completed { best_start, best_length } => write!(
                f,
                "Best Start Number: {}\nSequence Length: {}\nTime: {} ms",
                best_start, best_length, self.elapsed_ms
            ),
            Outcome::Stopped => f.write_str(STOPPED_MESSAGE),
            Outcome::Overflow => f.write_str(OVERFLOW_MESSAGE),
        }
    }
}

/// [1, limit] の中で最長の軌道を持つ開始値を並列に探す。
///
/// 呼び出しごとに workers 本のスレッドプールを作り、全スレッドを join してから返す。
/// `cancel` はリセットしない（呼び出し側が持つトークンをそのまま使う）。
/// 判定順はオーバーフロー → 停止 → 完了。
pub fn search(request: &SearchRequest, cancel: &CancellationToken) -> Result<AggregateReport> {
    if request.limit == 0 {
        return Err(SearchError::EmptyRange);
    }
    info!(limit = request.limit, workers = request.workers, "search started");
    let report = run_shards(partition(request.limit, request.workers), cancel)?;
    info!(outcome = ?report.outcome, elapsed_ms = report.elapsed_ms, "search finished");
    Ok(report)
}

/// 各 Shard を1ワーカーずつ走らせて結果をまとめる。
/// 各ワーカーの結果はタスクの戻り値として集め、共有配列には書かない。
fn run_shards(shards: Vec<Shard>, cancel: &CancellationToken) -> Result<AggregateReport> {
    let overflow = OverflowSignal::new();
    let timer = Instant::now();

    // スコープ付きプールはスコープを抜ける時点で全スレッドを join する
    let partials: Vec<PartialResult> = rayon::ThreadPoolBuilder::new()
        .num_threads(shards.len().max(1))
        .thread_name(|i| format!("collatz-worker-{}", i))
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    shards
                        .par_iter()
                        .with_max_len(1)
                        .enumerate()
                        .map(|(id, &shard)| scan(id, shard, cancel, &overflow))
                        .collect()
                })
            },
        )?;

    let elapsed_ms = timer.elapsed().as_millis() as u64;

    for (id, r) in partials.iter().enumerate() {
        debug!(worker = id, best_value = r.best_value, best_length = r.best_length, "partial result");
    }

    let outcome = if overflow.is_raised() {
        Outcome::Overflow
    } else if cancel.is_cancelled() {
        Outcome::Stopped
    } else {
        // limit >= 1 なら値 1 を必ず誰かが見るので候補は空にならない
        let best = aggregate(partials).unwrap_or_default();
        Outcome::Completed { best_start: best.best_value, best_length: best.best_length }
    };

    Ok(AggregateReport { outcome, elapsed_ms })
}

/// 停止要求と直近の結果を保持する探索エンジン。
///
/// `compute` はブロッキング。UI などから使う場合は `Arc<SearchEngine>` を
/// 別スレッドに渡して呼び、`request_stop` を任意のスレッドから呼ぶ。
/// `compute` の同時呼び出しは想定しない（呼び出し側で直列化する）。
#[derive(Debug, Default)]
pub struct SearchEngine {
    cancel: CancellationToken,
    last: Mutex<Option<AggregateReport>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止要求をリセットしてから探索し、結果を保存して返す。
    pub fn compute(&self, limit: u64, workers: usize) -> Result<AggregateReport> {
        self.reset_stop();
        self.run(limit, workers)
    }

    /// 停止要求を下ろす。UI スレッドから探索スレッドの起動前に呼べば、
    /// その後の `request_stop` は取りこぼされない。
    pub fn reset_stop(&self) {
        self.cancel.reset();
    }

    /// 停止要求をリセットせずに探索し、結果を保存して返す。
    pub fn run(&self, limit: u64, workers: usize) -> Result<AggregateReport> {
        *self.last_guard() = None;

        let report = search(&SearchRequest::new(limit, workers), &self.cancel)?;
        *self.last_guard() = Some(report.clone());
        Ok(report)
    }

    /// 実行中の探索に停止を要求する。冪等。
    /// 次の `compute` または `reset_stop` でリセットされる。
    pub fn request_stop(&self) {
        info!("stop requested");
        self.cancel.cancel();
    }

    /// 他スレッドに渡すための停止ハンドル
    pub fn stop_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 直近に完了した `compute` の結果
    pub fn last_report(&self) -> Option<AggregateReport> {
        self.last_guard().clone()
    }

    fn last_guard(&self) -> MutexGuard<'_, Option<AggregateReport>> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
