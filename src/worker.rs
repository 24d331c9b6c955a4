use tracing::{debug, warn};

use crate::aggregate::PartialResult;
use crate::partition::Shard;
use crate::signal::{CancellationToken, OverflowSignal};
use crate::trajectory::trajectory_length;

/// 停止要求・オーバーフロー通知を確認する間隔（値の個数）。
/// 短くすると停止までの遅延が減るがメモリ同期が増える。
pub const POLL_INTERVAL: u64 = 256;

/// 1ワーカー分の走査。担当範囲を昇順に回り、最長の軌道を持つ開始値を返す。
///
/// 最初の値の前と、以後 `POLL_INTERVAL` 個ごとに `cancel` と `overflow` を見て、
/// どちらかが立っていればその時点までの最良候補を返す。
/// 自分でオーバーフローを検出した場合は `overflow` を立ててから終了する。
pub fn scan(id: usize, shard: Shard, cancel: &CancellationToken, overflow: &OverflowSignal) -> PartialResult {
    let mut best = PartialResult::default();
    let mut examined = 0u64;

    for n in shard {
        if examined % POLL_INTERVAL == 0 && (cancel.is_cancelled() || overflow.is_raised()) {
            debug!(worker = id, examined, "worker halted early");
            return best;
        }
        examined += 1;

        match trajectory_length(n) {
            Ok(length) => best.offer(n, length),
            Err(e) => {
                warn!(worker = id, start = n, value = e.value, "trajectory overflowed u64");
                overflow.raise();
                return best;
            }
        }
    }

    debug!(
        worker = id,
        examined,
        best_value = best.best_value,
        best_length = best.best_length,
        "worker finished"
    );
    best
}
