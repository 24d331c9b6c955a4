/// ワーカー1つ分の最良候補。`{0, 0}` は候補なし。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialResult {
    /// 軌道長
    pub best_length: u64,
    /// その軌道長を与える開始値
    pub best_value: u64,
}

impl PartialResult {
    pub fn new(best_value: u64, best_length: u64) -> Self {
        PartialResult { best_length, best_value }
    }

    /// 軌道長 0 は候補として数えない
    pub fn is_candidate(&self) -> bool {
        self.best_length > 0
    }

    /// other の方が良い候補か。
    /// 軌道長が長い方、同じなら開始値が大きい方を選ぶ。
    #[inline]
    pub fn is_beaten_by(&self, other: &PartialResult) -> bool {
        (other.best_length, other.best_value) > (self.best_length, self.best_value)
    }

    /// 候補 (value, length) を受け取り、良ければ置き換える
    #[inline]
    pub fn offer(&mut self, value: u64, length: u64) {
        let candidate = PartialResult::new(value, length);
        if self.is_beaten_by(&candidate) {
            *self = candidate;
        }
    }
}

/// 全ワーカーの結果から1つの勝者を選ぶ。候補が無ければ None。
/// 結果はワーカーの終了順に依存しない。
pub fn aggregate<I>(partials: I) -> Option<PartialResult>
where
    I: IntoIterator<Item = PartialResult>,
{
    partials
        .into_iter()
        .filter(PartialResult::is_candidate)
        .fold(None, |best: Option<PartialResult>, r| match best {
            Some(b) if !b.is_beaten_by(&r) => Some(b),
            _ => Some(r),
        })
}
