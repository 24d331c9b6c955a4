/// ワーカー1つ分の担当範囲: first, first+stride, ... (last 以下)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    pub first: u64,
    pub stride: u64,
    pub last: u64,
}

impl Shard {
    /// stride = 0 は 1 として扱う
    pub fn new(first: u64, stride: u64, last: u64) -> Self {
        Shard { first, stride: stride.max(1), last }
    }

    /// 担当する値の個数
    pub fn len(&self) -> u64 {
        if self.first > self.last {
            0
        } else {
            (self.last - self.first) / self.stride + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    pub fn iter(&self) -> ShardIter {
        ShardIter {
            next: if self.is_empty() { None } else { Some(self.first) },
            stride: self.stride,
            last: self.last,
        }
    }
}

impl IntoIterator for Shard {
    type Item = u64;
    type IntoIter = ShardIter;

    fn into_iter(self) -> ShardIter {
        self.iter()
    }
}

/// `Shard` の値を昇順に返すイテレータ。last が u64::MAX 付近でも折り返さない。
#[derive(Debug, Clone)]
pub struct ShardIter {
    next: Option<u64>,
    stride: u64,
    last: u64,
}

impl Iterator for ShardIter {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = current
            .checked_add(self.stride)
            .filter(|&n| n <= self.last);
        Some(current)
    }
}

/// [1, limit] をワーカー数で交互に分割する。
///
/// ワーカー id は id+1, id+1+workers, id+1+2·workers, ... を担当する。
/// 連続ブロックではなくストライドで割り当てるので、値の大きさや
/// 剰余類によって計算量が偏っても各ワーカーの負荷がほぼ揃う。
/// id+1 > limit のワーカーは空の担当範囲になる。
pub fn partition(limit: u64, workers: usize) -> Vec<Shard> {
    let workers = workers.max(1);
    let stride = workers as u64;
    (0..stride).map(|id| Shard::new(id + 1, stride, limit)).collect()
}
