use thiserror::Error;

/// 奇数ステップ 3n+1 が u64 に収まる最大値。
/// これを超える奇数 n では 3n+1 がオーバーフローする。
pub const SAFE_ODD_LIMIT: u64 = (u64::MAX - 1) / 3;

/// n = 0 の軌道長（3n+1 規則では到達しない番兵値）
pub const ZERO_SENTINEL_LENGTH: u64 = 64;

/// 軌道の途中で 3n+1 が u64 を超えたことを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("3n+1 overflows u64 at odd value {value}")]
pub struct Overflow {
    /// SAFE_ODD_LIMIT を超えた奇数
    pub value: u64,
}

/// 開始値 n から 1 に到達するまでの軌道長（開始値を1として数える）。
///
/// 偶数の連続は trailing_zeros でまとめて割り、
/// 奇数は (3n+1)/2 を1回で計算して長さを2進める。
/// 3n+1 が u64 を超える場合は `Overflow` を返す。
#[inline]
pub fn trajectory_length(mut n: u64) -> Result<u64, Overflow> {
    if n == 0 {
        return Ok(ZERO_SENTINEL_LENGTH);
    }

    let mut length = 1u64;
    while n != 1 {
        if n & 1 == 0 {
            let zeros = n.trailing_zeros();
            n >>= zeros;
            length += zeros as u64;
        } else {
            if n > SAFE_ODD_LIMIT {
                return Err(Overflow { value: n });
            }
            // 3n+1 は必ず偶数なので直後の ÷2 も同時に行う
            n = (3 * n + 1) >> 1;
            length += 2;
        }
    }
    Ok(length)
}

/// 軌道追跡の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    /// 開始値から 1 までの全ての値（両端を含む）
    pub values: Vec<u64>,
    /// 軌道上の最大値
    pub peak: u64,
}

impl Trajectory {
    /// 軌道長（`trajectory_length` と一致する）
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start(&self) -> Option<u64> {
        self.values.first().copied()
    }
}

/// 1 ステップずつ軌道を記録する。表示・プロット用。
/// n = 0 は空の軌道を返す。
pub fn trajectory(start: u64) -> Result<Trajectory, Overflow> {
    if start == 0 {
        return Ok(Trajectory { values: Vec::new(), peak: 0 });
    }

    let mut values = vec![start];
    let mut peak = start;
    let mut n = start;
    while n != 1 {
        n = if n & 1 == 0 {
            n >> 1
        } else {
            if n > SAFE_ODD_LIMIT {
                return Err(Overflow { value: n });
            }
            3 * n + 1
        };
        peak = peak.max(n);
        values.push(n);
    }
    Ok(Trajectory { values, peak })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_of_one() {
        assert_eq!(trajectory_length(1), Ok(1));
    }

    #[test]
    fn test_small_lengths() {
        // 1, 2→1, 3→10→5→16→8→4→2→1
        assert_eq!(trajectory_length(2), Ok(2));
        assert_eq!(trajectory_length(3), Ok(8));
        assert_eq!(trajectory_length(6), Ok(9));
        assert_eq!(trajectory_length(7), Ok(17));
        assert_eq!(trajectory_length(9), Ok(20));
        assert_eq!(trajectory_length(27), Ok(112));
    }

    #[test]
    fn test_powers_of_two() {
        for k in 0..64u32 {
            assert_eq!(trajectory_length(1u64 << k), Ok(k as u64 + 1), "2^{}", k);
        }
    }

    #[test]
    fn test_zero_sentinel() {
        assert_eq!(trajectory_length(0), Ok(ZERO_SENTINEL_LENGTH));
        assert!(trajectory(0).unwrap().is_empty());
    }

    #[test]
    fn test_safe_limit_value() {
        assert_eq!(SAFE_ODD_LIMIT, 6_148_914_691_236_517_204);
        // 境界値ちょうどの 3n+1 は u64 に収まる
        assert!(SAFE_ODD_LIMIT.checked_mul(3).and_then(|v| v.checked_add(1)).is_some());
        assert!((SAFE_ODD_LIMIT + 1).checked_mul(3).and_then(|v| v.checked_add(1)).is_none());
    }

    #[test]
    fn test_overflow_just_above_limit() {
        let n = SAFE_ODD_LIMIT + 1;
        assert_eq!(n % 2, 1);
        assert_eq!(trajectory_length(n), Err(Overflow { value: n }));
        assert_eq!(trajectory(n), Err(Overflow { value: n }));
    }

    #[test]
    fn test_large_even_start_is_fine() {
        // 偶数は割るだけなのでオーバーフローしない
        assert_eq!(trajectory_length(1u64 << 63), Ok(64));
        assert!(trajectory_length(u64::MAX).is_err());
    }

    #[test]
    fn test_trajectory_of_nine() {
        let t = trajectory(9).unwrap();
        assert_eq!(
            t.values,
            vec![9, 28, 14, 7, 22, 11, 34, 17, 52, 26, 13, 40, 20, 10, 5, 16, 8, 4, 2, 1]
        );
        assert_eq!(t.peak, 52);
        assert_eq!(t.start(), Some(9));
    }

    #[test]
    fn test_trajectory_matches_length() {
        for n in 1u64..=2000 {
            let t = trajectory(n).unwrap();
            assert_eq!(t.len() as u64, trajectory_length(n).unwrap(), "n={}", n);
        }
    }
}
