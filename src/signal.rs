//! 探索の早期終了フラグ。
//!
//! `CancellationToken` は利用者が立てる停止要求、`OverflowSignal` は
//! いずれかのワーカーがオーバーフローを検出したときに立てる中断通知。
//! どちらも一度立てたら同じ探索中は下ろさない単調なフラグで、
//! ワーカーの早期脱出のヒントにしか使わないため Relaxed で読み書きする。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// スレッド間で共有するブールフラグ
#[derive(Debug, Clone, Default)]
pub struct Signal {
    flag: Arc<AtomicBool>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// 新しい探索の開始時にのみ呼ぶ
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// 利用者からの停止要求。clone したハンドルは同じフラグを共有する。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Signal);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止を要求する。何度呼んでもよい。
    pub fn cancel(&self) {
        self.0.raise();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.is_raised()
    }

    pub fn reset(&self) {
        self.0.reset();
    }
}

/// オーバーフロー検出の通知。1回の探索ごとに新しく作る。
#[derive(Debug, Clone, Default)]
pub struct OverflowSignal(Signal);

impl OverflowSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.raise();
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.is_raised()
    }
}
