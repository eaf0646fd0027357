//! 世代番号付きの遅延描画
//!
//! パラメータ変更ごとに世代番号を進め、遅延後に最新の世代だけが描画・反映される。
//! 古い世代の結果は描画前にも反映時にも破棄する。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cover_core::{Compositor, OutputBitmap};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::state::RenderRequest;

/// 最後に反映された描画結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSlot {
    pub generation: u64,
    pub output: Option<OutputBitmap>,
}

#[derive(Clone)]
pub struct RenderScheduler {
    inner: Arc<Inner>,
    runtime: Handle,
}

struct Inner {
    compositor: Compositor,
    delay: Duration,
    generation: AtomicU64,
    slot: watch::Sender<RenderSlot>,
}

impl RenderScheduler {
    /// 現在の Tokio ランタイム上で描画するスケジューラを作成する
    ///
    /// # Panics
    ///
    /// Tokio ランタイムのコンテキスト外で呼ぶとパニックする。
    pub fn new(compositor: Compositor) -> Self {
        Self::with_runtime(compositor, Handle::current())
    }

    /// 指定したランタイム上で描画するスケジューラを作成する
    ///
    /// 以降の `schedule` はランタイム外のスレッドからも呼べる。
    pub fn with_runtime(compositor: Compositor, runtime: Handle) -> Self {
        let delay = compositor.config().render_delay;
        let (slot, _) = watch::channel(RenderSlot::default());
        Self {
            inner: Arc::new(Inner {
                compositor,
                delay,
                generation: AtomicU64::new(0),
                slot,
            }),
            runtime,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.inner.compositor
    }

    /// 最新の世代番号
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderSlot> {
        self.inner.slot.subscribe()
    }

    pub fn latest(&self) -> RenderSlot {
        self.inner.slot.borrow().clone()
    }

    /// 遅延後の描画を予約し、割り当てた世代番号を返す
    pub fn schedule(&self, request: RenderRequest) -> u64 {
        let generation = self.inner.next_generation();
        tracing::debug!(
            generation,
            delay_ms = self.inner.delay.as_millis() as u64,
            "render scheduled"
        );

        let inner = self.inner.clone();
        self.runtime.spawn(async move { inner.run(generation, request).await });
        generation
    }

    /// 予約済み・実行中の描画をすべて無効にし、反映済みの結果も消す
    pub fn invalidate(&self) {
        let generation = self.inner.next_generation();
        self.inner.slot.send_modify(|slot| {
            slot.generation = generation;
            slot.output = None;
        });
        tracing::debug!(generation, "renders invalidated");
    }
}

impl Inner {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(self: Arc<Self>, generation: u64, request: RenderRequest) {
        tokio::time::sleep(self.delay).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "render superseded before start");
            return;
        }

        let compositor = self.compositor.clone();
        let result = tokio::task::spawn_blocking(move || {
            compositor.render(&request.source, &request.params)
        })
        .await;

        match result {
            Ok(Ok(output)) => {
                let size = output.bytes().len();
                if self.commit(generation, output) {
                    tracing::info!(generation, size, "render committed");
                } else {
                    tracing::debug!(generation, "stale render discarded");
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(generation, error = %e, "render failed, keeping previous output");
            }
            Err(e) => {
                tracing::error!(generation, error = %e, "render task panicked");
            }
        }
    }

    /// 最新の世代であれば結果を反映する
    ///
    /// 判定と書き込みは watch チャネルのロック内で行う。
    fn commit(&self, generation: u64, output: OutputBitmap) -> bool {
        self.slot.send_if_modified(|slot| {
            if !self.is_current(generation) || generation <= slot.generation {
                return false;
            }
            slot.generation = generation;
            slot.output = Some(output);
            true
        })
    }
}
