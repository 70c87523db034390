//! 资产追踪（lineage）接口
//! 过滤器每为一条读数附加 hint，就上报一次 (过滤器名, 资产名, 事件) 元组

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// 资产追踪元组
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetTrackingTuple {
    pub service: String,
    pub asset: String,
    pub event: String,
}

/// 资产追踪器（由宿主提供）
pub trait AssetTracker: Send + Sync {
    fn add_asset_tracking_tuple(&self, service: &str, asset: &str, event: &str);
}

/// 空实现：不记录任何事件
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAssetTracker;

impl AssetTracker for NoopAssetTracker {
    fn add_asset_tracking_tuple(&self, _service: &str, _asset: &str, _event: &str) {}
}

/// 日志实现：以 info 级别输出追踪事件
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAssetTracker;

impl AssetTracker for LoggingAssetTracker {
    fn add_asset_tracking_tuple(&self, service: &str, asset: &str, event: &str) {
        info!(service, asset, event, "asset tracking tuple");
    }
}

/// 内存实现：缓存去重后的元组，并统计事件总数
#[derive(Debug, Default)]
pub struct InMemoryAssetTracker {
    tuples: Mutex<HashSet<AssetTrackingTuple>>,
    events: AtomicUsize,
}

impl InMemoryAssetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 上报的事件总数（含重复元组）
    pub fn event_count(&self) -> usize {
        self.events.load(Ordering::Relaxed)
    }

    /// 去重后的元组快照
    pub fn tuples(&self) -> Vec<AssetTrackingTuple> {
        let guard = self.tuples.lock().unwrap_or_else(|e| e.into_inner());
        guard.iter().cloned().collect()
    }

    pub fn contains(&self, service: &str, asset: &str, event: &str) -> bool {
        let guard = self.tuples.lock().unwrap_or_else(|e| e.into_inner());
        guard.contains(&AssetTrackingTuple {
            service: service.to_string(),
            asset: asset.to_string(),
            event: event.to_string(),
        })
    }
}

impl AssetTracker for InMemoryAssetTracker {
    fn add_asset_tracking_tuple(&self, service: &str, asset: &str, event: &str) {
        self.events.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.tuples.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(AssetTrackingTuple {
            service: service.to_string(),
            asset: asset.to_string(),
            event: event.to_string(),
        });
    }
}
