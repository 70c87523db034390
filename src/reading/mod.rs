//! 读数模块：读数数据模型与资产追踪（lineage）接口
pub mod model;
pub mod tracker;

// 导出核心接口
pub use self::model::{Datapoint, DatapointLookup, DatapointValue, Reading, OMF_HINT_DATAPOINT};
pub use self::tracker::{
    AssetTracker, AssetTrackingTuple, InMemoryAssetTracker, LoggingAssetTracker, NoopAssetTracker,
};
